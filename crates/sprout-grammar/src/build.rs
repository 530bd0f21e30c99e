//! Recursive-descent construction of [`Rule`] trees from untyped JSON.
//!
//! The input comes straight from an untrusted grammar description, so every
//! shape violation is turned into a [`RuleError`] naming the offending tag or
//! field. Construction either yields a complete tree or nothing; there is no
//! partially built rule and no error accumulation.

use serde_json::{Map, Value};

use crate::error::RuleError;
use crate::rules::Rule;

/// Build one rule from its untyped description.
///
/// Dispatches on the `type` tag. `SYMBOL` names are accepted without
/// checking existence here; forward references are legal and are resolved
/// when the full rule set is known, during
/// [`Grammar::assemble`](crate::Grammar::assemble).
pub fn build_rule(value: &Value) -> Result<Rule, RuleError> {
    let map = match value {
        Value::Object(map) => map,
        other => return Err(RuleError::malformed(other)),
    };
    let kind = match map.get("type") {
        Some(Value::String(tag)) => tag.as_str(),
        _ => return Err(RuleError::malformed(value)),
    };

    match kind {
        "BLANK" => Ok(Rule::Blank),
        "STRING" => Ok(Rule::String(str_field(map, "STRING", "value")?)),
        "KEYWORD" => Ok(Rule::Keyword(str_field(map, "KEYWORD", "value")?)),
        "PATTERN" => Ok(Rule::Pattern(str_field(map, "PATTERN", "value")?)),
        "SYMBOL" => Ok(Rule::Symbol(str_field(map, "SYMBOL", "name")?)),
        "SEQ" => Ok(Rule::Seq(member_rules(map, "SEQ")?)),
        "CHOICE" => Ok(Rule::Choice(member_rules(map, "CHOICE")?)),
        "REPEAT" => Ok(Rule::Repeat(content_rule(map, "REPEAT")?)),
        "REPEAT1" => Ok(Rule::Repeat1(content_rule(map, "REPEAT1")?)),
        "TOKEN" => Ok(Rule::Token(content_rule(map, "TOKEN")?)),
        "ERROR" => Ok(Rule::Error(content_rule(map, "ERROR")?)),
        "PREC" => Ok(Rule::Prec {
            value: prec_value(map, "PREC")?,
            content: prec_content(map, "PREC")?,
        }),
        "PREC_LEFT" => Ok(Rule::PrecLeft {
            value: prec_value(map, "PREC_LEFT")?,
            content: prec_content(map, "PREC_LEFT")?,
        }),
        "PREC_RIGHT" => Ok(Rule::PrecRight {
            value: prec_value(map, "PREC_RIGHT")?,
            content: prec_content(map, "PREC_RIGHT")?,
        }),
        other => Err(RuleError::UnrecognizedRuleKind(other.to_string())),
    }
}

/// Human-readable name for a JSON value's type, for shape errors.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn str_field(
    map: &Map<String, Value>,
    kind: &'static str,
    field: &'static str,
) -> Result<String, RuleError> {
    match map.get(field) {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(RuleError::InvalidField {
            kind,
            field,
            expected: "a string",
        }),
        None => Err(RuleError::MissingField { kind, field }),
    }
}

/// Build the `members` list of a variadic rule, in order, failing on the
/// first bad member. An empty list is legal input and degenerates to an
/// empty sequence or choice.
fn member_rules(map: &Map<String, Value>, kind: &'static str) -> Result<Vec<Rule>, RuleError> {
    match map.get("members") {
        Some(Value::Array(members)) => members.iter().map(build_rule).collect(),
        Some(_) => Err(RuleError::InvalidField {
            kind,
            field: "members",
            expected: "an array of rules",
        }),
        None => Err(RuleError::MissingField {
            kind,
            field: "members",
        }),
    }
}

/// The nested rule of a unary kind. Historical descriptions spell the field
/// either `content` or `value`; both are accepted.
fn content_rule(map: &Map<String, Value>, kind: &'static str) -> Result<Box<Rule>, RuleError> {
    let nested = map
        .get("content")
        .or_else(|| map.get("value"))
        .ok_or(RuleError::MissingField {
            kind,
            field: "content",
        })?;
    Ok(Box::new(build_rule(nested)?))
}

/// The nested rule of a precedence kind (`content`, historically `rule`).
fn prec_content(map: &Map<String, Value>, kind: &'static str) -> Result<Box<Rule>, RuleError> {
    let nested = map
        .get("content")
        .or_else(|| map.get("rule"))
        .ok_or(RuleError::MissingField {
            kind,
            field: "content",
        })?;
    Ok(Box::new(build_rule(nested)?))
}

fn prec_value(map: &Map<String, Value>, kind: &'static str) -> Result<i32, RuleError> {
    let invalid = RuleError::InvalidField {
        kind,
        field: "value",
        expected: "a 32-bit signed integer",
    };
    match map.get("value") {
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(|wide| i32::try_from(wide).ok())
            .ok_or(invalid),
        Some(_) => Err(invalid),
        None => Err(RuleError::MissingField {
            kind,
            field: "value",
        }),
    }
}
