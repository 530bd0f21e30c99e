//! Grammar assembly: named rules plus auxiliary lexical metadata.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value, json};

use crate::build::{build_rule, json_type_name};
use crate::error::{GrammarError, RuleError};
use crate::rules::Rule;

/// Auxiliary grammar fields, still in untyped form.
///
/// Both fields are optional; shape is validated during
/// [`Grammar::assemble`].
#[derive(Debug, Default)]
pub struct Auxiliary {
    /// Token rules permitted between any two other tokens (whitespace,
    /// comments). A JSON array of rule objects; bare strings normalize to
    /// `STRING` rules.
    pub extras: Option<Value>,
    /// Author-declared conflict sets: a JSON array of arrays of rule names.
    pub conflicts: Option<Value>,
}

/// A named, validated collection of rules ready for table generation.
///
/// Immutable once assembled; owns every rule tree it contains. Rule order is
/// insertion order, and the first rule is the start rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub name: String,
    pub rules: IndexMap<String, Rule>,
    /// Extra tokens, fully resolved to rule values.
    pub extras: Vec<Rule>,
    /// Expected conflict sets, preserved verbatim in order and membership.
    pub conflicts: Vec<Vec<String>>,
}

impl Grammar {
    /// Assemble a grammar from untyped rule entries.
    ///
    /// Entries are consumed in order. The first failure aborts assembly:
    /// a rule that fails to build, a duplicate name, a malformed auxiliary
    /// field, or (once every rule exists) a `SYMBOL` reference that does not
    /// resolve. An empty entry list is accepted here; rejecting an empty
    /// grammar is the table generator's call.
    pub fn assemble(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (String, Value)>,
        aux: Auxiliary,
    ) -> Result<Self, GrammarError> {
        let mut rules = IndexMap::new();
        for (rule_name, description) in entries {
            let rule = build_rule(&description).map_err(|source| GrammarError::Rule {
                name: rule_name.clone(),
                source,
            })?;
            if rules.insert(rule_name.clone(), rule).is_some() {
                return Err(GrammarError::DuplicateRuleName(rule_name));
            }
        }

        let grammar = Grammar {
            name: name.into(),
            extras: build_extras(aux.extras.as_ref())?,
            conflicts: conflict_sets(aux.conflicts.as_ref())?,
            rules,
        };
        grammar.check_symbols()?;
        grammar.check_conflicts()?;
        Ok(grammar)
    }

    /// Parse and assemble a whole grammar description from JSON text.
    ///
    /// JSON objects cannot express duplicate keys, so duplicate-name
    /// detection only applies through [`Grammar::assemble`].
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    /// Assemble from an already-parsed JSON description.
    pub fn from_json_value(value: Value) -> Result<Self, GrammarError> {
        let Value::Object(mut map) = value else {
            return Err(GrammarError::MalformedField {
                field: "grammar",
                expected: "an object",
            });
        };
        let name = match map.remove("name") {
            Some(Value::String(name)) => name,
            _ => {
                return Err(GrammarError::MalformedField {
                    field: "name",
                    expected: "a string",
                });
            }
        };
        let entries: Map<String, Value> = match map.remove("rules") {
            Some(Value::Object(rules)) => rules,
            _ => {
                return Err(GrammarError::MalformedField {
                    field: "rules",
                    expected: "an object mapping rule names to rules",
                });
            }
        };
        let aux = Auxiliary {
            extras: map.remove("extras"),
            conflicts: map.remove("conflicts"),
        };
        Self::assemble(name, entries, aux)
    }

    /// Serialize to the JSON wire form handed to the table generator.
    ///
    /// Rule order is preserved (the generator treats the first rule as the
    /// start rule).
    pub fn to_json(&self) -> Value {
        let rules: Map<String, Value> = self
            .rules
            .iter()
            .map(|(name, rule)| (name.clone(), rule.to_json()))
            .collect();
        json!({
            "name": self.name,
            "rules": rules,
            "extras": self.extras.iter().map(Rule::to_json).collect::<Vec<_>>(),
            "conflicts": self.conflicts,
        })
    }

    /// Walk every rule tree and resolve each `SYMBOL` against the rule
    /// table. Fails on the first unresolved reference, naming both the
    /// symbol and the rule containing it.
    fn check_symbols(&self) -> Result<(), GrammarError> {
        let check = |rule_name: &str, rule: &Rule| {
            rule.visit_symbols(&mut |symbol| {
                if self.rules.contains_key(symbol) {
                    Ok(())
                } else {
                    Err(GrammarError::UndefinedSymbol {
                        symbol: symbol.to_string(),
                        rule: rule_name.to_string(),
                    })
                }
            })
        };
        for (rule_name, rule) in &self.rules {
            check(rule_name, rule)?;
        }
        for extra in &self.extras {
            check("extras", extra)?;
        }
        Ok(())
    }

    /// Conflict sets get a name lookup only; their order and membership are
    /// never touched. Sets of size 0 or 1 are accepted (they simply can
    /// never match a real conflict).
    fn check_conflicts(&self) -> Result<(), GrammarError> {
        for set in &self.conflicts {
            for rule_name in set {
                if !self.rules.contains_key(rule_name) {
                    return Err(GrammarError::UnknownConflictRule(rule_name.clone()));
                }
            }
        }
        Ok(())
    }
}

impl Serialize for Grammar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry(
            "rules",
            &self
                .rules
                .iter()
                .map(|(name, rule)| (name, rule.to_json()))
                .collect::<IndexMap<_, _>>(),
        )?;
        map.serialize_entry(
            "extras",
            &self.extras.iter().map(Rule::to_json).collect::<Vec<_>>(),
        )?;
        map.serialize_entry("conflicts", &self.conflicts)?;
        map.end()
    }
}

fn build_extras(extras: Option<&Value>) -> Result<Vec<Rule>, GrammarError> {
    let Some(extras) = extras else {
        return Ok(Vec::new());
    };
    let Value::Array(elements) = extras else {
        return Err(GrammarError::MalformedField {
            field: "extras",
            expected: "an array of rules",
        });
    };
    elements
        .iter()
        .enumerate()
        .map(|(index, element)| match element {
            // A bare string is shorthand for a literal token.
            Value::String(text) => Ok(Rule::String(text.clone())),
            Value::Object(_) => {
                build_rule(element).map_err(|source| GrammarError::Extra { index, source })
            }
            other => Err(GrammarError::Extra {
                index,
                source: RuleError::MalformedShape(json_type_name(other).to_string()),
            }),
        })
        .collect()
}

fn conflict_sets(conflicts: Option<&Value>) -> Result<Vec<Vec<String>>, GrammarError> {
    let Some(conflicts) = conflicts else {
        return Ok(Vec::new());
    };
    fn malformed() -> GrammarError {
        GrammarError::MalformedField {
            field: "conflicts",
            expected: "an array of arrays of rule names",
        }
    }
    let Value::Array(sets) = conflicts else {
        return Err(malformed());
    };
    sets.iter()
        .map(|set| {
            let Value::Array(names) = set else {
                return Err(malformed());
            };
            names
                .iter()
                .map(|name| name.as_str().map(str::to_owned).ok_or_else(malformed))
                .collect()
        })
        .collect()
}
