use indoc::indoc;
use serde_json::json;

use crate::error::{GrammarError, RuleError};
use crate::grammar::{Auxiliary, Grammar};
use crate::rules::Rule;

#[test]
fn assembles_minimal_grammar() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "start": { "type": "STRING", "value": "a" }
            }
        }
    "#})
    .unwrap();

    assert_eq!(grammar.name, "g");
    assert_eq!(grammar.rules.len(), 1);
    assert_eq!(
        grammar.rules.get("start"),
        Some(&Rule::String("a".to_string()))
    );
    assert!(grammar.extras.is_empty());
    assert!(grammar.conflicts.is_empty());
}

#[test]
fn rule_order_is_insertion_order() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "program": { "type": "SYMBOL", "name": "statement" },
                "statement": { "type": "SYMBOL", "name": "expression" },
                "expression": { "type": "STRING", "value": "x" }
            }
        }
    "#})
    .unwrap();

    let names: Vec<&str> = grammar.rules.keys().map(String::as_str).collect();
    // The first rule is the start rule; nothing gets reordered.
    assert_eq!(names, ["program", "statement", "expression"]);
}

#[test]
fn forward_references_are_legal() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "start": { "type": "SYMBOL", "name": "later" },
                "later": { "type": "BLANK" }
            }
        }
    "#})
    .unwrap();
    assert_eq!(grammar.rules.len(), 2);
}

#[test]
fn undefined_symbol_names_the_reference_site() {
    let err = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "start": { "type": "SYMBOL", "name": "missing" }
            }
        }
    "#})
    .unwrap_err();

    match err {
        GrammarError::UndefinedSymbol { symbol, rule } => {
            assert_eq!(symbol, "missing");
            assert_eq!(rule, "start");
        }
        other => panic!("expected UndefinedSymbol, got {other:?}"),
    }
}

#[test]
fn removing_a_referenced_rule_breaks_assembly() {
    let with_target = vec![
        (
            "start".to_string(),
            json!({ "type": "SYMBOL", "name": "word" }),
        ),
        ("word".to_string(), json!({ "type": "PATTERN", "value": "\\w+" })),
    ];
    assert!(Grammar::assemble("g", with_target.clone(), Auxiliary::default()).is_ok());

    let without_target = vec![with_target[0].clone()];
    let err = Grammar::assemble("g", without_target, Auxiliary::default()).unwrap_err();
    assert!(matches!(
        err,
        GrammarError::UndefinedSymbol { symbol, .. } if symbol == "word"
    ));
}

#[test]
fn duplicate_rule_names_are_rejected() {
    // Even structurally identical duplicates are an error.
    let entries = vec![
        ("start".to_string(), json!({ "type": "BLANK" })),
        ("start".to_string(), json!({ "type": "BLANK" })),
    ];
    let err = Grammar::assemble("g", entries, Auxiliary::default()).unwrap_err();
    assert!(matches!(
        err,
        GrammarError::DuplicateRuleName(name) if name == "start"
    ));
}

#[test]
fn first_bad_rule_aborts_assembly() {
    let entries = vec![
        ("ok".to_string(), json!({ "type": "BLANK" })),
        ("broken".to_string(), json!({ "type": "NOPE" })),
        ("also_broken".to_string(), json!(17)),
    ];
    let err = Grammar::assemble("g", entries, Auxiliary::default()).unwrap_err();
    match err {
        GrammarError::Rule { name, source } => {
            assert_eq!(name, "broken");
            assert_eq!(source, RuleError::UnrecognizedRuleKind("NOPE".to_string()));
        }
        other => panic!("expected Rule error, got {other:?}"),
    }
}

#[test]
fn empty_rule_set_is_accepted_here() {
    // Rejecting a rule-less grammar is the table generator's prerogative.
    let grammar = Grammar::assemble("g", vec![], Auxiliary::default()).unwrap();
    assert!(grammar.rules.is_empty());
}

#[test]
fn extras_are_built_as_rules() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "start": { "type": "BLANK" },
                "comment": { "type": "PATTERN", "value": "//.*" }
            },
            "extras": [
                { "type": "PATTERN", "value": "\\s" },
                { "type": "SYMBOL", "name": "comment" },
                ";"
            ]
        }
    "#})
    .unwrap();

    assert_eq!(
        grammar.extras,
        vec![
            Rule::Pattern("\\s".to_string()),
            Rule::Symbol("comment".to_string()),
            Rule::String(";".to_string()),
        ]
    );
}

#[test]
fn extras_symbols_must_resolve() {
    let err = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "start": { "type": "BLANK" }
            },
            "extras": [{ "type": "SYMBOL", "name": "comment" }]
        }
    "#})
    .unwrap_err();
    assert!(matches!(
        err,
        GrammarError::UndefinedSymbol { symbol, .. } if symbol == "comment"
    ));
}

#[test]
fn malformed_extras_name_the_field() {
    let aux = Auxiliary {
        extras: Some(json!("not a list")),
        conflicts: None,
    };
    let entries = vec![("start".to_string(), json!({ "type": "BLANK" }))];
    let err = Grammar::assemble("g", entries.clone(), aux).unwrap_err();
    assert!(matches!(
        err,
        GrammarError::MalformedField { field: "extras", .. }
    ));

    // A list with a non-string, non-object element fails with its index.
    let aux = Auxiliary {
        extras: Some(json!([{ "type": "BLANK" }, 42])),
        conflicts: None,
    };
    let err = Grammar::assemble("g", entries, aux).unwrap_err();
    match err {
        GrammarError::Extra { index, source } => {
            assert_eq!(index, 1);
            assert_eq!(source, RuleError::MalformedShape("a number".to_string()));
        }
        other => panic!("expected Extra error, got {other:?}"),
    }
}

#[test]
fn conflicts_are_preserved_verbatim() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "a": { "type": "BLANK" },
                "b": { "type": "BLANK" },
                "c": { "type": "BLANK" }
            },
            "conflicts": [["c", "a"], ["b"], []]
        }
    "#})
    .unwrap();

    // Order and membership untouched; size 0/1 sets are not an error.
    assert_eq!(
        grammar.conflicts,
        vec![
            vec!["c".to_string(), "a".to_string()],
            vec!["b".to_string()],
            vec![],
        ]
    );
}

#[test]
fn conflict_names_get_a_lookup_only() {
    let err = Grammar::from_json(indoc! {r#"
        {
            "name": "g",
            "rules": {
                "a": { "type": "BLANK" }
            },
            "conflicts": [["a", "phantom"]]
        }
    "#})
    .unwrap_err();
    assert!(matches!(
        err,
        GrammarError::UnknownConflictRule(name) if name == "phantom"
    ));
}

#[test]
fn malformed_conflicts_name_the_field() {
    for bad in [json!(5), json!([5]), json!([["a", 5]])] {
        let aux = Auxiliary {
            extras: None,
            conflicts: Some(bad),
        };
        let entries = vec![("a".to_string(), json!({ "type": "BLANK" }))];
        let err = Grammar::assemble("g", entries, aux).unwrap_err();
        assert!(matches!(
            err,
            GrammarError::MalformedField {
                field: "conflicts",
                ..
            }
        ));
    }
}

#[test]
fn description_shape_is_validated() {
    let err = Grammar::from_json(r#"{"rules": {}}"#).unwrap_err();
    assert!(matches!(
        err,
        GrammarError::MalformedField { field: "name", .. }
    ));

    let err = Grammar::from_json(r#"{"name": "g", "rules": []}"#).unwrap_err();
    assert!(matches!(
        err,
        GrammarError::MalformedField { field: "rules", .. }
    ));

    let err = Grammar::from_json("not json at all").unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
}

#[test]
fn wire_form_round_trips() {
    let grammar = Grammar::from_json(indoc! {r#"
        {
            "name": "arithmetic",
            "rules": {
                "expression": {
                    "type": "CHOICE",
                    "members": [
                        { "type": "SYMBOL", "name": "sum" },
                        { "type": "SYMBOL", "name": "number" }
                    ]
                },
                "sum": {
                    "type": "PREC_LEFT",
                    "value": 1,
                    "content": {
                        "type": "SEQ",
                        "members": [
                            { "type": "SYMBOL", "name": "expression" },
                            { "type": "STRING", "value": "+" },
                            { "type": "SYMBOL", "name": "expression" }
                        ]
                    }
                },
                "number": { "type": "PATTERN", "value": "[0-9]+" }
            },
            "extras": [{ "type": "PATTERN", "value": "\\s" }],
            "conflicts": [["sum", "expression"]]
        }
    "#})
    .unwrap();

    let round_tripped = Grammar::from_json_value(grammar.to_json()).unwrap();
    assert_eq!(round_tripped, grammar);

    // The start rule stays first in the serialized form too.
    let wire = grammar.to_json();
    let first_rule = wire["rules"]
        .as_object()
        .and_then(|rules| rules.keys().next())
        .unwrap();
    assert_eq!(first_rule, "expression");
}
