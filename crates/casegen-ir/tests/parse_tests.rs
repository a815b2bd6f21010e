use casegen_ir::parse::{parse_configuration, parse_configurations};
use casegen_ir::{Bound, PropertyKind, Reference, Value, ValueDomain, ValueSource};

#[test]
fn test_parse_minimal_configuration() {
    let cfg = parse_configuration(r#"{ "domain": "integer" }"#).unwrap();
    assert_eq!(cfg.domain, ValueDomain::Integer);
    assert!(!cfg.is_required());
    assert!(!cfg.inverted_logic);
    assert!(cfg.value.is_none());
}

#[test]
fn test_parse_bounded_integer_field() {
    let json = serde_json::json!({
        "domain": "integer",
        "required": { "value": true, "valid_only": true },
        "min_value": { "value": { "literal": { "type": "integer", "value": 10 } } },
        "max_value": {
            "value": { "reference": { "kind": "query", "name": "SELECT max(age) FROM people" } },
            "otherwise": "age-too-high"
        }
    });
    let cfg = parse_configuration(&json.to_string()).unwrap();
    assert!(cfg.is_required());
    assert!(cfg.is_valid_only(PropertyKind::Required));
    assert_eq!(
        cfg.min_value.as_ref().unwrap().value,
        Bound::Literal(Value::Integer(10))
    );
    let max = cfg.max_value.as_ref().unwrap();
    assert_eq!(
        max.value,
        Bound::Reference(Reference::Query("SELECT max(age) FROM people".into()))
    );
    assert_eq!(max.otherwise.as_ref().unwrap().0, "age-too-high");
}

#[test]
fn test_parse_negated_value_list() {
    let json = serde_json::json!({
        "domain": "string",
        "value": {
            "value": { "list": [
                { "type": "string", "value": "red" },
                { "type": "string", "value": "blue" }
            ] },
            "negated": true
        },
        "min_length": { "value": { "literal": 2 } }
    });
    let cfg = parse_configuration(&json.to_string()).unwrap();
    assert!(cfg.is_value_negated());
    assert!(matches!(
        cfg.value.as_ref().unwrap().value,
        ValueSource::List(ref v) if v.len() == 2
    ));
    assert!(cfg.has_length_constraint());
}

#[test]
fn test_parse_many() {
    let cfgs = parse_configurations(r#"[{ "domain": "date" }, { "domain": "boolean" }]"#).unwrap();
    assert_eq!(cfgs.len(), 2);
    assert_eq!(cfgs[1].domain, ValueDomain::Boolean);
}

#[test]
fn test_parse_rejects_unknown_domain() {
    assert!(parse_configuration(r#"{ "domain": "money" }"#).is_err());
}
