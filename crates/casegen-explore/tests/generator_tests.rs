use casegen_explore::generator::pattern::text_to_value;
use casegen_explore::{GenerationError, GeneratorBuilder};
use casegen_ir::{DomainLimits, Value, ValueDomain};
use proptest::prelude::*;
use regex::Regex;

fn builder(seed: &str) -> GeneratorBuilder {
    GeneratorBuilder::new(seed, DomainLimits::default(), 10, 8)
}

/// Patterns with a non-matching value reachable by perturbation.
const PATTERNS: &[&str] = &[
    "^[a-z]{2,10}$",
    r"^\d{5}$",
    r"^[A-Z][a-z]+ [A-Z][a-z]+$",
    r"^(red|green|blue)$",
    r"^[0-9a-f]{8}-[0-9a-f]{4}$",
    r"^\w+@\w+\.(com|org)$",
    r"^[^\s]{3}$",
    r"^(ab)+c?$",
    r"^\+?[0-9]{2,4}$",
    r"^[A-Z]{2}\d{2}[A-Z0-9]{4,8}$",
];

#[test]
fn test_set_scenario() {
    let mut b = builder("set");
    let values = vec![Value::Integer(10), Value::Integer(20), Value::Integer(30)];
    let mut g = b.list_generator(ValueDomain::Integer, &values, false).unwrap();
    assert_eq!(g.first_element().unwrap(), Value::Integer(10));
    assert_eq!(g.last_element().unwrap(), Value::Integer(30));
    assert!(values.contains(&g.random_element().unwrap()));
    assert!(!values.contains(&g.not_in_set().unwrap()));
}

#[test]
fn test_format_valid_scenario() {
    let mut b = builder("format");
    let re = Regex::new("[a-z]{2,10}").unwrap();
    let mut g = b.regex_generator(ValueDomain::String, "[a-z]{2,10}").unwrap();
    for _ in 0..20 {
        assert!(re.is_match(&g.valid().unwrap()));
    }
}

#[test]
fn test_format_invalid_scenario() {
    let mut b = builder("format");
    let re = Regex::new("^[a-z]{2,10}$").unwrap();
    let mut g = b.regex_generator(ValueDomain::String, "^[a-z]{2,10}$").unwrap();
    for _ in 0..20 {
        assert!(!re.is_match(&g.invalid().unwrap()));
    }
}

#[test]
fn test_unbounded_repetition_is_capped() {
    let mut b = GeneratorBuilder::new("cap", DomainLimits::default(), 10, 3);
    let mut g = b.regex_generator(ValueDomain::String, "^a+$").unwrap();
    for _ in 0..20 {
        let s = g.valid().unwrap();
        assert!((1..=4).contains(&s.len()), "{s}");
    }
}

#[test]
fn test_pattern_value_in_numeric_domain() {
    let mut b = builder("numeric");
    let mut g = b.regex_generator(ValueDomain::Integer, r"^[1-9]\d{2}$").unwrap();
    match g.valid_value().unwrap() {
        Value::Integer(n) => assert!((100..=999).contains(&n)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_text_to_value_keeps_unparsable_text() {
    assert_eq!(
        text_to_value(ValueDomain::Time, "25:00:00".into()),
        Value::String("25:00:00".into())
    );
}

#[test]
fn test_malformed_pattern_error() {
    let mut b = builder("bad");
    assert!(matches!(
        b.regex_generator(ValueDomain::String, "[z-a]"),
        Err(GenerationError::MalformedPattern { .. })
    ));
}

#[test]
fn test_builder_determinism() {
    let run = |seed: &str| {
        let mut b = builder(seed);
        let mut out = Vec::new();
        for pattern in PATTERNS {
            let mut g = b.regex_generator(ValueDomain::String, pattern).unwrap();
            out.push(g.valid().unwrap());
            out.push(g.invalid().unwrap());
        }
        let mut raw = b
            .raw_generator(
                ValueDomain::Double,
                Some(&Value::Double(-1.0)),
                Some(&Value::Double(1.0)),
            )
            .unwrap();
        out.push(raw.random_between_min_and_max().unwrap().to_string());
        out
    };
    assert_eq!(run("run-1"), run("run-1"));
}

proptest! {
    #[test]
    fn prop_pattern_round_trip(index in 0..PATTERNS.len(), seed in "[a-z0-9]{1,12}") {
        let pattern = PATTERNS[index];
        let re = Regex::new(pattern).unwrap();
        let mut b = builder(&seed);
        let mut g = b.regex_generator(ValueDomain::String, pattern).unwrap();
        let valid = g.valid().unwrap();
        prop_assert!(re.is_match(&valid), "{} should match {}", valid, pattern);
        let invalid = g.invalid().unwrap();
        prop_assert!(!re.is_match(&invalid), "{} should not match {}", invalid, pattern);
    }

    #[test]
    fn prop_raw_boundaries_are_ordered(min in -1000i64..1000, width in 3i64..1000) {
        let max = min + width;
        let mut b = builder("ordered");
        let mut g = b
            .raw_generator(ValueDomain::Integer, Some(&Value::Integer(min)), Some(&Value::Integer(max)))
            .unwrap();
        let as_int = |v: Value| match v {
            Value::Integer(n) => n,
            other => panic!("unexpected {other:?}"),
        };
        let below = as_int(g.just_below_min().unwrap());
        let between = as_int(g.random_between_min_and_max().unwrap());
        let above = as_int(g.just_above_max().unwrap());
        prop_assert!(below < min);
        prop_assert!(min < between && between < max);
        prop_assert!(above > max);
    }
}
