//! Classification of every test case against a field configuration.
//!
//! `classify` is a pure function of its inputs: the per-group rule is
//! evaluated first, then two global transforms run in order:
//! 1. `inverted_logic` swaps Valid and Invalid (Incompatible stays);
//! 2. an Invalid result whose relevant property is `valid_only` becomes
//!    Incompatible.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use casegen_ir::{
    Boundary, Configuration, DomainLimits, Group, OtherwiseRef, PropertyKind, Side, TestCase,
    Value, ValueDomain,
};

use crate::bounds::{length_bounds, value_bounds, ResolvedBounds};

/// Patterns that every string matches, so no invalid input exists.
pub const DEGENERATE_FORMATS: &[&str] = &[".", "^.", "(.)", ".*", "^.*"];

/// Outcome of classifying one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedResult {
    Valid,
    Invalid,
    /// The test case does not apply to this field.
    Incompatible,
}

impl ExpectedResult {
    /// Swap Valid and Invalid.
    pub fn flip(self) -> Self {
        match self {
            ExpectedResult::Valid => ExpectedResult::Invalid,
            ExpectedResult::Invalid => ExpectedResult::Valid,
            ExpectedResult::Incompatible => ExpectedResult::Incompatible,
        }
    }

    pub fn is_applicable(self) -> bool {
        self != ExpectedResult::Incompatible
    }
}

impl fmt::Display for ExpectedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedResult::Valid => f.write_str("valid"),
            ExpectedResult::Invalid => f.write_str("invalid"),
            ExpectedResult::Incompatible => f.write_str("incompatible"),
        }
    }
}

/// Whether the format is degenerate ("matches everything").
pub fn is_degenerate_format(pattern: &str) -> bool {
    DEGENERATE_FORMATS.contains(&pattern.trim())
}

fn invalid_unless(valid_only: bool) -> ExpectedResult {
    if valid_only {
        ExpectedResult::Incompatible
    } else {
        ExpectedResult::Invalid
    }
}

/// A boolean set holding both values leaves nothing outside it.
fn covers_boolean_domain(domain: ValueDomain, elements: &[Value]) -> bool {
    domain == ValueDomain::Boolean
        && elements.contains(&Value::Boolean(true))
        && elements.contains(&Value::Boolean(false))
}

fn valid_if(condition: bool) -> ExpectedResult {
    if condition {
        ExpectedResult::Valid
    } else {
        ExpectedResult::Incompatible
    }
}

/// Which side of the bound pair a Value/Length shape reads.
fn bound_property(group: Group, side: Side) -> Option<PropertyKind> {
    match (group, side) {
        (Group::Value, Side::Lower) => Some(PropertyKind::MinValue),
        (Group::Value, Side::Upper) => Some(PropertyKind::MaxValue),
        (Group::Length, Side::Lower) => Some(PropertyKind::MinLength),
        (Group::Length, Side::Upper) => Some(PropertyKind::MaxLength),
        _ => None,
    }
}

/// The test-case classifier.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    limits: DomainLimits,
}

impl Classifier {
    pub fn new(limits: DomainLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DomainLimits {
        &self.limits
    }

    /// Classify one test case, with both global transforms applied.
    pub fn classify(&self, test_case: TestCase, cfg: &Configuration) -> ExpectedResult {
        let mut result = self.rule(test_case, cfg);
        if cfg.inverted_logic {
            result = result.flip();
        }
        if result == ExpectedResult::Invalid
            && self
                .relevant_property(test_case, cfg)
                .is_some_and(|kind| cfg.is_valid_only(kind))
        {
            result = ExpectedResult::Incompatible;
        }
        result
    }

    /// Classify every member of the taxonomy.
    pub fn classify_all(&self, cfg: &Configuration) -> BTreeMap<TestCase, ExpectedResult> {
        let results: BTreeMap<_, _> = TestCase::ALL
            .iter()
            .map(|&tc| (tc, self.classify(tc, cfg)))
            .collect();
        tracing::debug!(
            domain = %cfg.domain,
            applicable = results.values().filter(|r| r.is_applicable()).count(),
            "classified field"
        );
        results
    }

    /// The property whose constraint a test case explores.
    pub fn relevant_property(&self, test_case: TestCase, cfg: &Configuration) -> Option<PropertyKind> {
        let group = test_case.group();
        match group {
            Group::Value | Group::Length => {
                let boundary = test_case.boundary()?;
                if boundary == Boundary::Zero {
                    let b = value_bounds(cfg, &self.limits).ok()?;
                    return if b.min.is_some_and(|lo| lo > 0) {
                        Some(PropertyKind::MinValue)
                    } else if b.max.is_some_and(|hi| hi < 0) {
                        Some(PropertyKind::MaxValue)
                    } else {
                        None
                    };
                }
                bound_property(group, boundary.side())
            }
            Group::Format => Some(PropertyKind::Format),
            Group::Set => Some(PropertyKind::Value),
            Group::Required => Some(PropertyKind::Required),
            Group::Computation => None,
        }
    }

    /// "Otherwise" steps to forward with an Invalid classification.
    pub fn otherwise_for<'c>(
        &self,
        test_case: TestCase,
        cfg: &'c Configuration,
    ) -> Option<&'c OtherwiseRef> {
        let kind = self.relevant_property(test_case, cfg)?;
        cfg.property(kind)?.otherwise
    }

    fn rule(&self, test_case: TestCase, cfg: &Configuration) -> ExpectedResult {
        use TestCase::*;
        match test_case {
            RequiredFilled => self.required_filled(cfg),
            RequiredNotFilled => self.required_not_filled(cfg),
            FormatValid => self.format_valid(cfg),
            FormatInvalid => self.format_invalid(cfg),
            SetFirstElement | SetRandomElement | SetLastElement => self.set_member(cfg, true),
            SetNotInSet => self.set_member(cfg, false),
            ComputationRight | ComputationWrong => ExpectedResult::Incompatible,
            ValueZero => self.value_zero(cfg),
            ValueLowest | ValueRandomBelowMin | ValueJustBelowMin | ValueMin | ValueJustAboveMin
            | ValueMedian | ValueRandomBetweenMinMax | ValueJustBelowMax | ValueMax
            | ValueJustAboveMax | ValueRandomAboveMax | ValueGreatest => {
                if !cfg.domain.has_magnitude() {
                    return ExpectedResult::Incompatible;
                }
                match (test_case.boundary(), value_bounds(cfg, &self.limits)) {
                    (Some(boundary), Ok(b)) => self.boundary(Group::Value, boundary, cfg, &b),
                    _ => ExpectedResult::Incompatible,
                }
            }
            LengthLowest | LengthRandomBelowMin | LengthJustBelowMin | LengthMin
            | LengthJustAboveMin | LengthMedian | LengthRandomBetweenMinMax
            | LengthJustBelowMax | LengthMax | LengthJustAboveMax | LengthRandomAboveMax
            | LengthGreatest => {
                if cfg.domain != ValueDomain::String {
                    return ExpectedResult::Incompatible;
                }
                match (test_case.boundary(), length_bounds(cfg, &self.limits)) {
                    (Some(boundary), Ok(b)) => self.length(boundary, cfg, &b),
                    _ => ExpectedResult::Incompatible,
                }
            }
        }
    }

    // ── Required ────────────────────────────────────────────────────

    fn required_filled(&self, cfg: &Configuration) -> ExpectedResult {
        let from_query = cfg.value.as_ref().is_some_and(|v| v.value.is_query());
        if from_query || cfg.has_format() {
            return ExpectedResult::Incompatible;
        }
        if let Some(value) = cfg.value.as_ref() {
            return match value.value.elements() {
                Some(elements) if !self.fits_domain(cfg.domain, &elements) => {
                    ExpectedResult::Incompatible
                }
                Some(elements) if value.negated => {
                    valid_if(!covers_boolean_domain(cfg.domain, &elements))
                }
                Some(elements) => valid_if(!elements.is_empty()),
                None => ExpectedResult::Valid,
            };
        }
        if cfg.domain == ValueDomain::String {
            // A filled string has at least one character.
            return match length_bounds(cfg, &self.limits) {
                Ok(b) => valid_if(!b.is_inverted() && b.max.map_or(true, |hi| hi >= 1)),
                Err(_) => ExpectedResult::Incompatible,
            };
        }
        match value_bounds(cfg, &self.limits) {
            Ok(b) => valid_if(!b.is_inverted()),
            Err(_) => ExpectedResult::Incompatible,
        }
    }

    /// Every element coerces into `domain`.
    fn fits_domain(&self, domain: ValueDomain, elements: &[Value]) -> bool {
        elements
            .iter()
            .all(|v| self.limits.coerce(v, domain).is_some())
    }

    fn required_not_filled(&self, cfg: &Configuration) -> ExpectedResult {
        if cfg.is_required() {
            return invalid_unless(cfg.required.valid_only);
        }
        match cfg.format_pattern() {
            None => ExpectedResult::Valid,
            Some(pattern) => match Regex::new(pattern) {
                Ok(re) if re.is_match("") => ExpectedResult::Valid,
                Ok(_) => ExpectedResult::Invalid,
                Err(_) => ExpectedResult::Incompatible,
            },
        }
    }

    // ── Format ──────────────────────────────────────────────────────

    fn format_valid(&self, cfg: &Configuration) -> ExpectedResult {
        let Some(pattern) = cfg.format_pattern() else {
            return ExpectedResult::Incompatible;
        };
        if Regex::new(pattern).is_err() {
            return ExpectedResult::Incompatible;
        }
        valid_if(!cfg.has_magnitude_constraint() && !cfg.has_length_constraint())
    }

    fn format_invalid(&self, cfg: &Configuration) -> ExpectedResult {
        let Some(format) = cfg.format.as_ref() else {
            return ExpectedResult::Incompatible;
        };
        if format.valid_only || is_degenerate_format(&format.value) {
            return ExpectedResult::Incompatible;
        }
        if Regex::new(&format.value).is_err() {
            return ExpectedResult::Incompatible;
        }
        ExpectedResult::Invalid
    }

    // ── Set ─────────────────────────────────────────────────────────

    fn set_member(&self, cfg: &Configuration, member: bool) -> ExpectedResult {
        let Some(value) = cfg.value.as_ref() else {
            return ExpectedResult::Incompatible;
        };
        if !value.value.is_set_like() {
            return ExpectedResult::Incompatible;
        }
        if let Some(elements) = value.value.elements() {
            if elements.is_empty() || !self.fits_domain(cfg.domain, &elements) {
                return ExpectedResult::Incompatible;
            }
            if !member && covers_boolean_domain(cfg.domain, &elements) {
                return ExpectedResult::Incompatible;
            }
        }
        if member != value.negated {
            ExpectedResult::Valid
        } else {
            invalid_unless(value.valid_only)
        }
    }

    // ── Value / Length ──────────────────────────────────────────────

    fn value_zero(&self, cfg: &Configuration) -> ExpectedResult {
        if cfg.has_format()
            || cfg.has_value_constraint()
            || cfg.has_length_constraint()
            || !cfg.domain.is_numeric()
        {
            return ExpectedResult::Incompatible;
        }
        let Ok(b) = value_bounds(cfg, &self.limits) else {
            return ExpectedResult::Incompatible;
        };
        if b.is_inverted() {
            return ExpectedResult::Incompatible;
        }
        if b.min.is_some_and(|lo| lo > 0) {
            invalid_unless(cfg.is_valid_only(PropertyKind::MinValue))
        } else if b.max.is_some_and(|hi| hi < 0) {
            invalid_unless(cfg.is_valid_only(PropertyKind::MaxValue))
        } else {
            ExpectedResult::Valid
        }
    }

    fn length(&self, boundary: Boundary, cfg: &Configuration, b: &ResolvedBounds) -> ExpectedResult {
        // Empty-ish strings of a required field duplicate REQUIRED_NOT_FILLED.
        if cfg.is_required() {
            let collides = match boundary {
                Boundary::Lowest => true,
                Boundary::JustBelowMin => b.min == Some(1),
                Boundary::RandomBelowMin => b.min.is_some_and(|lo| lo <= 2),
                _ => false,
            };
            if collides {
                return ExpectedResult::Incompatible;
            }
        }
        self.boundary(Group::Length, boundary, cfg, b)
    }

    fn boundary(
        &self,
        group: Group,
        boundary: Boundary,
        cfg: &Configuration,
        b: &ResolvedBounds,
    ) -> ExpectedResult {
        if b.is_unbounded() || b.is_inverted() {
            return ExpectedResult::Incompatible;
        }
        let should_generate_valid = !cfg.has_value_constraint() || cfg.is_value_negated();
        let valid_only = bound_property(group, boundary.side())
            .is_some_and(|kind| cfg.is_valid_only(kind));

        match boundary {
            Boundary::Min => valid_if(b.min.is_some() && should_generate_valid),
            Boundary::Max => valid_if(b.max.is_some() && should_generate_valid),
            Boundary::JustAboveMin => {
                let fits = b.min.is_some_and(|lo| {
                    lo < b.upper_limit && b.max.map_or(true, |hi| lo < hi)
                });
                valid_if(fits && should_generate_valid)
            }
            Boundary::JustBelowMax => {
                let fits = b.max.is_some_and(|hi| {
                    hi > b.lower_limit && b.min.map_or(true, |lo| hi > lo)
                });
                valid_if(fits && should_generate_valid)
            }
            Boundary::JustBelowMin | Boundary::Lowest => match b.free_below() {
                Some(n) if n >= 1 => invalid_unless(valid_only),
                _ => ExpectedResult::Incompatible,
            },
            Boundary::RandomBelowMin => match b.free_below() {
                Some(n) if n >= 2 => invalid_unless(valid_only),
                _ => ExpectedResult::Incompatible,
            },
            Boundary::JustAboveMax | Boundary::Greatest => match b.free_above() {
                Some(n) if n >= 1 => invalid_unless(valid_only),
                _ => ExpectedResult::Incompatible,
            },
            Boundary::RandomAboveMax => match b.free_above() {
                Some(n) if n >= 2 => invalid_unless(valid_only),
                _ => ExpectedResult::Incompatible,
            },
            Boundary::Median => {
                valid_if(b.free_between().is_some_and(|n| n >= 2) && should_generate_valid)
            }
            Boundary::RandomBetweenMinMax => {
                valid_if(b.free_between().is_some_and(|n| n >= 3) && should_generate_valid)
            }
            Boundary::Zero => ExpectedResult::Incompatible,
        }
    }
}
