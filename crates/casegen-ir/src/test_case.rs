//! The closed taxonomy of abstract test cases.
//!
//! All members are declared once in the `test_cases!` invocation below; the
//! enum, its `ALL` table, the group mapping and the wire identifiers are
//! generated from that single list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Disjoint groups of test cases. The group decides which configuration
/// properties a test case looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    Value,
    Length,
    Format,
    Set,
    Required,
    Computation,
}

impl Group {
    pub const ALL: &'static [Group] = &[
        Group::Value,
        Group::Length,
        Group::Format,
        Group::Set,
        Group::Required,
        Group::Computation,
    ];

    /// Members of this group, in taxonomy order.
    pub fn members(self) -> impl Iterator<Item = TestCase> {
        TestCase::ALL
            .iter()
            .copied()
            .filter(move |tc| tc.group() == self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Value => "Value",
            Group::Length => "Length",
            Group::Format => "Format",
            Group::Set => "Set",
            Group::Required => "Required",
            Group::Computation => "Computation",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! test_cases {
    ($($group:ident => { $($case:ident = $name:literal),+ $(,)? }),+ $(,)?) => {
        /// An abstract test case: a named way of deriving one input value.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum TestCase {
            $($($case,)+)+
        }

        impl TestCase {
            /// Every member, in declaration order.
            pub const ALL: &'static [TestCase] = &[$($(TestCase::$case,)+)+];

            pub fn group(self) -> Group {
                match self {
                    $($(TestCase::$case => Group::$group,)+)+
                }
            }

            /// Stable identifier used by downstream consumers.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($(TestCase::$case => $name,)+)+
                }
            }
        }

        impl FromStr for TestCase {
            type Err = UnknownTestCase;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($($name => Ok(TestCase::$case),)+)+
                    other => Err(UnknownTestCase(other.to_string())),
                }
            }
        }
    };
}

test_cases! {
    Value => {
        ValueLowest = "VALUE_LOWEST",
        ValueRandomBelowMin = "VALUE_RANDOM_BELOW_MIN",
        ValueJustBelowMin = "VALUE_JUST_BELOW_MIN",
        ValueMin = "VALUE_MIN",
        ValueJustAboveMin = "VALUE_JUST_ABOVE_MIN",
        ValueZero = "VALUE_ZERO",
        ValueMedian = "VALUE_MEDIAN",
        ValueRandomBetweenMinMax = "VALUE_RANDOM_BETWEEN_MIN_MAX",
        ValueJustBelowMax = "VALUE_JUST_BELOW_MAX",
        ValueMax = "VALUE_MAX",
        ValueJustAboveMax = "VALUE_JUST_ABOVE_MAX",
        ValueRandomAboveMax = "VALUE_RANDOM_ABOVE_MAX",
        ValueGreatest = "VALUE_GREATEST",
    },
    Length => {
        LengthLowest = "LENGTH_LOWEST",
        LengthRandomBelowMin = "LENGTH_RANDOM_BELOW_MIN",
        LengthJustBelowMin = "LENGTH_JUST_BELOW_MIN",
        LengthMin = "LENGTH_MIN",
        LengthJustAboveMin = "LENGTH_JUST_ABOVE_MIN",
        LengthMedian = "LENGTH_MEDIAN",
        LengthRandomBetweenMinMax = "LENGTH_RANDOM_BETWEEN_MIN_MAX",
        LengthJustBelowMax = "LENGTH_JUST_BELOW_MAX",
        LengthMax = "LENGTH_MAX",
        LengthJustAboveMax = "LENGTH_JUST_ABOVE_MAX",
        LengthRandomAboveMax = "LENGTH_RANDOM_ABOVE_MAX",
        LengthGreatest = "LENGTH_GREATEST",
    },
    Format => {
        FormatValid = "FORMAT_VALID",
        FormatInvalid = "FORMAT_INVALID",
    },
    Set => {
        SetFirstElement = "SET_FIRST_ELEMENT",
        SetRandomElement = "SET_RANDOM_ELEMENT",
        SetLastElement = "SET_LAST_ELEMENT",
        SetNotInSet = "SET_NOT_IN_SET",
    },
    Required => {
        RequiredFilled = "REQUIRED_FILLED",
        RequiredNotFilled = "REQUIRED_NOT_FILLED",
    },
    Computation => {
        ComputationRight = "COMPUTATION_RIGHT",
        ComputationWrong = "COMPUTATION_WRONG",
    },
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown test case identifier '{0}'")]
pub struct UnknownTestCase(pub String);

/// Boundary shapes shared by the Value and Length groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    Lowest,
    RandomBelowMin,
    JustBelowMin,
    Min,
    JustAboveMin,
    Zero,
    Median,
    RandomBetweenMinMax,
    JustBelowMax,
    Max,
    JustAboveMax,
    RandomAboveMax,
    Greatest,
}

/// Which bound a boundary shape is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Lower,
    Upper,
    /// Needs both bounds.
    Between,
    /// Anchored to zero rather than a declared bound.
    Origin,
}

impl Boundary {
    pub fn side(self) -> Side {
        match self {
            Boundary::Lowest
            | Boundary::RandomBelowMin
            | Boundary::JustBelowMin
            | Boundary::Min
            | Boundary::JustAboveMin => Side::Lower,
            Boundary::Median | Boundary::RandomBetweenMinMax => Side::Between,
            Boundary::JustBelowMax
            | Boundary::Max
            | Boundary::JustAboveMax
            | Boundary::RandomAboveMax
            | Boundary::Greatest => Side::Upper,
            Boundary::Zero => Side::Origin,
        }
    }
}

impl TestCase {
    /// Boundary shape of a Value or Length member.
    pub fn boundary(self) -> Option<Boundary> {
        use TestCase::*;
        let b = match self {
            ValueLowest | LengthLowest => Boundary::Lowest,
            ValueRandomBelowMin | LengthRandomBelowMin => Boundary::RandomBelowMin,
            ValueJustBelowMin | LengthJustBelowMin => Boundary::JustBelowMin,
            ValueMin | LengthMin => Boundary::Min,
            ValueJustAboveMin | LengthJustAboveMin => Boundary::JustAboveMin,
            ValueZero => Boundary::Zero,
            ValueMedian | LengthMedian => Boundary::Median,
            ValueRandomBetweenMinMax | LengthRandomBetweenMinMax => Boundary::RandomBetweenMinMax,
            ValueJustBelowMax | LengthJustBelowMax => Boundary::JustBelowMax,
            ValueMax | LengthMax => Boundary::Max,
            ValueJustAboveMax | LengthJustAboveMax => Boundary::JustAboveMax,
            ValueRandomAboveMax | LengthRandomAboveMax => Boundary::RandomAboveMax,
            ValueGreatest | LengthGreatest => Boundary::Greatest,
            FormatValid | FormatInvalid | SetFirstElement | SetRandomElement | SetLastElement
            | SetNotInSet | RequiredFilled | RequiredNotFilled | ComputationRight
            | ComputationWrong => return None,
        };
        Some(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_case_in_exactly_one_group() {
        let total: usize = Group::ALL.iter().map(|g| g.members().count()).sum();
        assert_eq!(total, TestCase::ALL.len());
    }

    #[test]
    fn test_group_sizes() {
        assert_eq!(Group::Value.members().count(), 13);
        assert_eq!(Group::Length.members().count(), 12);
        assert_eq!(Group::Format.members().count(), 2);
        assert_eq!(Group::Set.members().count(), 4);
        assert_eq!(Group::Required.members().count(), 2);
        assert_eq!(Group::Computation.members().count(), 2);
    }

    #[test]
    fn test_identifiers_roundtrip_through_from_str() {
        for tc in TestCase::ALL {
            assert_eq!(tc.as_str().parse::<TestCase>().unwrap(), *tc);
        }
        assert!("VALUE_NOPE".parse::<TestCase>().is_err());
    }

    #[test]
    fn test_serde_identifier_matches_as_str() {
        for tc in TestCase::ALL {
            let json = serde_json::to_value(tc).unwrap();
            assert_eq!(json, serde_json::Value::String(tc.as_str().to_string()));
        }
    }

    #[test]
    fn test_boundary_only_for_value_and_length() {
        for tc in TestCase::ALL {
            let has = tc.boundary().is_some();
            assert_eq!(has, matches!(tc.group(), Group::Value | Group::Length), "{tc}");
        }
        assert_eq!(TestCase::LengthMedian.boundary(), Some(Boundary::Median));
    }

    #[test]
    fn test_zero_only_in_value_group() {
        assert!(Group::Length
            .members()
            .all(|tc| tc.boundary() != Some(Boundary::Zero)));
    }
}
