//! Value domains and the concrete scalars that inhabit them.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The type of an input field, as far as test-data generation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    Integer,
    Double,
    String,
    Date,
    Time,
    DateTime,
    Boolean,
}

impl ValueDomain {
    pub const ALL: &'static [ValueDomain] = &[
        ValueDomain::Integer,
        ValueDomain::Double,
        ValueDomain::String,
        ValueDomain::Date,
        ValueDomain::Time,
        ValueDomain::DateTime,
        ValueDomain::Boolean,
    ];

    pub fn is_numeric(self) -> bool {
        matches!(self, ValueDomain::Integer | ValueDomain::Double)
    }

    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            ValueDomain::Date | ValueDomain::Time | ValueDomain::DateTime
        )
    }

    /// Domains whose values have a magnitude that Value-group cases can exercise.
    pub fn has_magnitude(self) -> bool {
        self.is_numeric() || self.is_temporal()
    }
}

impl fmt::Display for ValueDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueDomain::Integer => "integer",
            ValueDomain::Double => "double",
            ValueDomain::String => "string",
            ValueDomain::Date => "date",
            ValueDomain::Time => "time",
            ValueDomain::DateTime => "date_time",
            ValueDomain::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A concrete scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Integer(i64),
    Double(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Boolean(bool),
}

impl Value {
    pub fn domain(&self) -> ValueDomain {
        match self {
            Value::Integer(_) => ValueDomain::Integer,
            Value::Double(_) => ValueDomain::Double,
            Value::String(_) => ValueDomain::String,
            Value::Date(_) => ValueDomain::Date,
            Value::Time(_) => ValueDomain::Time,
            Value::DateTime(_) => ValueDomain::DateTime,
            Value::Boolean(_) => ValueDomain::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Double(d) => write!(f, "{d}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}
