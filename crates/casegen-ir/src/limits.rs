//! Per-domain limits and the ordinal line boundary analysis runs on.
//!
//! Every domain is projected onto a dense integer line where one step is
//! exactly one increment of that domain:
//! - **Integer**: the value itself.
//! - **Double**: the value scaled by `10^fraction_digits`.
//! - **Date**: days from the common era (0001-01-01 is 1).
//! - **Time**: seconds from midnight.
//! - **DateTime**: seconds from 0001-01-01T00:00:00.
//! - **Boolean**: 0 or 1.
//! - **String**: character length.
//!
//! "Just below", "median", "random between" and friends become plain
//! integer arithmetic on that line.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::value::{Value, ValueDomain};

/// Largest integer exactly representable as an IEEE double (2^53 - 1).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Days from the common era of 9999-12-31.
const MAX_DATE_DAYS: i64 = 3_652_059;

const SECONDS_PER_DAY: i64 = 86_400;

/// Upper bound accepted for `fraction_digits`; keeps `10^digits` exact.
const MAX_FRACTION_DIGITS: u32 = 9;

/// Tunable parts of the domain limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainLimits {
    /// Decimal places of a double; the double increment is `10^-fraction_digits`.
    pub fraction_digits: u32,
    /// Longest string the engine will ever materialize.
    pub max_string_length: usize,
}

impl Default for DomainLimits {
    fn default() -> Self {
        Self {
            fraction_digits: 2,
            max_string_length: 1024,
        }
    }
}

/// The smallest step of a domain, in that domain's own terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Increment {
    /// Integers, booleans and string lengths.
    Unit,
    Fraction(f64),
    Day,
    Second,
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Increment::Unit => f.write_str("1"),
            Increment::Fraction(v) => write!(f, "{v}"),
            Increment::Day => f.write_str("1 day"),
            Increment::Second => f.write_str("1 second"),
        }
    }
}

impl DomainLimits {
    fn scale(&self) -> i64 {
        10_i64.pow(self.fraction_digits.min(MAX_FRACTION_DIGITS))
    }

    /// Representable minimum of `domain`, on the ordinal line.
    pub fn lower_limit(&self, domain: ValueDomain) -> i64 {
        match domain {
            ValueDomain::Integer | ValueDomain::Double => -MAX_SAFE_INTEGER,
            ValueDomain::Date => 1,
            ValueDomain::Time
            | ValueDomain::DateTime
            | ValueDomain::Boolean
            | ValueDomain::String => 0,
        }
    }

    /// Representable maximum of `domain`, on the ordinal line.
    pub fn upper_limit(&self, domain: ValueDomain) -> i64 {
        match domain {
            ValueDomain::Integer | ValueDomain::Double => MAX_SAFE_INTEGER,
            ValueDomain::Date => MAX_DATE_DAYS,
            ValueDomain::Time => SECONDS_PER_DAY - 1,
            ValueDomain::DateTime => MAX_DATE_DAYS * SECONDS_PER_DAY - 1,
            ValueDomain::Boolean => 1,
            ValueDomain::String => i64::try_from(self.max_string_length).unwrap_or(i64::MAX),
        }
    }

    pub fn increment(&self, domain: ValueDomain) -> Increment {
        match domain {
            ValueDomain::Integer | ValueDomain::Boolean | ValueDomain::String => Increment::Unit,
            ValueDomain::Double => Increment::Fraction(1.0 / self.scale() as f64),
            ValueDomain::Date => Increment::Day,
            ValueDomain::Time | ValueDomain::DateTime => Increment::Second,
        }
    }

    /// Project a value onto its domain's ordinal line.
    ///
    /// Returns `None` for non-finite doubles and out-of-range integers.
    pub fn to_ordinal(&self, value: &Value) -> Option<i64> {
        let ordinal = match value {
            Value::Integer(i) => *i,
            Value::Double(d) => {
                if !d.is_finite() {
                    return None;
                }
                let scaled = (d * self.scale() as f64).round();
                if scaled.abs() > MAX_SAFE_INTEGER as f64 {
                    return None;
                }
                scaled as i64
            }
            Value::String(s) => i64::try_from(s.chars().count()).unwrap_or(i64::MAX),
            Value::Date(d) => i64::from(d.num_days_from_ce()),
            Value::Time(t) => i64::from(t.num_seconds_from_midnight()),
            Value::DateTime(dt) => {
                (i64::from(dt.date().num_days_from_ce()) - 1) * SECONDS_PER_DAY
                    + i64::from(dt.time().num_seconds_from_midnight())
            }
            Value::Boolean(b) => i64::from(*b),
        };
        let domain = value.domain();
        if ordinal < self.lower_limit(domain) || ordinal > self.upper_limit(domain) {
            return None;
        }
        Some(ordinal)
    }

    /// Inverse of [`to_ordinal`](Self::to_ordinal).
    ///
    /// Strings have no canonical value for a length and yield `None`; the
    /// raw generator materializes their content.
    pub fn from_ordinal(&self, domain: ValueDomain, ordinal: i64) -> Option<Value> {
        if ordinal < self.lower_limit(domain) || ordinal > self.upper_limit(domain) {
            return None;
        }
        match domain {
            ValueDomain::Integer => Some(Value::Integer(ordinal)),
            ValueDomain::Double => Some(Value::Double(ordinal as f64 / self.scale() as f64)),
            ValueDomain::Date => {
                NaiveDate::from_num_days_from_ce_opt(i32::try_from(ordinal).ok()?).map(Value::Date)
            }
            ValueDomain::Time => {
                NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(ordinal).ok()?, 0)
                    .map(Value::Time)
            }
            ValueDomain::DateTime => {
                let days = i32::try_from(ordinal.div_euclid(SECONDS_PER_DAY) + 1).ok()?;
                let secs = u32::try_from(ordinal.rem_euclid(SECONDS_PER_DAY)).ok()?;
                let date = NaiveDate::from_num_days_from_ce_opt(days)?;
                let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)?;
                Some(Value::DateTime(date.and_time(time)))
            }
            ValueDomain::Boolean => Some(Value::Boolean(ordinal != 0)),
            ValueDomain::String => None,
        }
    }

    /// Compare two values of the same domain. Strings compare by length.
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        if a.domain() != b.domain() {
            return None;
        }
        if let (Value::Double(x), Value::Double(y)) = (a, b) {
            return x.partial_cmp(y);
        }
        Some(self.to_ordinal(a)?.cmp(&self.to_ordinal(b)?))
    }

    /// Coerce a value into `domain` where the conversion is lossless.
    ///
    /// Integers widen to doubles and dates widen to midnight date-times;
    /// everything else must already match.
    pub fn coerce(&self, value: &Value, domain: ValueDomain) -> Option<Value> {
        match (value, domain) {
            (v, d) if v.domain() == d => Some(v.clone()),
            (Value::Integer(i), ValueDomain::Double) => Some(Value::Double(*i as f64)),
            (Value::Date(d), ValueDomain::DateTime) => d.and_hms_opt(0, 0, 0).map(Value::DateTime),
            _ => None,
        }
    }
}
