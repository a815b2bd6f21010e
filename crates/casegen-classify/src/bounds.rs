//! Ordinal bounds of a field, with unresolved references faked.
//!
//! A bound that points at a constant, another field or a query cannot be
//! known here. For reachability analysis only, such a bound is replaced by
//! a synthetic ordinal:
//! - one side faked: a value strictly between the other bound and the
//!   domain limit on the faked side;
//! - both sides faked: two ordered values splitting the domain in thirds;
//! - lone faked bound: the middle of the domain.
//!
//! The faked values never reach a generator.

use casegen_ir::{Bound, Configuration, DomainLimits, Value, ValueDomain};

/// A bound literal that does not fit the field's domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bound literal does not fit domain {domain}")]
pub struct MalformedBound {
    pub domain: ValueDomain,
}

/// Domain-adjusted copy of a field's min/max, on the ordinal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBounds {
    pub lower_limit: i64,
    pub upper_limit: i64,
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub min_faked: bool,
    pub max_faked: bool,
}

impl ResolvedBounds {
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Both bounds present and in the wrong order.
    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(lo), Some(hi)) if lo > hi)
    }

    /// Count of ordinals strictly between `min` and `max`.
    pub fn free_between(&self) -> Option<i64> {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) if hi > lo => Some(hi - lo - 1),
            (Some(_), Some(_)) => Some(0),
            _ => None,
        }
    }

    /// Count of ordinals from the lower limit up to, excluding, `min`.
    pub fn free_below(&self) -> Option<i64> {
        self.min.map(|lo| lo - self.lower_limit)
    }

    /// Count of ordinals above `max` up to, including, the upper limit.
    pub fn free_above(&self) -> Option<i64> {
        self.max.map(|hi| self.upper_limit - hi)
    }
}

enum Side<T> {
    Absent,
    Literal(T),
    Faked,
}

fn side<T: Clone>(bound: Option<&Bound<T>>) -> Side<T> {
    match bound {
        None => Side::Absent,
        Some(Bound::Literal(v)) => Side::Literal(v.clone()),
        Some(Bound::Reference(_)) => Side::Faked,
    }
}

fn resolve(lower_limit: i64, upper_limit: i64, min: Side<i64>, max: Side<i64>) -> ResolvedBounds {
    let span = upper_limit - lower_limit;
    let (min_v, max_v, min_faked, max_faked) = match (min, max) {
        (Side::Faked, Side::Faked) => (
            Some(lower_limit + span / 3),
            Some(lower_limit + 2 * (span / 3)),
            true,
            true,
        ),
        (Side::Faked, Side::Literal(hi)) => {
            (Some(lower_limit + (hi - lower_limit) / 2), Some(hi), true, false)
        }
        (Side::Literal(lo), Side::Faked) => {
            (Some(lo), Some(lo + (upper_limit - lo + 1) / 2), false, true)
        }
        (Side::Faked, Side::Absent) => (Some(lower_limit + span / 2), None, true, false),
        (Side::Absent, Side::Faked) => (None, Some(lower_limit + span / 2), false, true),
        (lo, hi) => (literal(lo), literal(hi), false, false),
    };
    if min_faked || max_faked {
        tracing::trace!(?min_v, ?max_v, min_faked, max_faked, "faked unresolved bound");
    }
    ResolvedBounds {
        lower_limit,
        upper_limit,
        min: min_v,
        max: max_v,
        min_faked,
        max_faked,
    }
}

fn literal(side: Side<i64>) -> Option<i64> {
    match side {
        Side::Literal(v) => Some(v),
        Side::Absent | Side::Faked => None,
    }
}

fn value_ordinal(
    limits: &DomainLimits,
    domain: ValueDomain,
    side: Side<Value>,
) -> Result<Side<i64>, MalformedBound> {
    Ok(match side {
        Side::Absent => Side::Absent,
        Side::Faked => Side::Faked,
        Side::Literal(v) => {
            let ordinal = limits
                .coerce(&v, domain)
                .and_then(|v| limits.to_ordinal(&v))
                .ok_or(MalformedBound { domain })?;
            Side::Literal(ordinal)
        }
    })
}

fn length_ordinal(limits: &DomainLimits, side: Side<usize>) -> Result<Side<i64>, MalformedBound> {
    Ok(match side {
        Side::Absent => Side::Absent,
        Side::Faked => Side::Faked,
        Side::Literal(n) if n <= limits.max_string_length => {
            Side::Literal(i64::try_from(n).map_err(|_| MalformedBound {
                domain: ValueDomain::String,
            })?)
        }
        Side::Literal(_) => {
            return Err(MalformedBound {
                domain: ValueDomain::String,
            })
        }
    })
}

/// Magnitude bounds (`min_value`/`max_value`) of `cfg`.
pub fn value_bounds(
    cfg: &Configuration,
    limits: &DomainLimits,
) -> Result<ResolvedBounds, MalformedBound> {
    let domain = cfg.domain;
    let min = value_ordinal(limits, domain, side(cfg.min_value.as_ref().map(|c| &c.value)))?;
    let max = value_ordinal(limits, domain, side(cfg.max_value.as_ref().map(|c| &c.value)))?;
    Ok(resolve(
        limits.lower_limit(domain),
        limits.upper_limit(domain),
        min,
        max,
    ))
}

/// Length bounds (`min_length`/`max_length`) of `cfg`.
pub fn length_bounds(
    cfg: &Configuration,
    limits: &DomainLimits,
) -> Result<ResolvedBounds, MalformedBound> {
    let min = length_ordinal(limits, side(cfg.min_length.as_ref().map(|c| &c.value)))?;
    let max = length_ordinal(limits, side(cfg.max_length.as_ref().map(|c| &c.value)))?;
    Ok(resolve(
        limits.lower_limit(ValueDomain::String),
        limits.upper_limit(ValueDomain::String),
        min,
        max,
    ))
}
