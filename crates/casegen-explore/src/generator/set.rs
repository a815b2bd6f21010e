//! Generation from a fixed, ordered value set.
//!
//! With `inverted` set the field's value constraint is negated: members are
//! the invalid values and anything outside the set is valid.

use rand::seq::SliceRandom;
use rand::Rng;

use casegen_ir::{DomainLimits, Value, ValueDomain};

use super::raw::random_text;
use super::GenerationError;

/// Longest random string tried when looking for a non-member.
const MAX_OUTSIDER_LENGTH: usize = 32;

pub struct SetGenerator<'a, R: Rng + ?Sized> {
    domain: ValueDomain,
    values: Vec<Value>,
    inverted: bool,
    tries: usize,
    limits: DomainLimits,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> SetGenerator<'a, R> {
    /// Every element must fit `domain`, after lossless coercion.
    pub fn new(
        domain: ValueDomain,
        values: &[Value],
        inverted: bool,
        tries: usize,
        limits: DomainLimits,
        rng: &'a mut R,
    ) -> Result<Self, GenerationError> {
        let values = values
            .iter()
            .map(|v| {
                limits
                    .coerce(v, domain)
                    .ok_or(GenerationError::DomainMismatch {
                        expected: domain,
                        found: v.domain(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            domain,
            values,
            inverted,
            tries: tries.max(1),
            limits,
            rng,
        })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.values.contains(value)
    }

    pub fn first_element(&self) -> Result<Value, GenerationError> {
        self.values.first().cloned().ok_or(GenerationError::EmptySet)
    }

    pub fn last_element(&self) -> Result<Value, GenerationError> {
        self.values.last().cloned().ok_or(GenerationError::EmptySet)
    }

    pub fn random_element(&mut self) -> Result<Value, GenerationError> {
        self.values
            .choose(&mut *self.rng)
            .cloned()
            .ok_or(GenerationError::EmptySet)
    }

    fn random_candidate(&mut self) -> Option<Value> {
        let domain = self.domain;
        if domain == ValueDomain::String {
            let len = self.rng.gen_range(1..=MAX_OUTSIDER_LENGTH);
            return Some(Value::String(random_text(&mut *self.rng, len)));
        }
        let ordinal = self
            .rng
            .gen_range(self.limits.lower_limit(domain)..=self.limits.upper_limit(domain));
        self.limits.from_ordinal(domain, ordinal)
    }

    /// A value of the domain that is not a member.
    pub fn not_in_set(&mut self) -> Result<Value, GenerationError> {
        if self.domain == ValueDomain::Boolean {
            return [false, true]
                .into_iter()
                .map(Value::Boolean)
                .find(|v| !self.contains(v))
                .ok_or(GenerationError::SetCoversDomain {
                    domain: self.domain,
                });
        }
        let mut last = None;
        for _ in 0..self.tries {
            let Some(candidate) = self.random_candidate() else {
                continue;
            };
            if !self.contains(&candidate) {
                return Ok(candidate);
            }
            last = Some(candidate);
        }
        tracing::debug!(
            domain = %self.domain,
            tries = self.tries,
            "no value outside the set found"
        );
        last.ok_or(GenerationError::SetCoversDomain {
            domain: self.domain,
        })
    }

    /// A value satisfying the value constraint.
    pub fn valid_value(&mut self) -> Result<Value, GenerationError> {
        if self.inverted {
            self.not_in_set()
        } else {
            self.random_element()
        }
    }

    /// A value violating the value constraint.
    pub fn invalid_value(&mut self) -> Result<Value, GenerationError> {
        if self.inverted {
            self.random_element()
        } else {
            self.not_in_set()
        }
    }
}
