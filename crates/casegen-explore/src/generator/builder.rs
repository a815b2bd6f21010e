//! Generator factory that owns the seeded random source.

use rand_chacha::ChaCha8Rng;

use casegen_ir::{DomainLimits, Value, ValueDomain};

use super::pattern::PatternGenerator;
use super::raw::RawGenerator;
use super::rng::run_rng;
use super::set::SetGenerator;
use super::GenerationError;

/// Hands out generators that all draw from one deterministic stream.
pub struct GeneratorBuilder {
    rng: ChaCha8Rng,
    limits: DomainLimits,
    random_tries_to_invalid_value: usize,
    max_repetition: u32,
}

impl GeneratorBuilder {
    pub fn new(
        seed: &str,
        limits: DomainLimits,
        random_tries_to_invalid_value: usize,
        max_repetition: u32,
    ) -> Self {
        Self::from_rng(
            run_rng(seed),
            limits,
            random_tries_to_invalid_value,
            max_repetition,
        )
    }

    pub fn from_rng(
        rng: ChaCha8Rng,
        limits: DomainLimits,
        random_tries_to_invalid_value: usize,
        max_repetition: u32,
    ) -> Self {
        Self {
            rng,
            limits,
            random_tries_to_invalid_value,
            max_repetition,
        }
    }

    pub fn limits(&self) -> &DomainLimits {
        &self.limits
    }

    fn ordinal(&self, domain: ValueDomain, value: &Value) -> Result<i64, GenerationError> {
        let mismatch = GenerationError::DomainMismatch {
            expected: domain,
            found: value.domain(),
        };
        if domain == ValueDomain::String {
            // String bounds on the raw generator are lengths.
            return match value {
                Value::Integer(n) if *n >= 0 => Ok(*n),
                _ => Err(mismatch),
            };
        }
        self.limits
            .coerce(value, domain)
            .and_then(|v| self.limits.to_ordinal(&v))
            .ok_or(mismatch)
    }

    /// Raw generator over `[min, max]`; a missing bound is the domain limit.
    ///
    /// For the String domain the bounds are integer lengths.
    pub fn raw_generator(
        &mut self,
        domain: ValueDomain,
        min: Option<&Value>,
        max: Option<&Value>,
    ) -> Result<RawGenerator<'_, ChaCha8Rng>, GenerationError> {
        let min = min.map(|v| self.ordinal(domain, v)).transpose()?;
        let max = max.map(|v| self.ordinal(domain, v)).transpose()?;
        Ok(RawGenerator::from_ordinals(
            domain,
            self.limits.clone(),
            min,
            max,
            &mut self.rng,
        ))
    }

    /// Raw string generator over `[min, max]` characters.
    pub fn length_generator(
        &mut self,
        min: Option<usize>,
        max: Option<usize>,
    ) -> RawGenerator<'_, ChaCha8Rng> {
        let to_ordinal = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);
        RawGenerator::from_ordinals(
            ValueDomain::String,
            self.limits.clone(),
            min.map(to_ordinal),
            max.map(to_ordinal),
            &mut self.rng,
        )
    }

    pub fn regex_generator(
        &mut self,
        domain: ValueDomain,
        pattern: &str,
    ) -> Result<PatternGenerator<'_, ChaCha8Rng>, GenerationError> {
        PatternGenerator::new(
            domain,
            pattern,
            self.max_repetition,
            self.random_tries_to_invalid_value,
            &mut self.rng,
        )
    }

    pub fn list_generator(
        &mut self,
        domain: ValueDomain,
        values: &[Value],
        inverted: bool,
    ) -> Result<SetGenerator<'_, ChaCha8Rng>, GenerationError> {
        SetGenerator::new(
            domain,
            values,
            inverted,
            self.random_tries_to_invalid_value,
            self.limits.clone(),
            &mut self.rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn builder(seed: &str) -> GeneratorBuilder {
        GeneratorBuilder::new(seed, DomainLimits::default(), 10, 8)
    }

    #[test]
    fn test_raw_generator_from_values() {
        let mut b = builder("raw");
        let mut g = b
            .raw_generator(
                ValueDomain::Integer,
                Some(&Value::Integer(10)),
                Some(&Value::Integer(20)),
            )
            .unwrap();
        assert_eq!(g.median().unwrap(), Value::Integer(15));
    }

    #[test]
    fn test_raw_generator_dates() {
        let mut b = builder("dates");
        let day = |d| Value::Date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap());
        let mut g = b
            .raw_generator(ValueDomain::Date, Some(&day(1)), Some(&day(31)))
            .unwrap();
        assert_eq!(g.just_below_max().unwrap(), day(30));
        assert_eq!(g.median().unwrap(), day(16));
    }

    #[test]
    fn test_raw_generator_rejects_wrong_domain() {
        let mut b = builder("mismatch");
        let result = b.raw_generator(ValueDomain::Date, Some(&Value::Boolean(true)), None);
        assert!(matches!(
            result,
            Err(GenerationError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_length_generator() {
        let mut b = builder("len");
        let mut g = b.length_generator(Some(3), Some(5));
        let v = g.just_above_max().unwrap();
        assert_eq!(v.as_str().map(|s| s.chars().count()), Some(6));
    }

    #[test]
    fn test_same_seed_same_values() {
        let draw = |seed: &str| {
            let mut b = builder(seed);
            let mut values = Vec::new();
            for _ in 0..5 {
                let mut g = b.raw_generator(ValueDomain::Integer, None, None).unwrap();
                values.push(g.random_in_range().unwrap());
            }
            let mut p = b.regex_generator(ValueDomain::String, "[a-z]{4,8}").unwrap();
            values.push(Value::String(p.valid().unwrap()));
            values
        };
        assert_eq!(draw("same"), draw("same"));
        assert_ne!(draw("same"), draw("other"));
    }
}
