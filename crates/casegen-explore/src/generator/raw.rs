//! Boundary, random and median generators over a domain's ordinal line.
//!
//! Missing bounds default to the domain limits. For the String domain the
//! ordinal is a length and the content is random alphanumerics drawn from
//! the shared source.

use rand::distributions::Alphanumeric;
use rand::Rng;

use casegen_ir::{Boundary, DomainLimits, Value, ValueDomain};

use super::GenerationError;

/// Random alphanumeric text of exactly `len` characters.
pub fn random_text<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

/// Raw generator for one domain and a pair of ordinal bounds.
pub struct RawGenerator<'a, R: Rng + ?Sized> {
    domain: ValueDomain,
    limits: DomainLimits,
    min: i64,
    max: i64,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> RawGenerator<'a, R> {
    /// Build from ordinal bounds; `None` falls back to the domain limit.
    pub fn from_ordinals(
        domain: ValueDomain,
        limits: DomainLimits,
        min: Option<i64>,
        max: Option<i64>,
        rng: &'a mut R,
    ) -> Self {
        let min = min.unwrap_or_else(|| limits.lower_limit(domain));
        let max = max.unwrap_or_else(|| limits.upper_limit(domain));
        Self {
            domain,
            limits,
            min,
            max,
            rng,
        }
    }

    pub fn domain(&self) -> ValueDomain {
        self.domain
    }

    fn lower(&self) -> i64 {
        self.limits.lower_limit(self.domain)
    }

    fn upper(&self) -> i64 {
        self.limits.upper_limit(self.domain)
    }

    fn unreachable(&self, boundary: Boundary) -> GenerationError {
        GenerationError::Unreachable {
            domain: self.domain,
            boundary,
        }
    }

    fn materialize(&mut self, ordinal: i64, boundary: Boundary) -> Result<Value, GenerationError> {
        if self.domain == ValueDomain::String {
            let len = usize::try_from(ordinal).map_err(|_| self.unreachable(boundary))?;
            return Ok(Value::String(random_text(&mut *self.rng, len)));
        }
        self.limits
            .from_ordinal(self.domain, ordinal)
            .ok_or_else(|| self.unreachable(boundary))
    }

    /// Uniform pick in the open interval `(lo, hi)`.
    fn open_between(&mut self, lo: i64, hi: i64, boundary: Boundary) -> Result<Value, GenerationError> {
        if hi - lo < 2 {
            return Err(self.unreachable(boundary));
        }
        let ordinal = self.rng.gen_range(lo + 1..hi);
        self.materialize(ordinal, boundary)
    }

    pub fn lowest(&mut self) -> Result<Value, GenerationError> {
        self.materialize(self.lower(), Boundary::Lowest)
    }

    pub fn random_below_min(&mut self) -> Result<Value, GenerationError> {
        self.open_between(self.lower(), self.min, Boundary::RandomBelowMin)
    }

    pub fn just_below_min(&mut self) -> Result<Value, GenerationError> {
        if self.min <= self.lower() {
            return Err(self.unreachable(Boundary::JustBelowMin));
        }
        self.materialize(self.min - 1, Boundary::JustBelowMin)
    }

    pub fn min(&mut self) -> Result<Value, GenerationError> {
        self.materialize(self.min, Boundary::Min)
    }

    pub fn just_above_min(&mut self) -> Result<Value, GenerationError> {
        if self.min >= self.upper() {
            return Err(self.unreachable(Boundary::JustAboveMin));
        }
        self.materialize(self.min + 1, Boundary::JustAboveMin)
    }

    pub fn zero(&mut self) -> Result<Value, GenerationError> {
        match self.domain {
            ValueDomain::Integer => Ok(Value::Integer(0)),
            ValueDomain::Double => Ok(Value::Double(0.0)),
            domain => Err(GenerationError::UnsupportedBoundary {
                domain,
                boundary: Boundary::Zero,
            }),
        }
    }

    pub fn median(&mut self) -> Result<Value, GenerationError> {
        if self.max < self.min {
            return Err(self.unreachable(Boundary::Median));
        }
        let ordinal = self.min + (self.max - self.min) / 2;
        self.materialize(ordinal, Boundary::Median)
    }

    pub fn random_between_min_and_max(&mut self) -> Result<Value, GenerationError> {
        self.open_between(self.min, self.max, Boundary::RandomBetweenMinMax)
    }

    pub fn just_below_max(&mut self) -> Result<Value, GenerationError> {
        if self.max <= self.lower() {
            return Err(self.unreachable(Boundary::JustBelowMax));
        }
        self.materialize(self.max - 1, Boundary::JustBelowMax)
    }

    pub fn max(&mut self) -> Result<Value, GenerationError> {
        self.materialize(self.max, Boundary::Max)
    }

    pub fn just_above_max(&mut self) -> Result<Value, GenerationError> {
        if self.max >= self.upper() {
            return Err(self.unreachable(Boundary::JustAboveMax));
        }
        self.materialize(self.max + 1, Boundary::JustAboveMax)
    }

    pub fn random_above_max(&mut self) -> Result<Value, GenerationError> {
        self.open_between(self.max, self.upper(), Boundary::RandomAboveMax)
    }

    pub fn greatest(&mut self) -> Result<Value, GenerationError> {
        self.materialize(self.upper(), Boundary::Greatest)
    }

    /// Any value in the closed range `[min, max]`.
    pub fn random_in_range(&mut self) -> Result<Value, GenerationError> {
        if self.max < self.min {
            return Err(self.unreachable(Boundary::RandomBetweenMinMax));
        }
        let ordinal = self.rng.gen_range(self.min..=self.max);
        self.materialize(ordinal, Boundary::RandomBetweenMinMax)
    }

    /// Dispatch on a boundary shape.
    pub fn at(&mut self, boundary: Boundary) -> Result<Value, GenerationError> {
        match boundary {
            Boundary::Lowest => self.lowest(),
            Boundary::RandomBelowMin => self.random_below_min(),
            Boundary::JustBelowMin => self.just_below_min(),
            Boundary::Min => self.min(),
            Boundary::JustAboveMin => self.just_above_min(),
            Boundary::Zero => self.zero(),
            Boundary::Median => self.median(),
            Boundary::RandomBetweenMinMax => self.random_between_min_and_max(),
            Boundary::JustBelowMax => self.just_below_max(),
            Boundary::Max => self.max(),
            Boundary::JustAboveMax => self.just_above_max(),
            Boundary::RandomAboveMax => self.random_above_max(),
            Boundary::Greatest => self.greatest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ints(min: i64, max: i64, rng: &mut ChaCha8Rng) -> RawGenerator<'_, ChaCha8Rng> {
        RawGenerator::from_ordinals(
            ValueDomain::Integer,
            DomainLimits::default(),
            Some(min),
            Some(max),
            rng,
        )
    }

    #[test]
    fn test_integer_boundaries() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut g = ints(10, 20, &mut rng);
        assert_eq!(g.min().unwrap(), Value::Integer(10));
        assert_eq!(g.max().unwrap(), Value::Integer(20));
        assert_eq!(g.median().unwrap(), Value::Integer(15));
        assert_eq!(g.just_above_min().unwrap(), Value::Integer(11));
        assert_eq!(g.just_below_max().unwrap(), Value::Integer(19));
        assert_eq!(g.just_below_min().unwrap(), Value::Integer(9));
        assert_eq!(g.just_above_max().unwrap(), Value::Integer(21));
        assert_eq!(g.zero().unwrap(), Value::Integer(0));
    }

    #[test]
    fn test_random_variants_stay_in_open_intervals() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut g = ints(10, 20, &mut rng);
        for _ in 0..200 {
            match g.random_between_min_and_max().unwrap() {
                Value::Integer(v) => assert!(v > 10 && v < 20),
                other => panic!("unexpected {other:?}"),
            }
            match g.random_below_min().unwrap() {
                Value::Integer(v) => assert!(v < 10),
                other => panic!("unexpected {other:?}"),
            }
            match g.random_above_max().unwrap() {
                Value::Integer(v) => assert!(v > 20),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_limits_are_lowest_and_greatest() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let limits = DomainLimits::default();
        let mut g = ints(10, 20, &mut rng);
        assert_eq!(
            g.lowest().unwrap(),
            Value::Integer(limits.lower_limit(ValueDomain::Integer))
        );
        assert_eq!(
            g.greatest().unwrap(),
            Value::Integer(limits.upper_limit(ValueDomain::Integer))
        );
    }

    #[test]
    fn test_unreachable_at_domain_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let limits = DomainLimits::default();
        let lo = limits.lower_limit(ValueDomain::Integer);
        let mut g = ints(lo, 0, &mut rng);
        assert!(matches!(
            g.just_below_min(),
            Err(GenerationError::Unreachable { .. })
        ));
        assert!(g.random_below_min().is_err());
    }

    #[test]
    fn test_narrow_range_has_no_random_between() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut g = ints(10, 11, &mut rng);
        assert!(g.random_between_min_and_max().is_err());
    }

    #[test]
    fn test_string_lengths() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut g = RawGenerator::from_ordinals(
            ValueDomain::String,
            DomainLimits::default(),
            Some(10),
            Some(20),
            &mut rng,
        );
        let len = |v: Value| v.as_str().map(|s| s.chars().count()).unwrap();
        assert_eq!(len(g.min().unwrap()), 10);
        assert_eq!(len(g.median().unwrap()), 15);
        assert!(len(g.just_below_max().unwrap()) < 20);
        assert_eq!(len(g.lowest().unwrap()), 0);
        assert_eq!(len(g.greatest().unwrap()), 1024);
    }

    #[test]
    fn test_double_steps_by_fraction() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut g = RawGenerator::from_ordinals(
            ValueDomain::Double,
            DomainLimits::default(),
            Some(150),
            Some(250),
            &mut rng,
        );
        assert_eq!(g.min().unwrap(), Value::Double(1.5));
        assert_eq!(g.just_above_min().unwrap(), Value::Double(1.51));
        assert_eq!(g.median().unwrap(), Value::Double(2.0));
    }

    #[test]
    fn test_zero_undefined_for_dates() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut g = RawGenerator::from_ordinals(
            ValueDomain::Date,
            DomainLimits::default(),
            None,
            None,
            &mut rng,
        );
        assert!(matches!(
            g.zero(),
            Err(GenerationError::UnsupportedBoundary { .. })
        ));
    }
}
