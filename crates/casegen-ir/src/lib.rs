//! Data model of the test-data engine: value domains and their limits, the
//! test-case taxonomy, and the per-field configuration record.

pub mod config;
pub mod limits;
pub mod parse;
pub mod test_case;
pub mod value;

pub use config::{
    Bound, Configuration, Constraint, OtherwiseRef, PropertyFlags, PropertyKind, Reference,
    ValueSource,
};
pub use limits::{DomainLimits, Increment};
pub use test_case::{Boundary, Group, Side, TestCase};
pub use value::{Value, ValueDomain};
