//! Boundary and equivalence classification of abstract test cases.

pub mod bounds;
pub mod classify;

pub use bounds::{length_bounds, value_bounds, MalformedBound, ResolvedBounds};
pub use classify::{is_degenerate_format, Classifier, ExpectedResult, DEGENERATE_FORMATS};
