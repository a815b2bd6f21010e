//! Concrete value synthesis: raw boundary generators, pattern-based
//! generators, set-based generators, and the builder that owns the seeded
//! random source they all draw from.

pub mod generator;

pub use generator::builder::GeneratorBuilder;
pub use generator::pattern::PatternGenerator;
pub use generator::raw::RawGenerator;
pub use generator::set::SetGenerator;
pub use generator::GenerationError;
