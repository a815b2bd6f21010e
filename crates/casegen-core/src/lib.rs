//! Test-data engine: classifies every abstract test case for a field and
//! generates the concrete value for each applicable one, reproducibly from
//! a seed.

pub mod config;
pub mod engine;

pub use casegen_classify::ExpectedResult;
pub use casegen_ir::{Configuration, TestCase, Value, ValueDomain};
pub use config::EngineConfig;
pub use engine::{CasePlan, Engine, EngineError, FieldRequest, FieldResult, GeneratedCase};
