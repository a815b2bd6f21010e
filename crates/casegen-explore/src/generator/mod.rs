pub mod builder;
pub mod pattern;
pub mod raw;
pub mod rng;
pub mod set;

use casegen_ir::{Boundary, Reference, ValueDomain};

/// Errors while synthesizing a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("{boundary:?} has no free value in domain {domain}")]
    Unreachable {
        domain: ValueDomain,
        boundary: Boundary,
    },

    #[error("{boundary:?} is undefined for domain {domain}")]
    UnsupportedBoundary {
        domain: ValueDomain,
        boundary: Boundary,
    },

    #[error("malformed pattern '{pattern}': {message}")]
    MalformedPattern { pattern: String, message: String },

    #[error("pattern '{pattern}' cannot be generated: {reason}")]
    UnsupportedPattern { pattern: String, reason: String },

    #[error("pattern '{pattern}' yielded no matching value after {tries} tries")]
    Unsatisfiable { pattern: String, tries: usize },

    #[error("value set is empty")]
    EmptySet,

    #[error("value set covers every value of domain {domain}")]
    SetCoversDomain { domain: ValueDomain },

    #[error("value of domain {found} does not fit domain {expected}")]
    DomainMismatch {
        expected: ValueDomain,
        found: ValueDomain,
    },

    #[error("reference {0:?} was not resolved before generation")]
    UnresolvedReference(Reference),
}
