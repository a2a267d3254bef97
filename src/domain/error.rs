//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree-assembly contract.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A hierarchy row names a parent that has not been placed in the tree yet.
    #[error("hierarchy row {child_id} references unknown parent {parent_id} (rows out of order or malformed)")]
    DataIntegrity { child_id: String, parent_id: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
