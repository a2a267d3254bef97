//! Error conversion helpers for collaborator calls
//!
//! Provides an extension trait for cleaner error handling with group context.

use crate::application::{ApplicationError, ApplicationResult};
use crate::infrastructure::traits::RepositoryResult;

/// Extension trait for converting `RepositoryResult` to `ApplicationResult` with context.
pub trait RepositoryResultExt<T> {
    /// Add the query name and group to a repository error.
    ///
    /// # Example
    /// ```ignore
    /// repo.children_groups(&group, "group")
    ///     .with_group_context("children groups", &group.name)?;
    /// ```
    fn with_group_context(self, query: &str, group: &str) -> ApplicationResult<T>;
}

impl<T> RepositoryResultExt<T> for RepositoryResult<T> {
    fn with_group_context(self, query: &str, group: &str) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", query, group),
            source: Box::new(e),
        })
    }
}
