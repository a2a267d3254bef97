//! Collaborator traits for the data layer and access checks
//!
//! These traits abstract the host application's persistence and session
//! state, allowing services to be tested with in-memory implementations.

use thiserror::Error;

use crate::domain::{Group, HierarchyRow};

/// Failure reported by a repository backend.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),
}

/// Result type for repository calls.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read access to groups and their hierarchy.
pub trait GroupRepository: Send + Sync {
    /// Look a group up by id, then by name.
    fn resolve(&self, name_or_id: &str) -> RepositoryResult<Option<Group>>;

    /// Direct children of `group` with type `group_type`, in storage order.
    fn children_groups(&self, group: &Group, group_type: &str) -> RepositoryResult<Vec<Group>>;

    /// Ancestors of `group` of type `group_type`, root first.
    /// Empty when `group` is itself a root.
    fn parent_group_hierarchy(
        &self,
        group: &Group,
        group_type: &str,
    ) -> RepositoryResult<Vec<Group>>;

    /// All descendants of `group` of type `group_type`.
    /// Every row's parent appears before the row itself.
    fn children_group_hierarchy(
        &self,
        group: &Group,
        group_type: &str,
    ) -> RepositoryResult<Vec<HierarchyRow>>;

    /// Groups of type `group_type` without a parent, in storage order.
    fn top_groups(&self, group_type: &str) -> RepositoryResult<Vec<Group>>;
}

/// Whether the user behind the current request is a sysadmin.
pub trait AdminCheck: Send + Sync {
    fn is_current_user_admin(&self) -> bool;
}

// ============================================================
// IMPLEMENTATIONS
// ============================================================

/// Fixed answer, for embedding hosts that resolve the user themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticAdminCheck(pub bool);

impl AdminCheck for StaticAdminCheck {
    fn is_current_user_admin(&self) -> bool {
        self.0
    }
}

/// Admin iff the current user is in the configured sysadmin list.
#[derive(Debug, Clone, Default)]
pub struct SysadminList {
    sysadmins: Vec<String>,
    current_user: Option<String>,
}

impl SysadminList {
    pub fn new(sysadmins: Vec<String>, current_user: Option<String>) -> Self {
        Self {
            sysadmins,
            current_user,
        }
    }
}

impl AdminCheck for SysadminList {
    fn is_current_user_admin(&self) -> bool {
        match &self.current_user {
            Some(user) => self.sysadmins.iter().any(|admin| admin == user),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_anonymous_user_when_checking_admin_then_false() {
        let check = SysadminList::new(vec!["alice".into()], None);
        assert!(!check.is_current_user_admin());
    }

    #[test]
    fn given_listed_user_when_checking_admin_then_true() {
        let check = SysadminList::new(vec!["alice".into()], Some("alice".into()));
        assert!(check.is_current_user_admin());
        let other = SysadminList::new(vec!["alice".into()], Some("bob".into()));
        assert!(!other.is_current_user_admin());
    }
}
