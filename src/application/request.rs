//! Request payloads for the tree operations
//!
//! Both requests mirror the data dictionaries posted by the web layer: every
//! key is optional on the wire and required keys are checked with
//! [`require`] when the operation runs.

use serde::Deserialize;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Group, PackageCounts};

/// Input of `group_tree`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupTreeRequest {
    /// Forest roots, required
    pub top_groups: Option<Vec<Group>>,
    /// Group type filter, defaults to the service default
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub pkg_count: Option<PackageCounts>,
}

impl GroupTreeRequest {
    pub fn new(top_groups: Vec<Group>) -> Self {
        Self {
            top_groups: Some(top_groups),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, group_type: impl Into<String>) -> Self {
        self.group_type = Some(group_type.into());
        self
    }

    pub fn with_pkg_count(mut self, pkg_count: PackageCounts) -> Self {
        self.pkg_count = Some(pkg_count);
        self
    }

    /// Parse a JSON data dictionary.
    pub fn from_json(json: &str) -> ApplicationResult<Self> {
        parse_json(json, "group_tree")
    }
}

/// Input of `group_tree_section`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GroupTreeSectionRequest {
    /// Id or name of the group to locate and highlight, required
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub group_type: Option<String>,
    pub pkg_count: Option<PackageCounts>,
}

impl GroupTreeSectionRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, group_type: impl Into<String>) -> Self {
        self.group_type = Some(group_type.into());
        self
    }

    pub fn with_pkg_count(mut self, pkg_count: PackageCounts) -> Self {
        self.pkg_count = Some(pkg_count);
        self
    }

    /// Parse a JSON data dictionary.
    pub fn from_json(json: &str) -> ApplicationResult<Self> {
        parse_json(json, "group_tree_section")
    }
}

/// Unwrap a required key or fail with `MissingParameter`.
pub fn require<'a, T>(value: Option<&'a T>, key: &str) -> ApplicationResult<&'a T> {
    value.ok_or_else(|| ApplicationError::MissingParameter(key.to_string()))
}

/// Explicitly requested type, treating an empty string as not given.
pub(crate) fn requested_type(group_type: &Option<String>) -> Option<&str> {
    group_type.as_deref().filter(|t| !t.is_empty())
}

fn parse_json<T: for<'de> Deserialize<'de>>(json: &str, operation: &str) -> ApplicationResult<T> {
    serde_json::from_str(json).map_err(|e| ApplicationError::OperationFailed {
        context: format!("parse {} request", operation),
        source: Box::new(e),
    })
}
