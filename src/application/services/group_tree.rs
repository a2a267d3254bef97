//! Group tree service
//!
//! Resolves which roots to expand for a request and builds one branch per
//! root from the repository's hierarchy listing.

use std::collections::HashSet;
use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::application::error_ext::RepositoryResultExt;
use crate::application::request::{require, requested_type};
use crate::application::{
    ApplicationError, ApplicationResult, GroupTreeRequest, GroupTreeSectionRequest,
};
use crate::domain::{Group, GroupNode, PackageCounts, TreeBuilder, DEFAULT_GROUP_TYPE};
use crate::infrastructure::traits::{AdminCheck, GroupRepository};

/// Service building group trees for the view layer.
pub struct GroupTreeService {
    repo: Arc<dyn GroupRepository>,
    admin: Arc<dyn AdminCheck>,
    default_type: String,
}

impl GroupTreeService {
    /// Create a new service filtering on `"group"` by default.
    pub fn new(repo: Arc<dyn GroupRepository>, admin: Arc<dyn AdminCheck>) -> Self {
        Self {
            repo,
            admin,
            default_type: DEFAULT_GROUP_TYPE.to_string(),
        }
    }

    /// Type used when a request does not name one.
    pub fn with_default_type(mut self, group_type: impl Into<String>) -> Self {
        self.default_type = group_type.into();
        self
    }

    /// Full group tree: one branch per forest root.
    ///
    /// Admins get a branch for every top group, in request order, with
    /// `expand_top` set. Everyone else gets a branch for every direct child
    /// of the top groups, sorted by name.
    #[instrument(level = "debug", skip(self, request))]
    pub fn group_tree(&self, request: &GroupTreeRequest) -> ApplicationResult<Vec<GroupNode>> {
        let top_groups = require(request.top_groups.as_ref(), "top_groups")?;
        let group_type =
            requested_type(&request.group_type).unwrap_or(self.default_type.as_str());
        let empty = PackageCounts::default();
        let pkg_count = request.pkg_count.as_ref().unwrap_or(&empty);
        debug!(
            "group_tree: {} top groups, type={}",
            top_groups.len(),
            group_type
        );

        if self.admin.is_current_user_admin() {
            return top_groups
                .iter()
                .map(|group| self.branch(group, pkg_count, None, group_type, true))
                .collect();
        }

        let mut children = Vec::new();
        for top_group in top_groups {
            children.extend(
                self.repo
                    .children_groups(top_group, group_type)
                    .with_group_context("children groups", &top_group.name)?,
            );
        }
        let (visible, dropped) = visible_children(children);
        if !dropped.is_empty() {
            warn!(
                "group_tree: dropped {} duplicate child groups: {}",
                dropped.len(),
                dropped.join(", ")
            );
        }
        debug!("group_tree: {} visible child groups", visible.len());

        visible
            .iter()
            .map(|group| self.branch(group, pkg_count, None, group_type, false))
            .collect()
    }

    /// Section of the tree containing the requested group, from its
    /// top-most ancestor down, with that group highlighted.
    #[instrument(level = "debug", skip(self, request))]
    pub fn group_tree_section(
        &self,
        request: &GroupTreeSectionRequest,
    ) -> ApplicationResult<GroupNode> {
        let name_or_id = require(request.id.as_ref(), "id")?;
        let group = self
            .repo
            .resolve(name_or_id)
            .with_group_context("resolve group", name_or_id)?
            .ok_or_else(|| ApplicationError::ObjectNotFound(name_or_id.clone()))?;

        let requested = requested_type(&request.group_type);
        let group_type = requested.unwrap_or(self.default_type.as_str());
        if group.group_type != group_type {
            let how_type_was_set = if requested.is_some() {
                "was specified"
            } else {
                "is filtered by default"
            };
            return Err(ApplicationError::Validation {
                message: format!(
                    "Group type is \"{}\" not \"{}\" that {}",
                    group.group_type, group_type, how_type_was_set
                ),
            });
        }

        let ancestors = self
            .repo
            .parent_group_hierarchy(&group, group_type)
            .with_group_context("parent group hierarchy", &group.name)?;
        let root = ancestors.first().unwrap_or(&group);
        debug!("group_tree_section: {} is rooted at {}", group.name, root.name);

        let empty = PackageCounts::default();
        let pkg_count = request.pkg_count.as_ref().unwrap_or(&empty);
        self.branch(root, pkg_count, Some(group.name.as_str()), group_type, false)
    }

    fn branch(
        &self,
        root: &Group,
        pkg_count: &PackageCounts,
        highlight: Option<&str>,
        group_type: &str,
        expand_top: bool,
    ) -> ApplicationResult<GroupNode> {
        let rows = self
            .repo
            .children_group_hierarchy(root, group_type)
            .with_group_context("children group hierarchy", &root.name)?;

        let node = TreeBuilder::new(pkg_count)
            .highlight(highlight)
            .expand_top(expand_top)
            .build(root, &rows)?;
        Ok(node)
    }
}

/// Child groups deduplicated by id (first occurrence wins) and sorted by
/// name, plus the ids of the dropped duplicates.
fn visible_children(children: Vec<Group>) -> (Vec<Group>, Vec<String>) {
    let mut seen = HashSet::new();
    let (kept, duplicates): (Vec<Group>, Vec<Group>) = children
        .into_iter()
        .partition(|group| seen.insert(group.id.clone()));
    let visible = kept
        .into_iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .collect();
    let dropped = duplicates.into_iter().map(|group| group.id).collect();
    (visible, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: &str, name: &str) -> Group {
        Group::new(id, name, name.to_uppercase(), "group")
    }

    #[test]
    fn given_shared_children_when_filtering_then_reports_dropped_ids() {
        let children = vec![
            group("d2", "district-b"),
            group("d1", "district-a"),
            group("d2", "district-b"),
            group("d1", "district-a"),
        ];

        let (visible, dropped) = visible_children(children);

        let names: Vec<&str> = visible.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["district-a", "district-b"]);
        assert_eq!(dropped, vec!["d2", "d1"]);
    }

    #[test]
    fn given_distinct_children_when_filtering_then_nothing_dropped() {
        let (visible, dropped) =
            visible_children(vec![group("b", "beta"), group("a", "alpha")]);

        assert_eq!(visible.len(), 2);
        assert!(dropped.is_empty());
    }
}
