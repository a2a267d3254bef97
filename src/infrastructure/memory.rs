//! In-memory group repository
//!
//! Holds groups in insertion order plus a child → parent id map. Backs the
//! catalog file and tests.

use std::collections::{HashMap, HashSet};

use crate::domain::{Group, HierarchyRow};
use crate::infrastructure::traits::{GroupRepository, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupRepository {
    groups: Vec<Group>,
    /// child id -> parent id
    parents: HashMap<String, String>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `group` below the group with id `parent_id`, or as a root.
    pub fn insert(&mut self, group: Group, parent_id: Option<&str>) {
        if let Some(parent_id) = parent_id {
            self.parents.insert(group.id.clone(), parent_id.to_string());
        }
        self.groups.push(group);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_group(mut self, group: Group, parent_id: Option<&str>) -> Self {
        self.insert(group, parent_id);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn parent_of(&self, id: &str) -> Option<&Group> {
        self.parents.get(id).and_then(|pid| self.get(pid))
    }

    fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Group> + 'a {
        self.groups
            .iter()
            .filter(move |g| self.parents.get(&g.id).map(String::as_str) == Some(id))
    }
}

impl GroupRepository for InMemoryGroupRepository {
    fn resolve(&self, name_or_id: &str) -> RepositoryResult<Option<Group>> {
        Ok(self
            .get(name_or_id)
            .or_else(|| self.groups.iter().find(|g| g.name == name_or_id))
            .cloned())
    }

    fn children_groups(&self, group: &Group, group_type: &str) -> RepositoryResult<Vec<Group>> {
        Ok(self
            .children_of(&group.id)
            .filter(|g| g.group_type == group_type)
            .cloned()
            .collect())
    }

    fn parent_group_hierarchy(
        &self,
        group: &Group,
        group_type: &str,
    ) -> RepositoryResult<Vec<Group>> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([group.id.as_str()]);
        let mut current = group.id.as_str();

        while let Some(parent) = self.parent_of(current) {
            if parent.group_type != group_type {
                break;
            }
            if !visited.insert(parent.id.as_str()) {
                return Err(RepositoryError::Query(format!(
                    "cycle in parent hierarchy at {}",
                    parent.id
                )));
            }
            chain.push(parent.clone());
            current = parent.id.as_str();
        }

        chain.reverse();
        Ok(chain)
    }

    fn children_group_hierarchy(
        &self,
        group: &Group,
        group_type: &str,
    ) -> RepositoryResult<Vec<HierarchyRow>> {
        let mut rows = Vec::new();
        let mut visited = HashSet::from([group.id.as_str()]);
        let mut stack: Vec<&Group> = self
            .children_of(&group.id)
            .filter(|g| g.group_type == group_type)
            .collect();
        stack.reverse();

        // Pre-order: a row is emitted before any of its descendants
        while let Some(current) = stack.pop() {
            if !visited.insert(current.id.as_str()) {
                return Err(RepositoryError::Query(format!(
                    "cycle in child hierarchy at {}",
                    current.id
                )));
            }
            let parent_id = self.parents.get(&current.id).cloned().unwrap_or_default();
            rows.push(HierarchyRow {
                id: current.id.clone(),
                name: current.name.clone(),
                title: current.title.clone(),
                parent_id,
            });

            let mut children: Vec<&Group> = self
                .children_of(&current.id)
                .filter(|g| g.group_type == group_type)
                .collect();
            children.reverse();
            stack.extend(children);
        }

        Ok(rows)
    }

    fn top_groups(&self, group_type: &str) -> RepositoryResult<Vec<Group>> {
        Ok(self
            .groups
            .iter()
            .filter(|g| g.group_type == group_type && !self.parents.contains_key(&g.id))
            .cloned()
            .collect())
    }
}
