//! Domain entities: core data structures

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Group type used when a request does not name one.
pub const DEFAULT_GROUP_TYPE: &str = "group";

fn default_group_type() -> String {
    DEFAULT_GROUP_TYPE.to_string()
}

/// An organizational or category group as stored by the host catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub title: String,
    /// Group type, e.g. "group" or "organization"
    #[serde(rename = "type", default = "default_group_type")]
    pub group_type: String,
}

impl Group {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        title: impl Into<String>,
        group_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            group_type: group_type.into(),
        }
    }
}

/// One descendant of a root group as listed by the hierarchy query.
///
/// Rows arrive ordered so that `parent_id` always refers to the root or
/// to a row seen earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyRow {
    pub id: String,
    pub name: String,
    pub title: String,
    pub parent_id: String,
}

impl<I, N, T, P> From<(I, N, T, P)> for HierarchyRow
where
    I: Into<String>,
    N: Into<String>,
    T: Into<String>,
    P: Into<String>,
{
    fn from((id, name, title, parent_id): (I, N, T, P)) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            parent_id: parent_id.into(),
        }
    }
}

/// Direct package count per group name.
///
/// Names without an entry count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageCounts(HashMap<String, u64>);

impl PackageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct count for `name`, 0 when absent.
    pub fn get(&self, name: &str) -> u64 {
        self.0.get(name).copied().unwrap_or(0)
    }

    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        self.0.insert(name.into(), count);
    }

    /// Add one package to `name`.
    pub fn increment(&mut self, name: &str) {
        *self.0.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for PackageCounts {
    fn from_iter<T: IntoIterator<Item = (K, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Rendered tree node handed to the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupNode {
    pub id: String,
    /// Package count, string formatted for the templates
    pub pkg_num: String,
    pub name: String,
    pub title: String,
    pub is_top_org: bool,
    pub expand_top: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub children: Vec<GroupNode>,
}

impl GroupNode {
    /// Root node of a branch, carrying the aggregated count.
    pub fn top(group: &Group, pkg_num: u64, expand_top: bool) -> Self {
        Self {
            id: group.id.clone(),
            pkg_num: pkg_num.to_string(),
            name: group.name.clone(),
            title: group.title.clone(),
            is_top_org: true,
            expand_top,
            highlighted: false,
            children: Vec::new(),
        }
    }

    /// Descendant node, carrying only its direct count.
    pub fn descendant(row: &HierarchyRow, pkg_num: u64) -> Self {
        Self {
            id: row.id.clone(),
            pkg_num: pkg_num.to_string(),
            name: row.name.clone(),
            title: row.title.clone(),
            is_top_org: false,
            expand_top: false,
            highlighted: false,
            children: Vec::new(),
        }
    }

    pub fn add_child_node(&mut self, child: GroupNode) {
        self.children.push(child);
    }

    pub fn highlight(&mut self) {
        self.highlighted = true;
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> GroupNodeIter<'_> {
        GroupNodeIter { stack: vec![self] }
    }

    /// First node named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&GroupNode> {
        self.iter().find(|node| node.name == name)
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(GroupNode::depth)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for GroupNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.name, self.pkg_num)
    }
}

pub struct GroupNodeIter<'a> {
    stack: Vec<&'a GroupNode>,
}

impl<'a> Iterator for GroupNodeIter<'a> {
    type Item = &'a GroupNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}
