//! Branch builder: turns a flat hierarchy listing into a `GroupNode` tree.

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::entities::{Group, GroupNode, HierarchyRow, PackageCounts};
use crate::domain::error::DomainResult;

/// Builds one branch of the group tree.
///
/// The root carries the summed direct counts of itself and every row in the
/// listing. Descendants carry only their own direct count. At most one node,
/// the first in listing order whose name matches the highlight target, is
/// flagged highlighted.
#[derive(Debug)]
pub struct TreeBuilder<'a> {
    pkg_count: &'a PackageCounts,
    highlight: Option<&'a str>,
    expand_top: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(pkg_count: &'a PackageCounts) -> Self {
        Self {
            pkg_count,
            highlight: None,
            expand_top: false,
        }
    }

    /// Name of the group to flag as highlighted.
    pub fn highlight(mut self, name: Option<&'a str>) -> Self {
        self.highlight = name;
        self
    }

    pub fn expand_top(mut self, expand_top: bool) -> Self {
        self.expand_top = expand_top;
        self
    }

    /// Sum of the direct counts of `root` and all `rows`.
    pub fn root_count(&self, root: &Group, rows: &[HierarchyRow]) -> u64 {
        self.pkg_count.get(&root.name)
            + rows
                .iter()
                .map(|row| self.pkg_count.get(&row.name))
                .sum::<u64>()
    }

    /// Build the branch rooted at `root` from its descendant listing.
    ///
    /// Fails with `DataIntegrity` if a row arrives before its parent.
    #[instrument(level = "debug", skip(self, root, rows), fields(root = %root.name, rows = rows.len()))]
    pub fn build(&self, root: &Group, rows: &[HierarchyRow]) -> DomainResult<GroupNode> {
        let mut highlight = self.highlight;
        let mut tree = TreeArena::new();

        let root_count = self.root_count(root, rows);
        let root_idx = tree.insert_root(GroupNode::top(root, root_count, self.expand_top));
        if highlight == Some(root.name.as_str()) {
            Self::flag(&mut tree, root_idx);
            highlight = None;
        }

        for row in rows {
            let node = GroupNode::descendant(row, self.pkg_count.get(&row.name));
            let idx = tree.insert_child(&row.parent_id, node)?;
            if highlight == Some(row.name.as_str()) {
                Self::flag(&mut tree, idx);
                highlight = None;
            }
        }

        if let Some(name) = highlight {
            debug!("highlight target {} not found below {}", name, root.name);
        }

        let root_node = tree
            .into_tree()
            .unwrap_or_else(|| GroupNode::top(root, root_count, self.expand_top));
        info!("Root Node: {}", root_node);
        Ok(root_node)
    }

    fn flag(tree: &mut TreeArena, idx: Index) {
        if let Some(slot) = tree.get_node_mut(idx) {
            slot.node.highlight();
        }
    }
}

/// Convenience wrapper building a branch in one call.
pub fn build_branch(
    root: &Group,
    rows: &[HierarchyRow],
    pkg_count: &PackageCounts,
    highlight: Option<&str>,
    expand_top: bool,
) -> DomainResult<GroupNode> {
    TreeBuilder::new(pkg_count)
        .highlight(highlight)
        .expand_top(expand_top)
        .build(root, rows)
}
