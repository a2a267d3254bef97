//! Scoped arena used while a branch is assembled.
//!
//! Rows attach to parents by group id, so nodes are kept flat in a
//! generational arena with an id index until the whole listing has been
//! consumed. [`TreeArena::into_tree`] then moves them into an owned
//! [`GroupNode`] tree.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::GroupNode;
use crate::domain::error::{DomainError, DomainResult};

/// Node slot in the arena. `node.children` stays empty until assembly.
#[derive(Debug)]
pub struct TreeNode {
    pub node: GroupNode,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    /// Group id to the latest node inserted under that id
    by_id: HashMap<String, Index>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the branch root. Replaces any previous root.
    #[instrument(level = "trace", skip(self, node), fields(id = %node.id))]
    pub fn insert_root(&mut self, node: GroupNode) -> Index {
        let id = node.id.clone();
        let idx = self.arena.insert(TreeNode {
            node,
            children: Vec::new(),
        });
        self.by_id.insert(id, idx);
        self.root = Some(idx);
        idx
    }

    /// Insert `node` below the node registered for `parent_id`.
    #[instrument(level = "trace", skip(self, node), fields(id = %node.id))]
    pub fn insert_child(&mut self, parent_id: &str, node: GroupNode) -> DomainResult<Index> {
        let parent_idx = self
            .by_id
            .get(parent_id)
            .copied()
            .ok_or_else(|| DomainError::DataIntegrity {
                child_id: node.id.clone(),
                parent_id: parent_id.to_string(),
            })?;

        let id = node.id.clone();
        let idx = self.arena.insert(TreeNode {
            node,
            children: Vec::new(),
        });
        if let Some(parent) = self.arena.get_mut(parent_idx) {
            parent.children.push(idx);
        }
        self.by_id.insert(id, idx);
        Ok(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Consume the arena and return the owned tree, None for an empty arena.
    #[instrument(level = "trace", skip(self))]
    pub fn into_tree(mut self) -> Option<GroupNode> {
        let root = self.root?;
        Self::assemble(&mut self.arena, root)
    }

    fn assemble(arena: &mut Arena<TreeNode>, idx: Index) -> Option<GroupNode> {
        let TreeNode { mut node, children } = arena.remove(idx)?;
        for child_idx in children {
            if let Some(child) = Self::assemble(arena, child_idx) {
                node.add_child_node(child);
            }
        }
        Some(node)
    }
}
