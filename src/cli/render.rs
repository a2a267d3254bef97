/*
Tree rendering for terminal output.

termtree only knows its own Tree type, so GroupNode gets a conversion trait.
 */
use colored::Colorize;
use termtree::Tree;

use crate::domain::GroupNode;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for GroupNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(label(self)).with_leaves(leaves)
    }
}

fn label(node: &GroupNode) -> String {
    let text = format!("{} [{}]", node.title, node.pkg_num);
    if node.highlighted {
        format!("{} {}", text.green().bold(), "<".green())
    } else if node.is_top_org {
        text.bold().to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Group, HierarchyRow, PackageCounts, TreeBuilder};

    #[test]
    fn given_branch_when_rendering_then_lists_every_title() {
        colored::control::set_override(false);
        let counts: PackageCounts = [("health", 3), ("district-a", 2)].into_iter().collect();
        let root = Group::new("health", "health", "Health", "group");
        let rows: Vec<HierarchyRow> = vec![
            ("d1", "district-a", "District A", "health").into(),
            ("d2", "district-b", "District B", "health").into(),
        ];
        let node = TreeBuilder::new(&counts).build(&root, &rows).unwrap();

        let rendered = node.to_tree_string().to_string();
        assert!(rendered.starts_with("Health [5]"));
        assert!(rendered.contains("District A [2]"));
        assert!(rendered.contains("District B [0]"));
    }
}
