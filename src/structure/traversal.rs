//! Depth-first traversal of structure trees.
//!
//! Pre-order, children in logical order, driven by an explicit stack so deep
//! trees cannot overflow the call stack.

use super::tree::{Lookup, StructureTree};
use super::types::{NodeId, StructNode};

/// An element visited during traversal.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    /// The element
    pub node: &'a StructNode,
    /// Depth below the traversal start (roots are 0)
    pub depth: usize,
}

/// Pre-order iterator over a tree or subtree.
pub struct DepthFirst<'a> {
    tree: &'a StructureTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> DepthFirst<'a> {
    /// Traverse the whole tree, root by root.
    pub fn new(tree: &'a StructureTree) -> Self {
        let stack = tree.roots().iter().rev().map(|id| (*id, 0)).collect();
        Self { tree, stack }
    }

    /// Traverse the subtree rooted at `root` (inclusive).
    pub fn from_node(tree: &'a StructureTree, root: NodeId) -> Self {
        Self {
            tree,
            stack: vec![(root, 0)],
        }
    }
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, depth)) = self.stack.pop() {
            let node = match self.tree.node(id) {
                Lookup::Found(node) => node,
                _ => {
                    log::warn!("Skipping dangling structure element {} during traversal", id);
                    continue;
                },
            };
            let children: Vec<NodeId> = node.child_nodes().collect();
            self.stack
                .extend(children.into_iter().rev().map(|child| (child, depth + 1)));
            return Some(Visit { node, depth });
        }
        None
    }
}

/// Traverse the whole tree in document order.
pub fn traverse_structure_tree(tree: &StructureTree) -> DepthFirst<'_> {
    DepthFirst::new(tree)
}

/// Marked content IDs of `page` in logical reading order.
pub fn extract_reading_order(tree: &StructureTree, page: u32) -> Vec<u32> {
    traverse_structure_tree(tree)
        .flat_map(|visit| visit.node.marked_content())
        .filter(|(p, _)| *p == page)
        .map(|(_, mcid)| mcid)
        .collect()
}
