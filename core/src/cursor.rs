//! A read-only cursor through a built tree.
//!
//! This is used by the provers to walk from the root toward a named node while observing the
//! sibling passed over at every step.

use crate::{node::Node, tree::Tree};

/// Which child of the current node a step descended into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The left child.
    Left,
    /// The right child.
    Right,
}

/// A cursor over the nodes of a [`Tree`], starting at the root.
pub struct Cursor<'a, H> {
    tree: &'a Tree<H>,
    node: &'a Node,
}

impl<'a, H> Cursor<'a, H> {
    /// Create a cursor positioned at the root.
    pub fn new(tree: &'a Tree<H>) -> Self {
        Cursor {
            tree,
            node: tree.root(),
        }
    }

    /// The current node.
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Peek at the children of the current node.
    pub fn peek_children(&self) -> (Option<&'a Node>, Option<&'a Node>) {
        (self.tree.left(self.node), self.tree.right(self.node))
    }

    /// Descend into the child whose key equals `key`, checking the left child first.
    ///
    /// Returns the step taken, or `None` without moving if neither child has that key.
    pub fn down_to(&mut self, key: &str) -> Option<Step> {
        let (left, right) = self.peek_children();
        let (step, child) = match (left, right) {
            (Some(l), _) if l.key() == key => (Step::Left, l),
            (_, Some(r)) if r.key() == key => (Step::Right, r),
            _ => return None,
        };

        self.node = child;
        Some(step)
    }
}
