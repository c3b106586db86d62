//! Construction and navigation of heap-addressed Merkle trees.
//!
//! The input labels are treated as a binary heap: the label at position `i` becomes a node and
//! its children are the labels at positions `2i + 1` and `2i + 2`, where present. Every label
//! becomes a node, and whether a node is a leaf depends only on whether those positions exist.
//!
//! Digests are computed bottom-up during construction. A tree is immutable once built and can be
//! shared freely between threads that generate witnesses from it.

use crate::{
    hasher::{BinaryHash, Digest},
    key_path::KeyPath,
    node::{heap_position, Node},
};

use alloc::{string::String, vec::Vec};
use core::{fmt, marker::PhantomData};

/// Tree construction was requested with no labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyInput;

impl fmt::Display for EmptyInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cannot build a tree from zero labels")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EmptyInput {}

/// A Merkle tree over an ordered list of labels, hashed with `H`.
///
/// Nodes are held in heap order; the node at storage position `p` was built from label `p`.
pub struct Tree<H> {
    // Never empty.
    nodes: Vec<Node>,
    _marker: PhantomData<fn() -> H>,
}

impl<H> Clone for Tree<H> {
    fn clone(&self) -> Self {
        Tree {
            nodes: self.nodes.clone(),
            _marker: PhantomData,
        }
    }
}

impl<H> fmt::Debug for Tree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.nodes.len())
            .field("commitment", &hex::encode(self.commitment()))
            .finish()
    }
}

impl<H: BinaryHash> Tree<H> {
    /// Build a tree over `labels`, in order.
    ///
    /// Fails with [`EmptyInput`] if there are no labels.
    pub fn build<I, L>(labels: I) -> Result<Self, EmptyInput>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let mut labels: Vec<Option<String>> = labels.into_iter().map(|l| Some(l.into())).collect();
        if labels.is_empty() {
            return Err(EmptyInput);
        }

        let mut slots: Vec<Option<Node>> = Vec::with_capacity(labels.len());
        slots.resize_with(labels.len(), || None);
        build_subtree::<H>(&mut labels, 0, None, false, &mut slots);

        // every slot below `labels.len()` is filled by `build_subtree`.
        let nodes: Vec<Node> = slots.into_iter().flatten().collect();
        debug_assert_eq!(nodes.len(), labels.len());

        Ok(Tree {
            nodes,
            _marker: PhantomData,
        })
    }
}

// Build the node at `pos` and everything below it, post-order.
fn build_subtree<H: BinaryHash>(
    labels: &mut [Option<String>],
    pos: usize,
    parent: Option<&Node>,
    is_left: bool,
    slots: &mut [Option<Node>],
) {
    let key = match labels.get_mut(pos).and_then(Option::take) {
        Some(key) => key,
        None => return,
    };

    let mut node = Node::new(key, parent, is_left);
    let (left_pos, right_pos) = (2 * pos + 1, 2 * pos + 2);

    build_subtree::<H>(labels, left_pos, Some(&node), true, slots);
    build_subtree::<H>(labels, right_pos, Some(&node), false, slots);

    let left = slots.get(left_pos).and_then(Option::as_ref);
    let right = slots.get(right_pos).and_then(Option::as_ref);
    node.left = left.map(|_| left_pos);
    node.right = right.map(|_| right_pos);
    node.compute_digest::<H>(left, right);

    slots[pos] = Some(node);
}

impl<H> Tree<H> {
    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// The commitment to the whole tree: the digest of the root.
    pub fn commitment(&self) -> &Digest {
        self.root().digest()
    }

    /// The number of nodes, which equals the number of labels the tree was built from.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at the given heap-order position, if any.
    pub fn node(&self, position: usize) -> Option<&Node> {
        self.nodes.get(position)
    }

    /// The node at the given coordinate, if any.
    pub fn node_at(&self, level: usize, index: usize) -> Option<&Node> {
        if level >= usize::BITS as usize || index >= 1usize << level {
            return None;
        }
        self.node(heap_position(level, index))
    }

    /// The parent of a node. `None` for the root.
    pub fn parent(&self, node: &Node) -> Option<&Node> {
        node.parent.and_then(|p| self.node(p))
    }

    /// The left child of a node, if any.
    pub fn left(&self, node: &Node) -> Option<&Node> {
        node.left.and_then(|p| self.node(p))
    }

    /// The right child of a node, if any.
    pub fn right(&self, node: &Node) -> Option<&Node> {
        node.right.and_then(|p| self.node(p))
    }

    /// The other child of this node's parent, if any.
    pub fn sibling(&self, node: &Node) -> Option<&Node> {
        let parent = self.parent(node)?;
        if node.is_left_child() {
            self.right(parent)
        } else {
            self.left(parent)
        }
    }

    /// Follow `key_path` down from the root and return the node it names.
    pub fn lookup(&self, key_path: &KeyPath) -> Result<&Node, crate::proof::PathNotFound> {
        crate::proof::walk_path(self, key_path, |_, _| {})
    }

    /// The key path naming `node` in this tree: the keys of its ancestors, root first.
    ///
    /// If sibling keys are not distinct, looking up the returned path may resolve to a different
    /// node.
    pub fn key_path_of(&self, node: &Node) -> KeyPath {
        let mut keys = Vec::with_capacity(node.level() + 1);
        let mut cur = Some(node);
        while let Some(n) = cur {
            keys.push(n.key());
            cur = self.parent(n);
        }
        keys.reverse();

        KeyPath::from_keys(keys).unwrap_or_else(|| KeyPath::parse(node.key()))
    }

    /// Iterate over all nodes in in-order: left subtree, node, right subtree.
    pub fn in_order(&self) -> InOrder<'_, H> {
        InOrder {
            tree: self,
            stack: Vec::new(),
            next: Some(0),
        }
    }

    /// Iterate over all nodes in heap order, i.e. the order of the input labels.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}

/// In-order iterator over the nodes of a [`Tree`].
pub struct InOrder<'a, H> {
    tree: &'a Tree<H>,
    stack: Vec<&'a Node>,
    next: Option<usize>,
}

impl<'a, H> Iterator for InOrder<'a, H> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let tree = self.tree;
        while let Some(node) = self.next.and_then(|p| tree.node(p)) {
            self.stack.push(node);
            self.next = node.left;
        }

        let node = self.stack.pop()?;
        self.next = node.right;
        Some(node)
    }
}
