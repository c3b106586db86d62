//! Tree vertices and their heap coordinates.
//!
//! Every node is addressed by a `(level, index)` pair. The root sits at `(0, 0)`; the left child
//! of a node at `(l, i)` sits at `(l + 1, 2i)` and the right child at `(l + 1, 2i + 1)`. Within a
//! level the coordinate is collision-free and independent of the key values, which is what lets a
//! verifier pair digests without the tree.
//!
//! Nodes are stored by their owning [`crate::Tree`] in heap order, so the coordinate also fixes
//! the node's position in storage: `position = 2^level - 1 + index`.

use crate::hasher::{BinaryHash, Digest};

use alloc::{string::String, vec::Vec};

/// A vertex of the tree.
///
/// Links to the parent and children are positions into the owning tree's storage. They do not own
/// anything and are only meaningful together with the tree that produced the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    key: String,
    digest: Digest,
    level: usize,
    index: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl Node {
    /// Create a node below `parent`, or a root when `parent` is `None`.
    ///
    /// The digest is left empty until [`Node::compute_digest`] is called.
    pub fn new(key: impl Into<String>, parent: Option<&Node>, is_left: bool) -> Self {
        let (level, index, parent) = match parent {
            None => (0, 0, None),
            Some(p) => (
                p.level + 1,
                p.index * 2 + usize::from(!is_left),
                Some(p.position()),
            ),
        };

        Node {
            key: key.into(),
            digest: Vec::new(),
            level,
            index,
            parent,
            left: None,
            right: None,
        }
    }

    /// Compute this node's digest from its children.
    ///
    /// A node without children hashes its key. Otherwise the digest is the hash of the left
    /// child's digest followed by the right child's; a missing child contributes no bytes.
    ///
    /// Children must already have their digests computed.
    pub fn compute_digest<H: BinaryHash>(&mut self, left: Option<&Node>, right: Option<&Node>) {
        self.digest = match (left, right) {
            (None, None) => H::hash(self.key.as_bytes()),
            (left, right) => H::hash2_concat(
                left.map_or(&[][..], |n| &n.digest[..]),
                right.map_or(&[][..], |n| &n.digest[..]),
            ),
        };
    }

    /// The key of the node.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The digest of the node. Empty until computed.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// The depth of the node. The root is at level 0.
    pub fn level(&self) -> usize {
        self.level
    }

    /// The position of the node within its level.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The position of the node in heap order.
    pub fn position(&self) -> usize {
        heap_position(self.level, self.index)
    }

    /// Whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Whether this is the left child of its parent. The root is not a left child.
    pub fn is_left_child(&self) -> bool {
        self.level != 0 && self.index % 2 == 0
    }
}

/// The heap-order position of the node at `(level, index)`.
pub fn heap_position(level: usize, index: usize) -> usize {
    (1usize << level) - 1 + index
}
