//! Witnesses and witness verification.
//!
//! The tree is an authenticated data structure: a short commitment binds every node, and a
//! witness made of sibling digests lets anyone holding only the commitment check that a node
//! exists at a given path. This module exposes types and functions for proving and verifying a
//! single path ([`generate_witness`], [`verify_single`]) or many paths at once with shared
//! siblings removed ([`generate_batch_witness`], [`verify_batch`]).
//!
//! Witness entries carry their `(level, index)` coordinate. The parity of the index tells a
//! verifier on which side of the concatenation an entry belongs, so no left/right flag is needed.

pub use multi_proof::{
    generate_batch_witness, get_proof_hints, try_verify_batch, verify_batch,
    MultiProofVerificationError,
};
pub use path_proof::{
    generate_witness, try_verify_single, verify_single, PathProofVerificationError,
};

pub(crate) use path_proof::walk_path;

mod multi_proof;
mod path_proof;

use crate::{
    hasher::{BinaryHash, Digest},
    node::Node,
};

use alloc::{string::String, vec::Vec};
use core::fmt;

/// A requested path does not name any node of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNotFound {
    /// The first key along the path which could not be matched.
    pub key: String,
}

impl fmt::Display for PathNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key {:?} does not exist in the tree", self.key)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PathNotFound {}

/// A sibling digest needed to recompute a commitment, tagged with its coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct WitnessNode {
    /// The key of the sibling. `None` if the sibling position holds no node, in which case the
    /// digest is empty.
    pub key: Option<String>,
    /// The digest of the sibling.
    pub digest: Digest,
    /// The level of the sibling.
    pub level: usize,
    /// The index of the sibling within its level.
    pub index: usize,
}

impl WitnessNode {
    /// An entry carrying the given node.
    pub fn from_node(node: &Node) -> Self {
        WitnessNode {
            key: Some(node.key().into()),
            digest: node.digest().clone(),
            level: node.level(),
            index: node.index(),
        }
    }

    /// An entry standing in for an empty position. It contributes no bytes when hashed.
    pub fn absent(level: usize, index: usize) -> Self {
        WitnessNode {
            key: None,
            digest: Vec::new(),
            level,
            index,
        }
    }

    /// Whether this entry stands in for an empty position.
    pub fn is_absent(&self) -> bool {
        self.key.is_none()
    }

    // The entry for the sibling of `node`, which is `sibling` if present.
    fn sibling_of(node: &Node, sibling: Option<&Node>) -> Self {
        match sibling {
            Some(s) => WitnessNode::from_node(s),
            None => WitnessNode::absent(node.level(), node.index() ^ 1),
        }
    }
}

/// Sibling entries recorded while proving one or more paths.
///
/// For a single path these are ordered from the root toward the target. For a batch the order
/// carries no meaning and entries are located by coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct Witness(pub Vec<WitnessNode>);

impl Witness {
    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> core::slice::Iter<'_, WitnessNode> {
        self.0.iter()
    }

    /// The keys of all entries, in order. Absent siblings yield `None`.
    pub fn keys(&self) -> impl Iterator<Item = Option<&str>> {
        self.0.iter().map(|w| w.key.as_deref())
    }

    /// Find the entry at the given coordinate.
    pub fn find(&self, level: usize, index: usize) -> Option<&WitnessNode> {
        self.0.iter().find(|w| w.level == level && w.index == index)
    }
}

impl<'a> IntoIterator for &'a Witness {
    type Item = &'a WitnessNode;
    type IntoIter = core::slice::Iter<'a, WitnessNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A publicly revealed node supplied to the batch verifier alongside each requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct ProofHint {
    /// The key of the revealed node.
    pub key: String,
    /// The digest of the revealed node.
    pub digest: Digest,
    /// The level of the revealed node.
    pub level: usize,
    /// The index of the revealed node within its level.
    pub index: usize,
}

impl From<&Node> for ProofHint {
    fn from(node: &Node) -> Self {
        ProofHint {
            key: node.key().into(),
            digest: node.digest().clone(),
            level: node.level(),
            index: node.index(),
        }
    }
}

// Hash a node together with its sibling. An even sibling index puts the sibling on the left.
fn hash_with_sibling<H: BinaryHash>(node: &[u8], sibling: &[u8], sibling_index: usize) -> Digest {
    if sibling_index % 2 == 0 {
        H::hash2_concat(sibling, node)
    } else {
        H::hash2_concat(node, sibling)
    }
}
