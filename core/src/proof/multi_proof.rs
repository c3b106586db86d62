//! Proving and verifying many paths at once.
//!
//! A batch witness is built by ascending the tree one level at a time from the deepest requested
//! node. At each level the active nodes are paired with their siblings; a sibling which is itself
//! active is already known to the verifier and is left out of the witness. Each parent is then
//! promoted once into the next level, where any requested nodes at that level join the ascent.
//!
//! The verifier repeats the same ascent over digests alone, starting from the proof hints and
//! looking siblings up by coordinate, first among the digests it has derived and then in the
//! witness.

use super::{hash_with_sibling, PathNotFound, ProofHint, Witness, WitnessNode};
use crate::{
    hasher::{BinaryHash, Digest},
    key_path::KeyPath,
    node::Node,
    tree::Tree,
};

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};
use core::fmt;

// Resolve every path to its node, returning the nodes in request order and the deepest level.
fn resolve_paths<'a, H, P: AsRef<str>>(
    tree: &'a Tree<H>,
    key_paths: &[P],
) -> Result<(Vec<&'a Node>, usize), PathNotFound> {
    let mut nodes = Vec::with_capacity(key_paths.len());
    let mut max_level = 0;
    for key_path in key_paths {
        let key_path = KeyPath::parse(key_path.as_ref());
        let node = super::walk_path(tree, &key_path, |_, _| {})?;
        max_level = max_level.max(key_path.depth());
        nodes.push(node);
    }

    Ok((nodes, max_level))
}

/// Resolve each `/`-delimited path to the node it names.
///
/// Returns one hint per path, in request order, along with the deepest level among them.
pub fn get_proof_hints<H, P: AsRef<str>>(
    tree: &Tree<H>,
    key_paths: &[P],
) -> Result<(Vec<ProofHint>, usize), PathNotFound> {
    let (nodes, max_level) = resolve_paths(tree, key_paths)?;
    Ok((nodes.into_iter().map(ProofHint::from).collect(), max_level))
}

/// Generate a witness proving every node named by `key_paths` at once.
///
/// Siblings which are themselves requested, or which are ancestors of requested nodes, are not
/// included. The entries are in no meaningful order.
pub fn generate_batch_witness<H, P: AsRef<str>>(
    tree: &Tree<H>,
    key_paths: &[P],
) -> Result<Witness, PathNotFound> {
    let (targets, mut level) = resolve_paths(tree, key_paths)?;

    let mut active = ActiveSet::default();
    active.join(&targets, level);

    let mut witness = Vec::new();
    while level > 0 {
        let mut next = ActiveSet::default();
        let mut promoted = BTreeSet::new();

        for &node in &active.nodes {
            let parent = match tree.parent(node) {
                Some(parent) => parent,
                None => continue,
            };

            // the first of a pair of siblings handles both.
            if !promoted.insert(parent.position()) {
                continue;
            }

            let sibling = tree.sibling(node);
            if !sibling.map_or(false, |s| active.contains(s)) {
                witness.push(WitnessNode::sibling_of(node, sibling));
            }

            // the root is the commitment itself.
            if parent.level() > 0 {
                next.push(parent);
            }
        }

        level -= 1;
        next.join(&targets, level);
        active = next;
    }

    Ok(Witness(witness))
}

// The nodes taking part in the ascent at one level, in the order they joined.
#[derive(Default)]
struct ActiveSet<'a> {
    nodes: Vec<&'a Node>,
    positions: BTreeSet<usize>,
}

impl<'a> ActiveSet<'a> {
    fn contains(&self, node: &Node) -> bool {
        self.positions.contains(&node.position())
    }

    fn push(&mut self, node: &'a Node) {
        if self.positions.insert(node.position()) {
            self.nodes.push(node);
        }
    }

    // Add the targets at `level`.
    fn join(&mut self, targets: &[&'a Node], level: usize) {
        for &target in targets.iter().filter(|n| n.level() == level) {
            self.push(target);
        }
    }
}

/// Errors in batch verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiProofVerificationError {
    /// The number of paths and the number of proof hints differ.
    MismatchedHintCount,
    /// A path has no proof hint with its terminal key at its depth.
    MissingHint,
    /// A proof hint disagrees with the digest derived for the same position.
    ConflictingHint,
    /// A sibling needed to continue the ascent was found neither among the derived digests nor
    /// in the witness.
    MalformedWitness,
    /// The ascent did not end in exactly one root.
    NoSingleRoot,
    /// The recomputed root does not match the commitment.
    RootMismatch,
}

impl fmt::Display for MultiProofVerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::MismatchedHintCount => "number of paths and proof hints differ",
            Self::MissingHint => "path has no matching proof hint",
            Self::ConflictingHint => "proof hint conflicts with derived digest",
            Self::MalformedWitness => "witness is missing a required sibling",
            Self::NoSingleRoot => "ascent did not end in a single root",
            Self::RootMismatch => "recomputed root does not match commitment",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MultiProofVerificationError {}

/// Verify that every node named by `key_paths` exists under `commitment`.
///
/// `proof_hints` must hold one hint per path, each carrying the path's terminal key at the
/// path's depth. The tree is never consulted: siblings come either from digests derived during
/// the ascent or from `witness`, located by coordinate.
///
/// Only the hint digests and coordinates are bound to the commitment. The hint keys are matched
/// against the paths but never hashed, so a hint carrying a different key with the same digest and
/// coordinate verifies just as well. Use [`super::verify_single`] where the key itself must be
/// proven.
pub fn try_verify_batch<H: BinaryHash, P: AsRef<str>>(
    commitment: &[u8],
    witness: &Witness,
    key_paths: &[P],
    proof_hints: &[ProofHint],
) -> Result<(), MultiProofVerificationError> {
    if key_paths.len() != proof_hints.len() {
        return Err(MultiProofVerificationError::MismatchedHintCount);
    }

    let mut level = 0;
    for key_path in key_paths {
        let key_path = KeyPath::parse(key_path.as_ref());
        let depth = key_path.depth();
        if !proof_hints
            .iter()
            .any(|h| h.key == key_path.terminal() && h.level == depth)
        {
            return Err(MultiProofVerificationError::MissingHint);
        }
        level = level.max(depth);
    }

    // index -> digest, for the current level.
    let mut active: BTreeMap<usize, Digest> = BTreeMap::new();
    join_hints(&mut active, proof_hints, level)?;

    while level > 0 {
        let mut next = BTreeMap::new();
        for (&index, digest) in &active {
            let parent_index = index >> 1;
            if next.contains_key(&parent_index) {
                continue;
            }

            let sibling_index = index ^ 1;
            let sibling = match active.get(&sibling_index) {
                Some(sibling) => sibling,
                None => match witness.find(level, sibling_index) {
                    Some(entry) => &entry.digest,
                    None => return Err(MultiProofVerificationError::MalformedWitness),
                },
            };

            next.insert(
                parent_index,
                hash_with_sibling::<H>(digest, sibling, sibling_index),
            );
        }

        level -= 1;
        join_hints(&mut next, proof_hints, level)?;
        active = next;
    }

    let mut remaining = active.into_iter();
    match (remaining.next(), remaining.next()) {
        (Some((0, root)), None) if root[..] == commitment[..] => Ok(()),
        (Some((0, _)), None) => Err(MultiProofVerificationError::RootMismatch),
        _ => Err(MultiProofVerificationError::NoSingleRoot),
    }
}

// Add the hints at `level` to the active digests.
fn join_hints(
    active: &mut BTreeMap<usize, Digest>,
    proof_hints: &[ProofHint],
    level: usize,
) -> Result<(), MultiProofVerificationError> {
    for hint in proof_hints.iter().filter(|h| h.level == level) {
        match active.get(&hint.index) {
            Some(derived) if derived != &hint.digest => {
                return Err(MultiProofVerificationError::ConflictingHint)
            }
            Some(_) => {}
            None => {
                active.insert(hint.index, hint.digest.clone());
            }
        }
    }

    Ok(())
}

/// Verify that every node named by `key_paths` exists under `commitment`. See
/// [`try_verify_batch`].
pub fn verify_batch<H: BinaryHash, P: AsRef<str>>(
    commitment: &[u8],
    witness: &Witness,
    key_paths: &[P],
    proof_hints: &[ProofHint],
) -> bool {
    try_verify_batch::<H, P>(commitment, witness, key_paths, proof_hints).is_ok()
}
