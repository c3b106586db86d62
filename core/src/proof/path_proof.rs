//! Proving and verifying a single path.

use super::{hash_with_sibling, PathNotFound, Witness, WitnessNode};
use crate::{
    cursor::{Cursor, Step},
    hasher::BinaryHash,
    key_path::KeyPath,
    node::Node,
    tree::Tree,
};

use alloc::vec::Vec;
use core::fmt;

/// Walk `key_path` from the root, reporting each node descended into along with its sibling.
///
/// Returns the node the path names.
pub(crate) fn walk_path<'a, H>(
    tree: &'a Tree<H>,
    key_path: &KeyPath,
    mut visit: impl FnMut(&'a Node, Option<&'a Node>),
) -> Result<&'a Node, PathNotFound> {
    let mut cursor = Cursor::new(tree);
    if cursor.node().key() != key_path.root_key() {
        return Err(PathNotFound {
            key: key_path.root_key().into(),
        });
    }

    for key in &key_path.keys()[1..] {
        let (left, right) = cursor.peek_children();
        let sibling = match cursor.down_to(key) {
            Some(Step::Left) => right,
            Some(Step::Right) => left,
            None => return Err(PathNotFound { key: key.clone() }),
        };
        visit(cursor.node(), sibling);
    }

    Ok(cursor.node())
}

/// Generate the witness for the node named by the `/`-delimited `key_path`.
///
/// The witness holds one sibling per step below the root, ordered from the root toward the
/// target.
pub fn generate_witness<H>(tree: &Tree<H>, key_path: &str) -> Result<Witness, PathNotFound> {
    let key_path = KeyPath::parse(key_path);
    let mut siblings = Vec::with_capacity(key_path.depth());
    walk_path(tree, &key_path, |node, sibling| {
        siblings.push(WitnessNode::sibling_of(node, sibling))
    })?;

    Ok(Witness(siblings))
}

/// Errors in single path verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProofVerificationError {
    /// The witness does not hold exactly one entry per step of the path.
    WitnessLengthMismatch,
    /// A witness entry is not at the level its position requires.
    LevelMismatch,
    /// The recomputed root does not match the commitment.
    RootMismatch,
}

impl fmt::Display for PathProofVerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::WitnessLengthMismatch => "witness length does not match path depth",
            Self::LevelMismatch => "witness entry at unexpected level",
            Self::RootMismatch => "recomputed root does not match commitment",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PathProofVerificationError {}

/// Verify that the leaf named by `key_path` exists under `commitment`.
///
/// The leaf digest is taken to be the hash of the last key of the path, so this only accepts
/// paths naming leaves.
pub fn try_verify_single<H: BinaryHash>(
    commitment: &[u8],
    witness: &Witness,
    key_path: &str,
) -> Result<(), PathProofVerificationError> {
    let key_path = KeyPath::parse(key_path);
    if witness.len() != key_path.depth() {
        return Err(PathProofVerificationError::WitnessLengthMismatch);
    }

    let mut cur = H::hash(key_path.terminal().as_bytes());
    for (i, sibling) in witness.iter().enumerate().rev() {
        if sibling.level != i + 1 {
            return Err(PathProofVerificationError::LevelMismatch);
        }
        cur = hash_with_sibling::<H>(&cur, &sibling.digest, sibling.index);
    }

    if cur[..] == commitment[..] {
        Ok(())
    } else {
        Err(PathProofVerificationError::RootMismatch)
    }
}

/// Verify that the leaf named by `key_path` exists under `commitment`. See [`try_verify_single`].
pub fn verify_single<H: BinaryHash>(commitment: &[u8], witness: &Witness, key_path: &str) -> bool {
    try_verify_single::<H>(commitment, witness, key_path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::{generate_witness, try_verify_single, verify_single, PathProofVerificationError};
    use crate::{
        hasher::{BinaryHash, Blake3Hasher},
        proof::{PathNotFound, WitnessNode},
        tree::Tree,
    };

    const LABELS: [&str; 11] = [
        "etc", "pi", "chi", "pki", "ro", "gdb", "libnl", "gss", "ldap", "opt", "bare",
    ];

    fn tree() -> Tree<Blake3Hasher> {
        Tree::build(LABELS).unwrap()
    }

    #[cfg(feature = "sha2-hasher")]
    #[test]
    fn concrete_sha256_scenario() {
        use crate::hasher::Sha256Hasher;
        use hex_literal::hex;

        let tree = Tree::<Sha256Hasher>::build(LABELS).unwrap();
        assert_eq!(
            tree.commitment()[..],
            hex!("9761b8b0affcd8af63e93538bb9d3554c2665dbcd0c49dc152b1a5e7001f99ae")
        );

        let witness = generate_witness(&tree, "etc/pi/ro/opt").unwrap();
        let keys: Vec<_> = witness.keys().collect();
        assert_eq!(keys, [Some("chi"), Some("pki"), Some("bare")]);
        assert!(verify_single::<Sha256Hasher>(
            tree.commitment(),
            &witness,
            "etc/pi/ro/opt"
        ));

        let mut commitment = tree.commitment().clone();
        *commitment.last_mut().unwrap() ^= 1;
        assert!(!verify_single::<Sha256Hasher>(
            &commitment,
            &witness,
            "etc/pi/ro/opt"
        ));
    }

    #[test]
    fn witness_coordinates() {
        let witness = generate_witness(&tree(), "etc/pi/ro/opt").unwrap();
        let coords: Vec<_> = witness.iter().map(|w| (w.level, w.index)).collect();
        assert_eq!(coords, [(1, 1), (2, 0), (3, 3)]);
    }

    #[test]
    fn every_leaf_verifies() {
        let tree = tree();
        for leaf in tree.iter().filter(|n| n.is_leaf()) {
            let path = tree.key_path_of(leaf).to_string();
            let witness = generate_witness(&tree, &path).unwrap();
            assert_eq!(witness.len(), leaf.level());
            assert_eq!(
                try_verify_single::<Blake3Hasher>(tree.commitment(), &witness, &path),
                Ok(())
            );
        }
    }

    #[test]
    fn corrupted_witness_is_rejected() {
        let tree = tree();
        let witness = generate_witness(&tree, "etc/chi/libnl").unwrap();
        assert!(verify_single::<Blake3Hasher>(
            tree.commitment(),
            &witness,
            "etc/chi/libnl"
        ));

        for entry in 0..witness.len() {
            for byte in 0..witness.0[entry].digest.len() {
                let mut bad = witness.clone();
                bad.0[entry].digest[byte] ^= 0x80;
                assert_eq!(
                    try_verify_single::<Blake3Hasher>(tree.commitment(), &bad, "etc/chi/libnl"),
                    Err(PathProofVerificationError::RootMismatch)
                );
            }
        }
    }

    #[test]
    fn flipped_side_is_rejected() {
        let tree = tree();
        let mut witness = generate_witness(&tree, "etc/pi/ro/opt").unwrap();
        witness.0[2].index ^= 1;
        assert!(!verify_single::<Blake3Hasher>(
            tree.commitment(),
            &witness,
            "etc/pi/ro/opt"
        ));
    }

    #[test]
    fn wrong_leaf_is_rejected() {
        let tree = tree();
        let witness = generate_witness(&tree, "etc/pi/ro/opt").unwrap();
        assert!(!verify_single::<Blake3Hasher>(
            tree.commitment(),
            &witness,
            "etc/pi/ro/bare"
        ));
    }

    #[test]
    fn malformed_witness_shape_is_rejected() {
        let tree = tree();
        let mut witness = generate_witness(&tree, "etc/pi/ro/opt").unwrap();

        assert_eq!(
            try_verify_single::<Blake3Hasher>(tree.commitment(), &witness, "etc/pi/opt"),
            Err(PathProofVerificationError::WitnessLengthMismatch)
        );

        witness.0.swap(0, 1);
        assert_eq!(
            try_verify_single::<Blake3Hasher>(tree.commitment(), &witness, "etc/pi/ro/opt"),
            Err(PathProofVerificationError::LevelMismatch)
        );
    }

    #[test]
    fn internal_node_path_does_not_verify() {
        let tree = tree();
        let witness = generate_witness(&tree, "etc/pi/ro").unwrap();
        assert!(!verify_single::<Blake3Hasher>(
            tree.commitment(),
            &witness,
            "etc/pi/ro"
        ));
    }

    #[test]
    fn single_node_tree() {
        let tree = Tree::<Blake3Hasher>::build(["x"]).unwrap();
        let witness = generate_witness(&tree, "x").unwrap();
        assert!(witness.is_empty());
        assert!(verify_single::<Blake3Hasher>(
            &Blake3Hasher::hash(b"x"),
            &witness,
            "x"
        ));
    }

    #[test]
    fn lone_left_child_gets_absent_sibling() {
        let tree = Tree::<Blake3Hasher>::build(LABELS[..10].iter().copied()).unwrap();
        let witness = generate_witness(&tree, "etc/pi/ro/opt").unwrap();
        assert_eq!(witness.0[2], WitnessNode::absent(3, 3));
        assert!(witness.0[2].is_absent());
        assert!(verify_single::<Blake3Hasher>(
            tree.commitment(),
            &witness,
            "etc/pi/ro/opt"
        ));
    }

    #[test]
    fn unknown_paths() {
        let tree = tree();
        let not_found = |key: &str| {
            Err::<(), _>(PathNotFound {
                key: key.to_string(),
            })
        };

        assert_eq!(generate_witness(&tree, "usr/pi").map(|_| ()), not_found("usr"));
        assert_eq!(
            generate_witness(&tree, "etc/pi/gdb").map(|_| ()),
            not_found("gdb")
        );
        assert_eq!(
            generate_witness(&tree, "etc/chi/gdb/opt").map(|_| ()),
            not_found("opt")
        );
        assert_eq!(generate_witness(&tree, "").map(|_| ()), not_found(""));
    }

    #[test]
    fn concurrent_provers_share_a_tree() {
        let tree = tree();
        let paths = ["etc/pi/ro/opt", "etc/pi/ro/bare", "etc/chi/gdb", "etc/pi/pki/gss"];
        std::thread::scope(|s| {
            for path in paths {
                let tree = &tree;
                s.spawn(move || {
                    let witness = generate_witness(tree, path).unwrap();
                    assert!(verify_single::<Blake3Hasher>(
                        tree.commitment(),
                        &witness,
                        path
                    ));
                });
            }
        });
    }
}
