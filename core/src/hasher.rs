//! Hashers (feature-gated) and utilities for implementing them.

use alloc::vec::Vec;
use core::marker::PhantomData;

/// The output of a hash function. The width depends on the hash function in use.
pub type Digest = Vec<u8>;

/// A simple trait for representing binary hash functions.
///
/// Implementations must be deterministic and stateless. Trees, witnesses and verifiers only ever
/// see the bytes produced here, so any collision-resistant function will do.
pub trait BinaryHash {
    /// Given a bit-string, produce a digest.
    fn hash(input: &[u8]) -> Digest;

    /// An optional specialization of `hash` over the concatenation `left ++ right`.
    fn hash2_concat(left: &[u8], right: &[u8]) -> Digest {
        let mut buf = Vec::with_capacity(left.len() + right.len());
        buf.extend_from_slice(left);
        buf.extend_from_slice(right);
        Self::hash(&buf)
    }
}

/// A [`BinaryHash`] built from any RustCrypto [`digest::Digest`] implementation.
pub struct DigestHasher<D>(PhantomData<D>);

impl<D: digest::Digest> BinaryHash for DigestHasher<D> {
    fn hash(input: &[u8]) -> Digest {
        D::digest(input).to_vec()
    }

    fn hash2_concat(left: &[u8], right: &[u8]) -> Digest {
        let mut hasher = D::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().to_vec()
    }
}

#[cfg(any(feature = "blake3-hasher", test))]
pub use self::blake3::Blake3Hasher;

/// A hasher making use of blake3.
#[cfg(any(feature = "blake3-hasher", test))]
pub mod blake3 {
    use super::{BinaryHash, Digest};

    /// A [`BinaryHash`] implementation for Blake3.
    pub struct Blake3Hasher;

    impl BinaryHash for Blake3Hasher {
        fn hash(value: &[u8]) -> Digest {
            ::blake3::hash(value).as_bytes().to_vec()
        }

        fn hash2_concat(left: &[u8], right: &[u8]) -> Digest {
            let mut hasher = ::blake3::Hasher::new();
            hasher.update(left);
            hasher.update(right);
            hasher.finalize().as_bytes().to_vec()
        }
    }
}

#[cfg(feature = "sha2-hasher")]
pub use self::sha2::{Sha256Hasher, Sha512Hasher};

/// Hashers making use of sha2-256 and sha2-512.
#[cfg(feature = "sha2-hasher")]
pub mod sha2 {
    use super::DigestHasher;

    /// A wrapper around sha2-256.
    pub type Sha256Hasher = DigestHasher<::sha2::Sha256>;

    /// A wrapper around sha2-512.
    pub type Sha512Hasher = DigestHasher<::sha2::Sha512>;
}

#[cfg(feature = "keccak-hasher")]
pub use self::keccak::Keccak256Hasher;

/// A hasher making use of the original (pre-NIST) Keccak-256.
#[cfg(feature = "keccak-hasher")]
pub mod keccak {
    use super::DigestHasher;

    /// A wrapper around keccak-256.
    pub type Keccak256Hasher = DigestHasher<::sha3::Keccak256>;
}

#[cfg(feature = "md5-hasher")]
pub use self::md5::Md5Hasher;

/// A hasher making use of MD5. Not collision resistant; kept for compatibility with existing
/// commitments.
#[cfg(feature = "md5-hasher")]
pub mod md5 {
    use super::DigestHasher;

    /// A wrapper around md5.
    pub type Md5Hasher = DigestHasher<::md5::Md5>;
}

#[cfg(test)]
mod tests {
    use super::{BinaryHash, Blake3Hasher};

    #[cfg(feature = "sha2-hasher")]
    #[test]
    fn sha256_known_answer() {
        assert_eq!(
            hex::encode(super::Sha256Hasher::hash(b"1")),
            "6b86b273ff34fce19d6b804eff5a3f5747ada4eaa22f1d49c01e52ddb7875b4b",
        );
    }

    #[cfg(feature = "sha2-hasher")]
    #[test]
    fn sha512_known_answer() {
        assert_eq!(
            hex::encode(super::Sha512Hasher::hash(b"1")),
            "4dff4ea340f0a823f15d3f4f01ab62eae0e5da579ccb851f8db9dfe84c58b2b3\
             7b89903a740e1ee172da793a6e79d560e5f7f9bd058a12a280433ed6fa46510a",
        );
    }

    #[cfg(feature = "keccak-hasher")]
    #[test]
    fn keccak256_known_answer() {
        assert_eq!(
            hex::encode(super::Keccak256Hasher::hash(b"1")),
            "c89efdaa54c0f20c7adf612882df0950f5a951637e0307cdcb4c672f298b8bc6",
        );
    }

    #[cfg(feature = "md5-hasher")]
    #[test]
    fn md5_known_answer() {
        assert_eq!(
            hex::encode(super::Md5Hasher::hash(b"1")),
            "c4ca4238a0b923820dcc509a6f75849b",
        );
    }

    #[cfg(feature = "sha2-hasher")]
    #[test]
    fn digest_hasher_concat_matches_hash_of_concatenation() {
        use super::Sha256Hasher;
        assert_eq!(
            Sha256Hasher::hash2_concat(b"left", b"right"),
            Sha256Hasher::hash(b"leftright"),
        );
    }

    #[test]
    fn blake3_concat_matches_hash_of_concatenation() {
        assert_eq!(
            Blake3Hasher::hash2_concat(b"left", b"right"),
            Blake3Hasher::hash(b"leftright"),
        );
        assert_eq!(Blake3Hasher::hash(b"1").len(), 32);
    }
}
