//! Items relating to hashing data
//!
//! In particular, the [`Digest`] type, the leaf and node hash functions, and the [`Hashable`]
//! trait

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

use miden_crypto::{
    hash::rpo::{Rpo256, RpoDigest},
    utils::{Deserializable, SliceReader},
    Felt,
};

use crate::Field;

mod empty;
pub use empty::{empty_tree_hash, empty_tree_height};

mod hashable;
pub use hashable::Hashable;
#[cfg(any(test, feature = "proptest"))]
mod proptest_impls;
mod serde_impls;

/// A Rescue-Prime Optimized digest
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Digest(RpoDigest);

impl Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hash({})", self.to_hex())
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Hash for Digest {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        <[u8; 32] as Hash>::hash(&self.to_bytes(), state);
    }
}

impl Digest {
    /// The empty leaf sentinel
    ///
    /// Every unset slot of a [`SparseMerkleTree`] holds this value. It is the all-zero word, which
    /// no real [`hash_leaf`] output is expected to equal.
    ///
    /// ```rust
    /// # use smt::{hash::Digest, SparseMerkleTree};
    /// let tree = SparseMerkleTree::new(4).unwrap();
    /// assert_eq!(tree.get_leaf(3).unwrap(), Digest::EMPTY);
    /// ```
    ///
    /// [`SparseMerkleTree`]: crate::SparseMerkleTree
    pub const EMPTY: Digest = Digest(RpoDigest::new([Felt::new(0); 4]));

    /// The length of this hash in bytes
    pub const LEN: usize = 32;

    /// Create a digest from its four field elements
    #[inline]
    #[must_use]
    pub fn from_word(word: [Field; 4]) -> Self {
        Self(RpoDigest::new(word.map(Felt::from)))
    }

    /// The four field elements of this digest
    #[inline]
    #[must_use]
    pub fn to_word(&self) -> [Field; 4] {
        let elements = self.0.as_elements();
        [elements[0], elements[1], elements[2], elements[3]].map(Field::from)
    }

    /// Whether this is the [`Digest::EMPTY`] sentinel
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Get the representation of this hash as a byte array
    #[inline]
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        self.0.as_bytes()
    }

    /// Create a [`Digest`] from the byte array representation
    ///
    /// Note: this returns an `Option` because not all possible byte arrays are valid [`Digest`]s
    ///
    /// Any byte array returned from [`Digest::to_bytes`] will be valid for this function, and the
    /// resulting hash will be equal to the hash that created the byte array
    #[inline]
    #[must_use]
    pub fn from_bytes(bytes: [u8; Self::LEN]) -> Option<Self> {
        let mut reader = SliceReader::new(&bytes);
        RpoDigest::read_from(&mut reader).ok().map(Digest)
    }

    /// Lowercase hex encoding of [`Digest::to_bytes`]
    #[inline]
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Parse the output of [`Digest::to_hex`], with or without a `0x` prefix
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0; Self::LEN];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Self::from_bytes(bytes)
    }
}

impl From<RpoDigest> for Digest {
    fn from(value: RpoDigest) -> Self {
        Self(value)
    }
}

impl From<Digest> for RpoDigest {
    fn from(value: Digest) -> Self {
        value.0
    }
}

/// Hash an ordered sequence of field elements into a leaf digest
///
/// ```rust
/// # use smt::{hash::{hash_leaf, Digest}, Field};
/// let a = hash_leaf(&[Field::from(4)]);
/// let b = hash_leaf(&[Field::from(4), Field::from(0)]);
///
/// assert_ne!(a, b);
/// assert_ne!(a, Digest::EMPTY);
/// ```
#[inline]
#[must_use]
pub fn hash_leaf(payload: &[Field]) -> Digest {
    let elements: Vec<Felt> = payload.iter().copied().map(Felt::from).collect();
    Digest(Rpo256::hash_elements(&elements))
}

/// Hash two child digests into their parent digest
///
/// This operation is not symmetric:
/// ```rust
/// # use smt::{hash::{hash_leaf, hash_node}, Field};
/// let a = hash_leaf(&[Field::from(1)]);
/// let b = hash_leaf(&[Field::from(2)]);
///
/// assert_ne!(hash_node(a, b), hash_node(b, a));
/// ```
#[inline]
#[must_use]
pub fn hash_node(left: Digest, right: Digest) -> Digest {
    Digest(Rpo256::merge(&[left.0, right.0]))
}

#[cfg(test)]
mod tests {
    use proptest::prop_assert_eq;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn empty_sentinel_is_all_zeroes() {
        assert_eq!(Digest::EMPTY.to_bytes(), [0; 32]);
        assert!(Digest::EMPTY.is_empty());
    }

    #[test]
    fn hex_accepts_prefix() {
        let digest = hash_leaf(&[Field::from(7)]);
        let hex = digest.to_hex();

        assert_eq!(Digest::from_hex(&hex), Some(digest));
        assert_eq!(Digest::from_hex(&format!("0x{hex}")), Some(digest));
        assert_eq!(Digest::from_hex("abcd"), None);
    }

    #[proptest]
    fn digest_bytes_round_trip(digest: Digest) {
        let bytes = digest.to_bytes();
        let digest_again = Digest::from_bytes(bytes).unwrap();

        prop_assert_eq!(digest, digest_again);
    }

    #[proptest]
    fn word_round_trip(digest: Digest) {
        prop_assert_eq!(Digest::from_word(digest.to_word()), digest);
    }

    #[proptest]
    fn digest_serde_round_trip(digest: Digest) {
        let mp_bytes = rmp_serde::to_vec(&digest).unwrap();
        let digest_again: Digest = rmp_serde::from_slice(&mp_bytes).unwrap();
        prop_assert_eq!(digest, digest_again);

        let json = serde_json::to_string(&digest).unwrap();
        let digest_again: Digest = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(digest, digest_again);
    }
}
