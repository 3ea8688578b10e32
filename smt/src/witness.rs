use serde::{Deserialize, Serialize};

use crate::{
    hash::{hash_node, Digest},
    Error, MAX_HEIGHT,
};

/// An authentication path for one leaf of a [`SparseMerkleTree`]
///
/// A witness holds one [`Step`] per level below the root, ordered from the leaf upwards, so a
/// witness drawn from a tree of height `h` has `h - 1` steps. It proves "if the leaf at
/// [`MerkleWitness::compute_index`] is `d`, the root is [`MerkleWitness::compute_root(d)`]"
/// without the rest of the tree.
///
/// This type provides [`MerkleWitness::to_bytes`] and [`MerkleWitness::from_bytes`] for
/// serialization purposes. It also implements [`Serialize`] and [`Deserialize`], if more control
/// over exact serialization details is needed. Decoding rejects witnesses with more than
/// `MAX_HEIGHT - 1` steps.
///
/// [`SparseMerkleTree`]: crate::SparseMerkleTree
/// [`MerkleWitness::compute_root(d)`]: MerkleWitness::compute_root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWitness")]
pub struct MerkleWitness {
    steps: Vec<Step>,
}

#[derive(Deserialize)]
struct RawWitness {
    steps: Vec<Step>,
}

impl TryFrom<RawWitness> for MerkleWitness {
    type Error = Error;

    fn try_from(raw: RawWitness) -> Result<Self, Self::Error> {
        if raw.steps.len() >= MAX_HEIGHT {
            return Err(Error::WitnessTooLong {
                len: raw.steps.len(),
                max: MAX_HEIGHT - 1,
            });
        }

        Ok(Self { steps: raw.steps })
    }
}

/// One level of a [`MerkleWitness`]
///
///  - `Left` means the node on the path is a left child, and `right` is its sibling
///  - `Right` means the node on the path is a right child, and `left` is its sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// The path node is a left child
    Left {
        /// The digest of the right sibling
        right: Digest,
    },
    /// The path node is a right child
    Right {
        /// The digest of the left sibling
        left: Digest,
    },
}

impl Step {
    /// The sibling digest at this level
    #[inline]
    #[must_use]
    pub fn sibling(&self) -> Digest {
        match self {
            Self::Left { right } => *right,
            Self::Right { left } => *left,
        }
    }

    /// Whether the path node is a right child
    #[inline]
    #[must_use]
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right { .. })
    }
}

impl MerkleWitness {
    /// Create a witness from its steps, ordered from the leaf upwards
    ///
    /// # Panics
    ///
    /// Panics if there are more than `MAX_HEIGHT - 1` steps
    #[inline]
    #[must_use]
    pub fn new(steps: Vec<Step>) -> Self {
        assert!(steps.len() < MAX_HEIGHT, "witness has {} steps", steps.len());
        Self { steps }
    }

    /// The steps of this witness, ordered from the leaf upwards
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The number of steps, `height - 1`
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether this is the zero-length witness of a height 1 tree
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The height of the tree this witness was drawn from
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.steps.len() + 1
    }

    /// The root of a tree in which the witnessed leaf is `leaf`
    ///
    /// ```rust
    /// # use smt::{smt, Field, hash::{Digest, Hashable}};
    /// let tree = smt! { height: 8, 5 => Field::from(4) };
    /// let witness = tree.get_witness(5).unwrap();
    ///
    /// assert_eq!(witness.compute_root(Field::from(4).hash()), tree.root());
    /// assert_ne!(witness.compute_root(Digest::EMPTY), tree.root());
    /// ```
    #[must_use]
    pub fn compute_root(&self, leaf: Digest) -> Digest {
        self.steps.iter().fold(leaf, |hash, step| match step {
            Step::Left { right } => hash_node(hash, *right),
            Step::Right { left } => hash_node(*left, hash),
        })
    }

    /// The index of the witnessed leaf
    ///
    /// Bit `i` of the result is set if the path node at level `i` (counting from the leaves) is a
    /// right child.
    ///
    /// ```rust
    /// # use smt::SparseMerkleTree;
    /// let tree = SparseMerkleTree::new(8).unwrap();
    /// assert_eq!(tree.get_witness(0b101_0011).unwrap().compute_index(), 0b101_0011);
    /// ```
    #[must_use]
    pub fn compute_index(&self) -> u64 {
        self.steps
            .iter()
            .enumerate()
            .filter(|(_, step)| step.is_right())
            .fold(0, |index, (level, _)| index | (1u64 << level))
    }

    /// Convert this [`MerkleWitness`] to a canonical serialized representation.
    ///
    /// The exact details of the representation are not specified, other than that it can be
    /// reversed with [`MerkleWitness::from_bytes`]
    ///
    /// # Panics
    ///
    /// Never in practice: encoding a list of digests into memory cannot fail
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self).expect("in-memory encoding is infallible")
    }

    /// Create a [`MerkleWitness`] from its canonical serialized representation
    ///
    /// Returns `None` for malformed bytes and for witnesses longer than any tree allows.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        rmp_serde::from_slice(bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use test_strategy::proptest;

    use crate::{smt, Field, SparseMerkleTree};

    use super::*;

    #[test]
    fn index_bits_are_little_endian() {
        let tree = SparseMerkleTree::new(4).unwrap();
        let witness = tree.get_witness(0b110).unwrap();

        let bits: Vec<bool> = witness.steps().iter().map(Step::is_right).collect();
        assert_eq!(bits, vec![false, true, true]);
    }

    #[test]
    fn siblings_come_from_the_tree() {
        let tree = smt! {
            height: 3,
            0 => Field::from(1),
            1 => Field::from(2),
        };

        let witness = tree.get_witness(0).unwrap();
        assert_eq!(witness.steps()[0].sibling(), tree.get_leaf(1).unwrap());
        assert_eq!(witness.height(), 3);
    }

    #[derive(Serialize)]
    struct Unchecked {
        steps: Vec<Step>,
    }

    fn steps(n: usize) -> Vec<Step> {
        vec![Step::Right { left: Digest::EMPTY }; n]
    }

    #[test]
    fn overlong_encodings_are_rejected() {
        let bytes = rmp_serde::to_vec(&Unchecked { steps: steps(MAX_HEIGHT) }).unwrap();
        assert_eq!(MerkleWitness::from_bytes(&bytes), None);

        let json = serde_json::to_string(&Unchecked { steps: steps(MAX_HEIGHT) }).unwrap();
        let err = serde_json::from_str::<MerkleWitness>(&json).unwrap_err();
        assert!(err.to_string().contains("at most 64"));
        assert!(serde_json::from_str::<crate::MerkleMapWitness>(&json).is_err());
    }

    #[test]
    fn longest_witness_decodes() {
        let bytes = rmp_serde::to_vec(&Unchecked { steps: steps(MAX_HEIGHT - 1) }).unwrap();
        let witness = MerkleWitness::from_bytes(&bytes).unwrap();

        assert_eq!(witness.height(), MAX_HEIGHT);
        assert_eq!(witness.compute_index(), u64::MAX);
    }

    #[proptest(cases = 50)]
    fn path_serialization_round_trip(tree: SparseMerkleTree) {
        let witness = tree.get_witness(0).unwrap();
        let bytes = witness.to_bytes();

        assert_eq!(MerkleWitness::from_bytes(&bytes), Some(witness));
    }
}
