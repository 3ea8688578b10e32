use serde::{Deserialize, Serialize};

use crate::{
    hash::{hash_leaf, Digest},
    Field, MerkleWitness, SparseMerkleTree, MAX_HEIGHT,
};

/// The height of the tree behind every [`MerkleMap`]
///
/// Every canonical field element is below `2^64`, so every [`Field`] is a valid key.
pub const MAP_HEIGHT: usize = MAX_HEIGHT;

/// A key-value map of [`Field`]s, committed to by a single root
///
/// The key is the leaf index. Keys are meant to be derived with [`MerkleMap::key_for`], which
/// spreads them over the whole key space, rather than chosen as small dense integers. A value is
/// stored as the word `[value, 0, 0, 0]`, so a key that was never set reads as zero.
///
/// ```rust
/// # use smt::{MerkleMap, Field};
/// let mut map = MerkleMap::new();
/// let key = MerkleMap::key_for(&[Field::from(1), Field::from(2)]);
///
/// map.set(key, Field::from(10));
/// assert_eq!(map.get(key), Field::from(10));
///
/// let witness = map.get_witness(key);
/// assert_eq!(witness.compute_root_and_key(Field::from(10)), (map.root(), key));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleMap {
    tree: SparseMerkleTree,
}

impl Default for MerkleMap {
    fn default() -> Self {
        Self::new()
    }
}

// a MAP_HEIGHT tree can address every u64, so the tree never reports an out-of-range index
impl MerkleMap {
    /// Create an empty map
    ///
    /// # Panics
    ///
    /// Never: [`MAP_HEIGHT`] is a valid height
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: SparseMerkleTree::new(MAP_HEIGHT).expect("MAP_HEIGHT is a valid height"),
        }
    }

    /// Derive a high-entropy key from arbitrary field data
    #[must_use]
    pub fn key_for(data: &[Field]) -> Field {
        hash_leaf(data).to_word()[0]
    }

    /// The value stored under `key`, or zero
    ///
    /// # Panics
    ///
    /// Never: every key is in range
    #[must_use]
    pub fn get(&self, key: Field) -> Field {
        let leaf = self
            .tree
            .get_leaf(key.as_u64())
            .expect("every field element is a valid index");
        leaf.to_word()[0]
    }

    /// Store `value` under `key`; storing zero removes the key
    ///
    /// # Panics
    ///
    /// Never: every key is in range
    pub fn set(&mut self, key: Field, value: Field) {
        self.tree
            .set_leaf(key.as_u64(), value_digest(value))
            .expect("every field element is a valid index");
    }

    /// The current root
    #[inline]
    #[must_use]
    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    /// The authentication path for `key`
    ///
    /// # Panics
    ///
    /// Never: every key is in range
    #[must_use]
    pub fn get_witness(&self, key: Field) -> MerkleMapWitness {
        let inner = self
            .tree
            .get_witness(key.as_u64())
            .expect("every field element is a valid index");
        MerkleMapWitness { inner }
    }
}

/// An authentication path for one key of a [`MerkleMap`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerkleMapWitness {
    inner: MerkleWitness,
}

impl MerkleMapWitness {
    /// The root of a map in which the witnessed key holds `value`, and the witnessed key
    #[must_use]
    pub fn compute_root_and_key(&self, value: Field) -> (Digest, Field) {
        let root = self.inner.compute_root(value_digest(value));
        let key = Field::new(self.inner.compute_index());
        (root, key)
    }

    /// The underlying tree witness
    #[inline]
    #[must_use]
    pub fn as_witness(&self) -> &MerkleWitness {
        &self.inner
    }
}

fn value_digest(value: Field) -> Digest {
    Digest::from_word([value, Field::ZERO, Field::ZERO, Field::ZERO])
}
