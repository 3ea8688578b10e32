use std::collections::BTreeMap;

use crate::{
    hash::{empty_tree_hash, hash_node, Digest},
    witness::{MerkleWitness, Step},
    Error, Result,
};

mod macros;

#[cfg(any(test, feature = "proptest"))]
mod proptest;


/// The tallest supported tree
///
/// A tree of this height has `2^64` leaf slots, so every `u64` is a valid index.
pub const MAX_HEIGHT: usize = 65;

/// A fixed-height Merkle tree over `2^(height - 1)` indexed leaf slots
///
/// Leaves are [`Digest`]s, usually the [`hash_leaf`] of some application payload. Unset slots hold
/// [`Digest::EMPTY`], and only non-empty nodes are stored, so a tree costs memory proportional to
/// the number of set leaves times the height.
///
/// ```rust
/// # use smt::{SparseMerkleTree, hash::empty_tree_hash, Field, Payload};
/// let mut tree = SparseMerkleTree::new(20).unwrap();
/// assert_eq!(tree.root(), empty_tree_hash(20));
///
/// let payload = Payload::from([Field::from(100)]);
/// tree.set_leaf(3, payload.digest()).unwrap();
///
/// let witness = tree.get_witness(3).unwrap();
/// assert_eq!(witness.compute_root(payload.digest()), tree.root());
/// ```
/// The root is a pure function of the leaf mapping, regardless of the order in which leaves were
/// written:
/// ```rust
/// # use smt::{smt, Field};
/// let a = smt! { height: 8, 1 => Field::from(1), 2 => Field::from(2) };
/// let b = smt! { height: 8, 2 => Field::from(2), 1 => Field::from(1) };
///
/// assert_eq!(a.root(), b.root());
/// ```
///
/// [`hash_leaf`]: crate::hash::hash_leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMerkleTree {
    height: usize,
    /// `levels[0]` holds the leaves and `levels[height - 1]` holds the root
    levels: Vec<BTreeMap<u64, Digest>>,
}

impl SparseMerkleTree {
    /// Create a new tree with every leaf set to [`Digest::EMPTY`]
    ///
    /// `height` must be between 1 and [`MAX_HEIGHT`]. A tree of height 1 is a single leaf, which
    /// is also the root.
    ///
    /// ```rust
    /// # use smt::{SparseMerkleTree, Error};
    /// assert!(SparseMerkleTree::new(1).is_ok());
    /// assert!(matches!(SparseMerkleTree::new(0), Err(Error::InvalidHeight { .. })));
    /// ```
    pub fn new(height: usize) -> Result<Self> {
        if height == 0 || height > MAX_HEIGHT {
            return Err(Error::InvalidHeight {
                height,
                max: MAX_HEIGHT,
            });
        }

        Ok(Self {
            height,
            levels: vec![BTreeMap::new(); height],
        })
    }

    /// Create a tree and set each `(index, digest)` pair in order
    ///
    /// Later pairs overwrite earlier pairs with the same index.
    pub fn from_leaves<I>(height: usize, leaves: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, Digest)>,
    {
        let mut tree = Self::new(height)?;
        for (index, digest) in leaves {
            tree.set_leaf(index, digest)?;
        }
        Ok(tree)
    }

    /// The height of the tree, including the leaf level
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The number of leaf slots, `2^(height - 1)`
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> u128 {
        1 << (self.height - 1)
    }

    /// The number of leaves that are not [`Digest::EMPTY`]
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    /// Whether every leaf is [`Digest::EMPTY`]
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels[0].is_empty()
    }

    /// The current root
    #[inline]
    #[must_use]
    pub fn root(&self) -> Digest {
        self.node(self.height - 1, 0)
    }

    /// The digest at `index`, or [`Digest::EMPTY`] if it has never been set
    ///
    /// ```rust
    /// # use smt::{SparseMerkleTree, Error, hash::Digest};
    /// let tree = SparseMerkleTree::new(3).unwrap();
    ///
    /// assert_eq!(tree.get_leaf(3), Ok(Digest::EMPTY));
    /// assert!(matches!(tree.get_leaf(4), Err(Error::IndexOutOfRange { index: 4, capacity: 4 })));
    /// ```
    pub fn get_leaf(&self, index: u64) -> Result<Digest> {
        self.check_index(index)?;
        Ok(self.node(0, index))
    }

    /// Replace the digest at `index` and recompute the path to the root
    ///
    /// Setting [`Digest::EMPTY`] clears the slot.
    pub fn set_leaf(&mut self, index: u64, digest: Digest) -> Result<()> {
        self.check_index(index)?;

        let mut hash = digest;
        let mut index = index;

        for level in 0..self.height {
            self.put(level, index, hash);

            if level + 1 == self.height {
                break;
            }

            let sibling = self.node(level, index ^ 1);
            hash = if index & 1 == 0 {
                hash_node(hash, sibling)
            } else {
                hash_node(sibling, hash)
            };
            index >>= 1;
        }

        Ok(())
    }

    /// The authentication path for `index` in the tree's current state
    ///
    /// The witness is a detached value: later calls to [`SparseMerkleTree::set_leaf`] do not
    /// change it.
    pub fn get_witness(&self, index: u64) -> Result<MerkleWitness> {
        self.check_index(index)?;

        let mut index = index;
        let steps = (0..self.height - 1)
            .map(|level| {
                let sibling = self.node(level, index ^ 1);
                let step = if index & 1 == 0 {
                    Step::Left { right: sibling }
                } else {
                    Step::Right { left: sibling }
                };
                index >>= 1;
                step
            })
            .collect();

        Ok(MerkleWitness::new(steps))
    }

    /// Iterate over the non-empty leaves in index order
    pub fn leaves(&self) -> impl Iterator<Item = (u64, Digest)> + '_ {
        self.levels[0].iter().map(|(index, digest)| (*index, *digest))
    }

    fn check_index(&self, index: u64) -> Result<()> {
        let capacity = self.capacity();
        if u128::from(index) < capacity {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange { index, capacity })
        }
    }

    fn node(&self, level: usize, index: u64) -> Digest {
        self.levels[level]
            .get(&index)
            .copied()
            .unwrap_or_else(|| empty_tree_hash(level + 1))
    }

    fn put(&mut self, level: usize, index: u64, hash: Digest) {
        if hash == empty_tree_hash(level + 1) {
            self.levels[level].remove(&index);
        } else {
            self.levels[level].insert(index, hash);
        }
    }
}
