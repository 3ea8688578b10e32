#![warn(clippy::pedantic)]
#![deny(missing_docs)]

//! Sparse Merkle tree
//!
//! This library provides [`SparseMerkleTree`], a fixed-height, index-addressed Merkle tree that
//! uses the [Rescue-Prime Optimized][rpo] hash function, along with [`MerkleWitness`], a
//! detached authentication path that can recompute the root for any claimed leaf value.
//!
//! ```rust
//! # use smt::{SparseMerkleTree, hash::hash_leaf, Field};
//! let mut tree = SparseMerkleTree::new(8).unwrap();
//! let before = tree.get_witness(5).unwrap();
//!
//! let leaf = hash_leaf(&[Field::from(4)]);
//! tree.set_leaf(5, leaf).unwrap();
//!
//! // the old witness still proves the old state
//! assert_eq!(before.compute_root(leaf), tree.root());
//! assert_eq!(before.compute_index(), 5);
//! ```
//!
//! [`MerkleMap`] layers a key-value API on top of a tree that is tall enough to address any
//! [`Field`] as a key.
//!
//! Types provided by this library implement [`Arbitrary`], for use with [`proptest`], gated behind
//! the `proptest` feature flag.
//!
//! [rpo]: https://eprint.iacr.org/2022/1577.pdf
//! [`Arbitrary`]: proptest::prelude::Arbitrary

mod error;
pub use error::{Error, Result};

mod field;
pub use field::{Field, ParseFieldError};

pub mod hash;

mod payload;
pub use payload::Payload;

mod tree;
pub use tree::{SparseMerkleTree, MAX_HEIGHT};

mod witness;
pub use witness::{MerkleWitness, Step};

mod map;
pub use map::{MerkleMap, MerkleMapWitness, MAP_HEIGHT};
