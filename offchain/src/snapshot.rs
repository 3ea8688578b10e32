use std::collections::{btree_map, BTreeMap};

use serde::{Deserialize, Serialize};
use smt::{Payload, SparseMerkleTree};

use crate::Result;

/// The full index to payload mapping behind one root
///
/// Serialized as a list of `[index, payload]` pairs in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<(u64, Payload)>", into = "Vec<(u64, Payload)>")]
pub struct Snapshot {
    items: BTreeMap<u64, Payload>,
}

impl Snapshot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, index: u64) -> Option<&Payload> {
        self.items.get(&index)
    }

    /// Set or clear the payload at `index`, returning the previous payload
    pub fn set(&mut self, index: u64, payload: Option<Payload>) -> Option<Payload> {
        match payload {
            Some(payload) => self.items.insert(index, payload),
            None => self.items.remove(&index),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, u64, Payload> {
        self.items.iter()
    }

    /// Rebuild the tree this mapping hashes to
    pub fn to_tree(&self, height: usize) -> Result<SparseMerkleTree> {
        let leaves = self.items.iter().map(|(index, payload)| (*index, payload.digest()));
        Ok(SparseMerkleTree::from_leaves(height, leaves)?)
    }
}

impl From<Vec<(u64, Payload)>> for Snapshot {
    fn from(value: Vec<(u64, Payload)>) -> Self {
        value.into_iter().collect()
    }
}

impl From<Snapshot> for Vec<(u64, Payload)> {
    fn from(value: Snapshot) -> Self {
        value.items.into_iter().collect()
    }
}

impl FromIterator<(u64, Payload)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (u64, Payload)>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a u64, &'a Payload);
    type IntoIter = btree_map::Iter<'a, u64, Payload>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
