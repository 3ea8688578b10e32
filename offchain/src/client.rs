//! Client side of the read-modify-write cycle
//!
//! A client rebuilds the committed tree from the store's snapshot in a [`Replica`], stages
//! updates against it, asks the store to persist the result, and submits the witnessed updates.
//! Nothing is committed until submission succeeds, so an abandoned attempt leaves no trace.

use smt::{hash::Digest, Payload, SparseMerkleTree};

use crate::{LeafUpdate, LeafValue, Result, Snapshot};

/// A local copy of one owner's tree and the payloads behind it
#[derive(Debug, Clone)]
pub struct Replica {
    tree: SparseMerkleTree,
    snapshot: Snapshot,
}

impl Replica {
    /// Rebuild the tree of `height` from `snapshot`
    pub fn new(height: usize, snapshot: Snapshot) -> Result<Self> {
        let tree = snapshot.to_tree(height)?;
        Ok(Self { tree, snapshot })
    }

    #[must_use]
    pub fn root(&self) -> Digest {
        self.tree.root()
    }

    #[must_use]
    pub fn get(&self, index: u64) -> Option<&Payload> {
        self.snapshot.get(index)
    }

    #[must_use]
    pub fn tree(&self) -> &SparseMerkleTree {
        &self.tree
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Set or clear the payload at `index`, returning the witnessed update
    ///
    /// The witness is taken before the change, so successive calls produce a batch that folds in
    /// order.
    pub fn update(&mut self, index: u64, new: Option<Payload>) -> Result<LeafUpdate> {
        let witness = self.tree.get_witness(index)?;
        let new = LeafValue::from(new);

        self.tree.set_leaf(index, new.digest())?;
        let old = LeafValue::from(self.snapshot.set(index, new.payload().cloned()));

        Ok(LeafUpdate::new(old, new, witness))
    }
}

/// Run `attempt` until it succeeds, fails with a non-retryable error, or `attempts` runs out
///
/// Each attempt should start from a fresh read of the committed state. Errors that signal a
/// forged commitment are returned immediately.
pub fn with_retries<T, F>(attempts: usize, mut attempt: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut tries = 0;
    loop {
        tries += 1;
        match attempt() {
            Err(err) if err.is_retryable() && tries < attempts => {
                tracing::debug!(error = %err, tries, "retrying");
            }
            Err(err) => {
                if err.is_security_event() {
                    tracing::error!(error = %err, "security event, not retrying");
                }
                return Err(err);
            }
            Ok(value) => return Ok(value),
        }
    }
}
