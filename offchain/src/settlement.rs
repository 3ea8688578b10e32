use std::{collections::HashMap, sync::Arc};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use smt::hash::{empty_tree_hash, Digest};

use crate::{
    AuthorityKey, Error, LeafUpdate, Result, RootCommitment, RootTransitionValidator,
    UpdatePredicate,
};

/// The accepted state of one owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedState {
    pub root: Digest,
    /// The sequence number of the last accepted commitment, 0 before the first
    pub sequence: u64,
    pub height: usize,
}

/// The authoritative `(root, watermark)` per owner
///
/// [`Settlement::submit`] is the only way to advance an owner's state. It holds that owner's lock
/// from reading the committed root until the new root is written, so two submissions built on the
/// same root cannot both be accepted.
#[derive(Debug)]
pub struct Settlement {
    validator: RootTransitionValidator,
    owners: RwLock<HashMap<String, Arc<Mutex<CommittedState>>>>,
}

impl Settlement {
    /// Accept commitments signed by `authority`
    #[must_use]
    pub fn new(authority: AuthorityKey) -> Self {
        Self {
            validator: RootTransitionValidator::new(authority),
            owners: RwLock::new(HashMap::new()),
        }
    }

    /// Start tracking `owner` with an empty tree of `height`
    pub fn register(&self, owner: &str, height: usize) -> Result<CommittedState> {
        // validates the height
        smt::SparseMerkleTree::new(height)?;

        let state = CommittedState {
            root: empty_tree_hash(height),
            sequence: 0,
            height,
        };

        let mut owners = self.owners.write();
        if owners.contains_key(owner) {
            return Err(Error::AlreadyRegistered {
                owner: owner.to_string(),
            });
        }
        owners.insert(owner.to_string(), Arc::new(Mutex::new(state)));

        tracing::info!(owner, height, "registered owner");
        Ok(state)
    }

    /// The current state of `owner`
    pub fn state(&self, owner: &str) -> Result<CommittedState> {
        Ok(*self.lookup(owner)?.lock())
    }

    /// Validate `updates` against the committed state and commit the result
    ///
    /// On failure the state is unchanged.
    #[tracing::instrument(skip(self, updates, predicate, commitment))]
    pub fn submit<P>(
        &self,
        owner: &str,
        updates: &[LeafUpdate],
        predicate: &P,
        commitment: &RootCommitment,
    ) -> Result<CommittedState>
    where
        P: UpdatePredicate + ?Sized,
    {
        let entry = self.lookup(owner)?;
        let mut state = entry.lock();

        let authorized = self
            .validator
            .validate(&state, updates, predicate, commitment)?;

        state.root = authorized.root;
        state.sequence = authorized.sequence;

        tracing::info!(root = %state.root, sequence = state.sequence, "committed");
        Ok(*state)
    }

    fn lookup(&self, owner: &str) -> Result<Arc<Mutex<CommittedState>>> {
        self.owners
            .read()
            .get(owner)
            .cloned()
            .ok_or_else(|| Error::UnknownOwner {
                owner: owner.to_string(),
            })
    }
}
