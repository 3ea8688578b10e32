#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Authenticated off-chain storage for sparse Merkle trees
//!
//! An [`OffchainStore`] keeps the full leaf mapping behind every root it has been given, and
//! signs a [`RootCommitment`] binding each root to a per-owner sequence number. A
//! [`RootTransitionValidator`] accepts a batch of witnessed [`LeafUpdate`]s only if they fold from
//! the committed root to the root the store signed, under an application [`UpdatePredicate`].
//! [`Settlement`] holds the committed `(root, sequence)` per owner and serialises submissions.
//!
//! ```rust
//! # use offchain::{
//! #     client::Replica, predicate::Increasing, storage::memory::MemoryStorage, OffchainStore,
//! #     Settlement, SigningAuthority,
//! # };
//! # use smt::{Field, Payload};
//! let store = OffchainStore::open(MemoryStorage::new(), SigningAuthority::generate(), 32).unwrap();
//! let settlement = Settlement::new(store.public_key());
//! let state = settlement.register("counter", 8).unwrap();
//!
//! // read, modify locally, get a commitment, submit
//! let snapshot = store.get_snapshot("counter", state.root).unwrap();
//! let mut replica = Replica::new(state.height, snapshot).unwrap();
//! let update = replica.update(5, Some(Payload::from([Field::from(4)]))).unwrap();
//!
//! let commitment = store.put_snapshot("counter", 8, replica.snapshot().clone()).unwrap();
//! let state = settlement.submit("counter", &[update], &Increasing, &commitment).unwrap();
//!
//! assert_eq!(state.root, replica.root());
//! assert_eq!(state.sequence, 1);
//! ```

mod authority;
pub use authority::{AuthorityKey, Signature, SigningAuthority};

pub mod client;

mod commitment;
pub use commitment::RootCommitment;

mod error;
pub use error::{Error, Result, Staleness};

pub mod predicate;
pub use predicate::{UpdateContext, UpdatePredicate};

mod settlement;
pub use settlement::{CommittedState, Settlement};

mod snapshot;
pub use snapshot::Snapshot;

pub mod storage;

mod store;
pub use store::{HistoryEntry, OffchainStore, OwnerInfo};

pub mod transfer;

mod validator;
pub use validator::{Authorized, LeafUpdate, LeafValue, RootTransitionValidator};
