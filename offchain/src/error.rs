use smt::hash::Digest;

use crate::storage;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad tree height or index
    #[error(transparent)]
    Tree(#[from] smt::Error),

    /// The store has no mapping for this root
    #[error("unknown root {root} for owner {owner:?}")]
    UnknownRoot { owner: String, root: Digest },

    /// The witness of an update does not reproduce the running root
    #[error("update {position} does not match root {expected}")]
    StaleWitness { position: usize, expected: Digest },

    /// The witness of an update was not drawn from a tree of the committed height
    #[error("update {position} has a witness for height {actual}, expected {expected}")]
    WitnessHeight {
        position: usize,
        expected: usize,
        actual: usize,
    },

    #[error("stale commitment: {0}")]
    StaleCommitment(Staleness),

    /// The commitment was not signed by the store's key
    #[error("invalid signature on commitment {sequence} for root {root}")]
    SignatureInvalid { root: Digest, sequence: u64 },

    #[error("update {position} violates predicate: {reason}")]
    PredicateViolation { position: usize, reason: String },

    #[error("batch contains no updates")]
    EmptyBatch,

    #[error("too many items for height {height}: {items} > {capacity}")]
    TooManyItems {
        height: usize,
        items: usize,
        capacity: u128,
    },

    #[error("height {height} exceeds the configured maximum {max}")]
    HeightTooLarge { height: usize, max: usize },

    #[error("owner {owner:?} has height {stored}, got {requested}")]
    HeightMismatch {
        owner: String,
        stored: usize,
        requested: usize,
    },

    #[error("unknown owner {owner:?}")]
    UnknownOwner { owner: String },

    #[error("owner {owner:?} is already registered")]
    AlreadyRegistered { owner: String },

    #[error("storage error")]
    Storage(#[from] storage::Error),

    #[error("secp256k1 error")]
    Secp256k1(#[from] secp256k1::Error),
}

/// Why a commitment could not be accepted on top of the committed state
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Staleness {
    /// The batch folds to a different root than the one that was signed
    #[error("batch produces root {candidate}, commitment is for {committed}")]
    RootMismatch { candidate: Digest, committed: Digest },

    /// The sequence number does not advance the watermark
    #[error("sequence {sequence} does not exceed watermark {watermark}")]
    Sequence { sequence: u64, watermark: u64 },
}

impl Error {
    /// Whether re-fetching the latest snapshot and rebuilding the batch may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StaleWitness { .. } | Error::StaleCommitment(_))
    }

    /// Whether this error indicates a forged or corrupted commitment
    ///
    /// These must be surfaced, never retried.
    #[must_use]
    pub fn is_security_event(&self) -> bool {
        matches!(self, Error::SignatureInvalid { .. })
    }
}
