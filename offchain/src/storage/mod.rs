//! Persistence for [`OffchainStore`] records
//!
//! A [`Storage`] is a small ordered key-value interface. Records are encoded with MessagePack and
//! every snapshot write is applied as a single atomic batch, so a crash never leaves an owner's
//! sequence counter ahead of, or behind, its records.
//!
//! [`OffchainStore`]: crate::OffchainStore

use std::fmt::Debug;

mod codec;
pub use codec::{DecodeError, EncodeError};
pub(crate) use codec::{decode, encode};

mod error;
pub use error::Error;

pub(crate) mod keys;

pub mod memory;
pub mod rocksdb;

/// A list of puts to apply atomically
pub type Batch = Vec<(Vec<u8>, Vec<u8>)>;

/// Types which can act as a storage backend for an [`OffchainStore`]
///
/// [`OffchainStore`]: crate::OffchainStore
pub trait Storage: Debug + Send + Sync {
    /// The value stored under `key`
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error>;

    /// Apply every put in `batch`, or none of them
    fn write(&self, batch: Batch) -> Result<(), Error>;

    /// Every value whose key starts with `prefix`, in key order
    fn scan(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, Error>;

    /// Make every completed write durable
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        (**self).get(key)
    }

    fn write(&self, batch: Batch) -> Result<(), Error> {
        (**self).write(batch)
    }

    fn scan(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        (**self).scan(prefix)
    }

    fn flush(&self) -> Result<(), Error> {
        (**self).flush()
    }
}

#[cfg(test)]
mod tests;
