use super::{DecodeError, EncodeError};

/// An error encountered while persisting or restoring store records
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A root index entry points at a snapshot record that does not exist
    #[error("root index points at missing snapshot record {sequence}")]
    DanglingRoot {
        /// The sequence number in the index entry
        sequence: u64,
    },

    /// Error encoding data to binary format
    #[error("error encoding data to binary format: {0}")]
    Encode(#[from] EncodeError),

    /// Error decoding data from binary format
    #[error("error decoding data from binary format: {0}")]
    Decode(#[from] DecodeError),

    /// Rocksdb error
    #[error("rocksdb error: {0}")]
    RocksDb(#[from] ::rocksdb::Error),
}
