/// Shorthand for a [`std::result::Result`] with this crate's [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur when constructing or addressing a [`SparseMerkleTree`]
///
/// [`SparseMerkleTree`]: crate::SparseMerkleTree
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested height is outside `1..=MAX_HEIGHT`
    #[error("invalid tree height {height}, must be between 1 and {max}")]
    InvalidHeight {
        /// The height that was requested
        height: usize,
        /// The largest supported height
        max: usize,
    },

    /// The index does not address a leaf slot of the tree
    #[error("index {index} out of range for tree with {capacity} leaves")]
    IndexOutOfRange {
        /// The index that was requested
        index: u64,
        /// The number of leaf slots in the tree
        capacity: u128,
    },

    /// A decoded witness has more steps than a tree of `MAX_HEIGHT` can produce
    #[error("witness has {len} steps, at most {max} are allowed")]
    WitnessTooLong {
        /// The number of steps found
        len: usize,
        /// `MAX_HEIGHT - 1`
        max: usize,
    },
}
