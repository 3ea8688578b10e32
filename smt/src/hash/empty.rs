use std::sync::OnceLock;

use super::{hash_node, Digest};
use crate::MAX_HEIGHT;

fn cache() -> &'static [Digest] {
    static CACHE: OnceLock<Vec<Digest>> = OnceLock::new();

    CACHE.get_or_init(|| {
        let mut vec = Vec::with_capacity(MAX_HEIGHT);
        let mut hash = Digest::EMPTY;
        vec.push(hash);

        for _ in 1..MAX_HEIGHT {
            hash = hash_node(hash, hash);
            vec.push(hash);
        }

        vec
    })
}

/// The root of a tree of the given height with every leaf unset
///
/// This function can be defined recursively:
///  - `empty_tree_hash(1) = Digest::EMPTY`
///  - `empty_tree_hash(n) = hash_node(empty_tree_hash(n - 1), empty_tree_hash(n - 1))`
///
/// It is also the digest of an empty subtree whose leaves are `height - 1` levels below it.
///
/// # Panics
///
/// Panics if `height` is 0 or greater than [`MAX_HEIGHT`]
#[must_use]
pub fn empty_tree_hash(height: usize) -> Digest {
    assert_ne!(height, 0, "the smallest possible tree has height 1");
    assert!(height <= MAX_HEIGHT, "height {height} exceeds {MAX_HEIGHT}");

    cache()[height - 1]
}

/// The height `h` for which `empty_tree_hash(h) == root`, if any
///
/// ```rust
/// # use smt::hash::{empty_tree_hash, empty_tree_height, Digest};
/// assert_eq!(empty_tree_height(empty_tree_hash(8)), Some(8));
/// assert_eq!(empty_tree_height(Digest::EMPTY), Some(1));
/// ```
#[must_use]
pub fn empty_tree_height(root: Digest) -> Option<usize> {
    cache().iter().position(|hash| *hash == root).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hashes_are_distinct() {
        let hashes = cache();
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn recursive_definition_holds() {
        for height in 2..=MAX_HEIGHT {
            let below = empty_tree_hash(height - 1);
            assert_eq!(empty_tree_hash(height), hash_node(below, below));
        }
    }

    #[test]
    #[should_panic(expected = "smallest possible tree")]
    fn zero_height_panics() {
        let _ = empty_tree_hash(0);
    }
}
