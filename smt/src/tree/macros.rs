/// Macro to generate a [`SparseMerkleTree`] with a more convenient syntax
///
/// Values can be anything that implements [`Hashable`], and are stored as their leaf digest.
///
/// ```rust
/// # use smt::{smt, Field, hash::Hashable};
/// let tree = smt! {
///   height: 8,
///   5 => [Field::from(4)],
///   6 => vec![Field::from(1), Field::from(2)],
/// };
///
/// assert_eq!(tree.get_leaf(5).unwrap(), [Field::from(4)].hash());
/// assert_eq!(tree.len(), 2);
/// ```
///
/// # Panics
///
/// Panics if the height is invalid or an index is out of range
///
/// [`SparseMerkleTree`]: crate::SparseMerkleTree
/// [`Hashable`]: crate::hash::Hashable
#[macro_export]
macro_rules! smt {
    { height: $height:expr $(, $index:expr => $value:expr)* $(,)? } => {{
        let mut tree = $crate::SparseMerkleTree::new($height).expect("invalid height");
        $(
            tree.set_leaf($index, $crate::hash::Hashable::hash(&$value)).expect("index out of range");
        )*
        tree
    }};
}
