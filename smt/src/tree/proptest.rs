use ::proptest::{collection::vec, prelude::*};

use super::SparseMerkleTree;
use crate::hash::Digest;

// heights are kept small so that the generated indices collide often enough to exercise
// overwrites and sibling sharing
impl Arbitrary for SparseMerkleTree {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        (1usize..=12)
            .prop_flat_map(|height| {
                let capacity = 1u64 << (height - 1);
                (Just(height), vec((0..capacity, any::<Digest>()), 0..24))
            })
            .prop_map(|(height, leaves)| {
                SparseMerkleTree::from_leaves(height, leaves)
                    .expect("generated indices are within capacity")
            })
            .boxed()
    }
}
