use proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};

use super::Digest;
use crate::Field;

// arbitrary words, not hash outputs, so `Digest::EMPTY` is reachable
impl Arbitrary for Digest {
    type Parameters = ();
    type Strategy = Map<StrategyFor<[Field; 4]>, fn([Field; 4]) -> Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        any::<[Field; 4]>().prop_map(Digest::from_word)
    }
}
