use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::{
    hash::{hash_leaf, Digest, Hashable},
    Field,
};

/// The application data stored at one index of a tree
///
/// A payload is an ordered sequence of field elements (a balance, an encrypted key share, a
/// counter). It enters a [`SparseMerkleTree`] as its [`Hashable::hash`].
///
/// [`SparseMerkleTree`]: crate::SparseMerkleTree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Vec<Field>);

impl Payload {
    /// Create a payload from its field elements
    #[inline]
    #[must_use]
    pub fn new(fields: Vec<Field>) -> Self {
        Self(fields)
    }

    /// The leaf digest of this payload
    #[inline]
    #[must_use]
    pub fn digest(&self) -> Digest {
        hash_leaf(&self.0)
    }

    /// The first field element, or zero for an empty payload
    ///
    /// Single-value applications (counters, balances) keep their value here.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Field {
        self.0.first().copied().unwrap_or(Field::ZERO)
    }
}

impl Deref for Payload {
    type Target = [Field];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Field>> for Payload {
    fn from(value: Vec<Field>) -> Self {
        Self(value)
    }
}

impl<const N: usize> From<[Field; N]> for Payload {
    fn from(value: [Field; N]) -> Self {
        Self(value.to_vec())
    }
}

impl FromIterator<Field> for Payload {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Hashable for Payload {
    fn hash(&self) -> Digest {
        self.digest()
    }
}

#[cfg(any(test, feature = "proptest"))]
mod proptest_impls {
    use proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};

    use super::{Field, Payload};

    impl Arbitrary for Payload {
        type Parameters = ();
        type Strategy = Map<StrategyFor<Vec<Field>>, fn(Vec<Field>) -> Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            any::<Vec<Field>>().prop_map(Payload)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_of_empty_payload_is_zero() {
        assert_eq!(Payload::default().value(), Field::ZERO);
        assert_eq!(Payload::from([Field::from(9), Field::from(1)]).value(), Field::from(9));
    }

    #[test]
    fn serializes_as_a_list_of_strings() {
        let payload = Payload::from([Field::from(88), Field::from(3)]);
        let json = serde_json::to_string(&payload).unwrap();

        assert_eq!(json, r#"["88","3"]"#);
        assert_eq!(serde_json::from_str::<Payload>(&json).unwrap(), payload);
    }
}
