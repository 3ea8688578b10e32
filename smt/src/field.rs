use std::{
    cmp::Ordering,
    fmt::{Debug, Display},
    hash::Hash,
    ops::{Add, Sub},
    str::FromStr,
};

use miden_crypto::{Felt, StarkField};
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};

/// An element of the 64-bit Goldilocks prime field
///
/// Unlike [`Felt`], a [`Field`] is totally ordered by its canonical integer value, so
/// application rules such as "the new counter is greater than the old one" can be expressed
/// directly with comparison operators.
///
/// ```rust
/// # use smt::Field;
/// let a = Field::from(3);
/// let b: Field = "4".parse().unwrap();
///
/// assert!(a < b);
/// assert_eq!(a + Field::from(1), b);
/// assert_eq!(b.to_string(), "4");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Field(Felt);

impl Field {
    /// The additive identity
    pub const ZERO: Field = Field(Felt::new(0));

    /// The multiplicative identity
    pub const ONE: Field = Field(Felt::new(1));

    /// The field modulus, `2^64 - 2^32 + 1`
    pub const MODULUS: u64 = Felt::MODULUS;

    /// Create a new field element, reducing `value` modulo [`Field::MODULUS`]
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(Felt::new(value))
    }

    /// The canonical integer value of this element, always less than [`Field::MODULUS`]
    #[inline]
    #[must_use]
    pub fn as_u64(&self) -> u64 {
        self.0.as_int()
    }

    /// Pack arbitrary bytes into field elements, 7 bytes per element
    ///
    /// Every chunk fits below the modulus, so the packing is injective for inputs of the same
    /// length. The final chunk is zero-padded.
    ///
    /// ```rust
    /// # use smt::Field;
    /// let fields = Field::from_bytes(&[1; 10]);
    /// assert_eq!(fields.len(), 2);
    /// ```
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Vec<Field> {
        bytes
            .chunks(7)
            .map(|chunk| {
                let mut buf = [0; 8];
                buf[1..=chunk.len()].copy_from_slice(chunk);
                Field::new(u64::from_be_bytes(buf))
            })
            .collect()
    }

    /// Subtract `other` from `self`, returning `None` if the integer result would be negative
    #[inline]
    #[must_use]
    pub fn checked_sub(self, other: Field) -> Option<Field> {
        self.as_u64().checked_sub(other.as_u64()).map(Field::new)
    }
}

impl From<u64> for Field {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<Felt> for Field {
    fn from(value: Felt) -> Self {
        Self(value)
    }
}

impl From<Field> for Felt {
    fn from(value: Field) -> Self {
        value.0
    }
}

impl PartialOrd for Field {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u64().cmp(&other.as_u64())
    }
}

impl Hash for Field {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_u64().hash(state);
    }
}

impl Add for Field {
    type Output = Field;

    fn add(self, rhs: Self) -> Self::Output {
        Field(self.0 + rhs.0)
    }
}

impl Sub for Field {
    type Output = Field;

    fn sub(self, rhs: Self) -> Self::Output {
        Field(self.0 - rhs.0)
    }
}

impl Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field({})", self.as_u64())
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

/// The string was not the canonical decimal form of a field element
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid field element: {0:?}")]
pub struct ParseFieldError(String);

impl FromStr for Field {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<u64>() {
            Ok(n) if n < Self::MODULUS => Ok(Self::new(n)),
            _ => Err(ParseFieldError(s.to_string())),
        }
    }
}

impl Serialize for Field {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl Visitor<'_> for V {
            type Value = Field;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a canonical field element as a decimal string or integer")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                if v < Field::MODULUS {
                    Ok(Field::new(v))
                } else {
                    Err(E::custom(format!("{v} is not below the field modulus")))
                }
            }
        }

        deserializer.deserialize_any(V)
    }
}

#[cfg(any(test, feature = "proptest"))]
mod proptest_impls {
    use super::Field;
    use proptest::{arbitrary::StrategyFor, prelude::*, strategy::Map};

    impl Arbitrary for Field {
        type Parameters = ();
        type Strategy = Map<StrategyFor<u64>, fn(u64) -> Self>;

        fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
            any::<u64>().prop_map(Field::new)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prop_assert_eq;
    use test_strategy::proptest;

    use super::*;

    #[test]
    fn non_canonical_strings_are_rejected() {
        assert!("18446744069414584321".parse::<Field>().is_err());
        assert!("-1".parse::<Field>().is_err());
        assert!("one".parse::<Field>().is_err());
        assert_eq!("18446744069414584320".parse::<Field>().unwrap(), Field::ZERO - Field::ONE);
    }

    #[test]
    fn ordering_uses_canonical_value() {
        let max = Field::ZERO - Field::ONE;
        assert!(max > Field::from(1_000_000u64));
        assert_eq!(Field::new(Field::MODULUS), Field::ZERO);
    }

    #[test]
    fn checked_sub_detects_underflow() {
        assert_eq!(Field::from(100u64).checked_sub(Field::from(12u64)), Some(Field::from(88u64)));
        assert_eq!(Field::from(100u64).checked_sub(Field::from(150u64)), None);
    }

    #[test]
    fn json_form_is_a_decimal_string() {
        let json = serde_json::to_string(&Field::from(42u64)).unwrap();
        assert_eq!(json, "\"42\"");

        let from_int: Field = serde_json::from_str("42").unwrap();
        assert_eq!(from_int, Field::from(42u64));
    }

    #[proptest]
    fn string_round_trip(field: Field) {
        let again: Field = field.to_string().parse().unwrap();
        prop_assert_eq!(field, again);
    }

    #[proptest]
    fn msgpack_round_trip(field: Field) {
        let bytes = rmp_serde::to_vec(&field).unwrap();
        let again: Field = rmp_serde::from_slice(&bytes).unwrap();
        prop_assert_eq!(field, again);
    }
}
