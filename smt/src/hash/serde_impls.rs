use serde::{de::Visitor, Deserializer, Serializer};
use serde::{Deserialize, Serialize};

use super::Digest;

// human-readable formats (JSON, TOML) get a hex string, binary formats get the raw bytes
impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct V;
        impl Visitor<'_> for V {
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a rescue-prime optimized hash as bytes or a hex string")
            }

            type Value = Digest;

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let bytes = v
                    .try_into()
                    .map_err(|_| E::custom(format!("incorrect number of bytes: {}", v.len())))?;

                Digest::from_bytes(bytes).ok_or(E::custom("deserialization error"))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Digest::from_hex(v).ok_or_else(|| E::custom(format!("invalid digest: {v:?}")))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(V)
        } else {
            deserializer.deserialize_bytes(V)
        }
    }
}
