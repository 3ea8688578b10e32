use serde::{de::DeserializeOwned, Serialize};

/// An error encountered when encoding data to its database format
#[derive(Debug, thiserror::Error)]
#[error("encode error: {0}")]
pub struct EncodeError(rmp_serde::encode::Error);

/// An error encountered when decoding data in its database format
#[derive(Debug, thiserror::Error)]
#[error("decode error: {0}")]
pub struct DecodeError(rmp_serde::decode::Error);

// named fields, so records stay readable if fields are added later
pub(crate) fn encode<T: Serialize>(t: &T) -> Result<Vec<u8>, EncodeError> {
    rmp_serde::encode::to_vec_named(t).map_err(EncodeError)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    rmp_serde::decode::from_slice(bytes).map_err(DecodeError)
}
