use derive_more::Display;

use crate::errors::code::ErrorCode;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ReasonCode {
    #[display(fmt = "root/not-found")]
    RootNotFound,

    #[display(fmt = "root/invalid")]
    RootInvalid,

    #[display(fmt = "items/too-many")]
    ItemsTooMany,

    #[display(fmt = "items/index-out-of-range")]
    ItemsIndexOutOfRange,

    #[display(fmt = "height/invalid")]
    HeightInvalid,

    #[display(fmt = "height/too-large")]
    HeightTooLarge,

    #[display(fmt = "height/mismatch")]
    HeightMismatch,

    #[display(fmt = "error/internal")]
    Internal,
}

impl ReasonCode {
    pub fn code(&self) -> ErrorCode {
        match self {
            ReasonCode::RootNotFound => ErrorCode::NotFound,
            ReasonCode::RootInvalid => ErrorCode::InvalidArgument,
            ReasonCode::ItemsTooMany => ErrorCode::InvalidArgument,
            ReasonCode::ItemsIndexOutOfRange => ErrorCode::InvalidArgument,
            ReasonCode::HeightInvalid => ErrorCode::InvalidArgument,
            ReasonCode::HeightTooLarge => ErrorCode::InvalidArgument,
            ReasonCode::HeightMismatch => ErrorCode::FailedPrecondition,
            ReasonCode::Internal => ErrorCode::Internal,
        }
    }

    pub fn from_store_error(err: &offchain::Error) -> Self {
        match err {
            offchain::Error::UnknownRoot { .. } => ReasonCode::RootNotFound,
            offchain::Error::TooManyItems { .. } => ReasonCode::ItemsTooMany,
            offchain::Error::Tree(smt::Error::IndexOutOfRange { .. }) => {
                ReasonCode::ItemsIndexOutOfRange
            }
            offchain::Error::Tree(smt::Error::InvalidHeight { .. }) => ReasonCode::HeightInvalid,
            offchain::Error::HeightTooLarge { .. } => ReasonCode::HeightTooLarge,
            offchain::Error::HeightMismatch { .. } => ReasonCode::HeightMismatch,
            _ => ReasonCode::Internal,
        }
    }
}
