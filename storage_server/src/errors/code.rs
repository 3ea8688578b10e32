use actix_web::http::StatusCode;
use derive_more::Display;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum ErrorCode {
    #[display(fmt = "invalid-argument")]
    InvalidArgument,

    #[display(fmt = "failed-precondition")]
    FailedPrecondition,

    #[display(fmt = "not-found")]
    NotFound,

    #[display(fmt = "internal")]
    Internal,
}

impl ErrorCode {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorCode::FailedPrecondition => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
