use actix_web::{
    error::BlockingError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use serde::Serialize;
use std::{error::Error, fmt::Display};

use super::reason::ReasonCode;

#[derive(Debug)]
pub struct HTTPError {
    pub reason: ReasonCode,
    source: Option<Box<dyn Error>>,
}

#[derive(Serialize)]
pub struct ErrorOutput {
    error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    code: String,
    reason: String,
    message: String,
}

impl HTTPError {
    pub fn new(reason: ReasonCode, source: Option<Box<dyn std::error::Error>>) -> HTTPError {
        HTTPError { reason, source }
    }
}

impl Display for HTTPError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.reason.code(), self.reason)
    }
}

impl std::error::Error for HTTPError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref())
    }
}

impl actix_web::error::ResponseError for HTTPError {
    fn error_response(&self) -> HttpResponse {
        let error = ErrorOutput {
            error: ErrorDetail {
                code: self.reason.code().to_string(),
                reason: self.reason.to_string(),
                message: self
                    .source
                    .as_ref()
                    .map_or_else(|| self.reason.to_string(), |source| source.to_string()),
            },
        };

        match serde_json::to_string(&error) {
            Ok(body) => HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .body(body),
            Err(_) => HttpResponse::build(self.status_code()).finish(),
        }
    }

    fn status_code(&self) -> StatusCode {
        self.reason.code().status_code()
    }
}

impl From<offchain::Error> for HTTPError {
    fn from(err: offchain::Error) -> Self {
        let reason = ReasonCode::from_store_error(&err);
        HTTPError::new(reason, Some(Box::new(err)))
    }
}

impl From<BlockingError> for HTTPError {
    fn from(err: BlockingError) -> Self {
        HTTPError::new(ReasonCode::Internal, Some(Box::new(err)))
    }
}
