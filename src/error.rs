use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use thiserror::Error;

use crate::submission::Acknowledgment;

pub type ContactResult<T> = Result<T, ContactError>;

/// Failures that reach the client, all rendered as `success: false` acknowledgments
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Fill required fields")]
    MissingFields(Vec<&'static str>),

    #[error("Invalid request body")]
    InvalidPayload(#[from] JsonPayloadError),

    #[error("Server Error")]
    DatabaseError(#[from] sqlx::Error),
}

impl ContactError {
    /// The body sent back to the client
    pub fn acknowledgment(&self) -> Acknowledgment {
        Acknowledgment::failure(self.to_string())
    }
}

impl ResponseError for ContactError {
    fn status_code(&self) -> StatusCode {
        match self {
            // Validation failures are acknowledged, not faults
            Self::MissingFields(_) => StatusCode::OK,
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.acknowledgment())
    }
}
