use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt::Display;

pub const SERVICE_UNAVAILABLE: &str = "service is unavailable";
pub const INVALID_DATA_INPUT: &str = "invalid data input";
pub const LOCATION_ID_NOT_INTEGER: &str = "location_id must be an integer";
pub const CITY_NAME_REQUIRED: &str = "input data field 'city_name' is required";

/// Error kinds reported to API clients. The message is what the client
/// sees; driver and upstream details are logged where the error is built.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("service is unavailable")]
    Timeout,
    #[error("{0}")]
    Unavailable(String),
}

impl Error {
    pub fn location_not_found(location: impl Display) -> Self {
        Error::NotFound(format!("location '{}' not found", location))
    }

    pub fn location_does_not_exist(location_id: i64) -> Self {
        Error::NotFound(format!("location '{}' does not exist", location_id))
    }

    pub fn location_exists(location: impl Display) -> Self {
        Error::Conflict(format!("location '{}' already exist", location))
    }

    pub fn unavailable() -> Self {
        Error::Unavailable(SERVICE_UNAVAILABLE.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Error::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
