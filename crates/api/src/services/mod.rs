mod locations;
mod weather;

pub use locations::*;
pub use weather::*;

use log::{error, warn};

use crate::{
    error::{Error, LOCATION_ID_NOT_INTEGER},
    provider::{ProviderError, ProviderQuery},
};

/// Location identifiers arrive as path segments and must be integers.
pub fn parse_location_id(raw: &str) -> Result<i64, Error> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::InvalidInput(LOCATION_ID_NOT_INTEGER.to_string()))
}

/// Translates a provider failure for `query` into the client-facing kind.
pub(crate) fn provider_failure(err: ProviderError, query: &ProviderQuery) -> Error {
    match err {
        ProviderError::Timeout => {
            error!("weather provider timed out for '{}'", query);
            Error::Timeout
        }
        ProviderError::NotFound(detail) => {
            warn!("weather provider has no location '{}': {}", query, detail);
            Error::location_not_found(query)
        }
        ProviderError::Upstream(detail) | ProviderError::MalformedPayload(detail) => {
            error!("weather provider failed for '{}': {}", query, detail);
            Error::unavailable()
        }
    }
}
