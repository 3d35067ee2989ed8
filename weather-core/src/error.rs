use thiserror::Error;

/// Transport-level failure talking to the provider.
///
/// Distinct from a provider rejection, which is reported in-band as an
/// error record.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientInit(#[source] reqwest::Error),

    #[error("Request to weather provider failed for '{city}'")]
    Transport {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read weather provider response body for '{city}'")]
    Body {
        city: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weather provider returned invalid JSON for '{city}'")]
    Decode {
        city: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Forecast days must be between 1 and {max}, got {requested}")]
    InvalidDays { requested: u32, max: u32 },
}
