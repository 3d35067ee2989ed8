use crate::{Config, error::FetchError, model::RawWeatherPayload};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

pub use openweather::OpenWeatherFetcher;

/// Issues one request for the current conditions in `city`.
///
/// A provider rejection is `Ok(RawWeatherPayload::Error { .. })`; only
/// transport-level problems are `Err`.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, FetchError>;
}

/// Construct the fetcher described by `config`.
///
/// A missing API key is not an error here: requests go out with an empty
/// credential and the provider rejects them.
pub fn fetcher_from_config(config: &Config) -> Result<Arc<dyn WeatherFetcher>, FetchError> {
    if !config.has_api_key() {
        tracing::warn!(
            env = crate::config::API_KEY_ENV,
            "No OpenWeather API key configured; requests will be rejected by the provider"
        );
    }

    Ok(Arc::new(OpenWeatherFetcher::new(&config.provider)?))
}
