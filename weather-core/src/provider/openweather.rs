use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::{config::ProviderConfig, error::FetchError, model::RawWeatherPayload};

use super::WeatherFetcher;

#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    api_key: Option<String>,
    base_url: String,
    http: Client,
}

impl OpenWeatherFetcher {
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::ClientInit)?;

        Ok(Self {
            api_key: config.api_key().map(str::to_owned),
            base_url: config.base_url.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, FetchError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_deref().unwrap_or_default()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                city: city.to_string(),
                source,
            })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Body {
            city: city.to_string(),
            source,
        })?;

        debug!(city, %status, "OpenWeather current weather response");

        if status != StatusCode::OK {
            warn!(city, %status, body = %truncate_body(&body), "OpenWeather rejected request");
            return Ok(RawWeatherPayload::rejected());
        }

        let parsed = serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            city: city.to_string(),
            source,
        })?;

        Ok(RawWeatherPayload::Provider(parsed))
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
