//! Core library for the `weather` CLI and the `weather-mcp` server.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The fetch → parse → aggregate pipeline against OpenWeather
//! - Shared domain models (raw payloads, normalized records, forecast reports)
//!
//! [`WeatherService`] is the entry point for binaries; the free functions
//! [`parse`] and [`forecast`] are usable on their own with any
//! [`WeatherFetcher`].

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;

pub use config::{Config, ForecastConfig, ProviderConfig};
pub use error::{FetchError, ServiceError};
pub use forecast::forecast;
pub use model::{ForecastReport, RawWeatherPayload, WeatherObservation, WeatherRecord};
pub use normalize::parse;
pub use provider::{OpenWeatherFetcher, WeatherFetcher, fetcher_from_config};
pub use service::WeatherService;
