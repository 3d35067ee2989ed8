use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Message used when the provider answers with anything but HTTP 200.
pub const PROVIDER_REJECTED: &str = "Unable to fetch weather data";

/// What the fetcher hands to the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum RawWeatherPayload {
    /// Decoded JSON body of a successful provider response, unvalidated.
    Provider(Value),
    /// Synthesized locally when the provider rejected the request.
    Error { error: String },
}

impl RawWeatherPayload {
    pub fn rejected() -> Self {
        Self::Error {
            error: PROVIDER_REJECTED.to_string(),
        }
    }
}

/// Normalized current conditions. Every field is absent when the provider omitted it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherObservation {
    /// Location name as echoed by the provider, not necessarily the queried string.
    pub city: Option<String>,
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub condition: Option<String>,
    /// Percent.
    pub humidity: Option<u8>,
    /// Metres per second.
    pub wind_speed: Option<f64>,
}

/// Either a full observation or the single-key error record, never a mix.
///
/// Serializes as `{"city": .., "temperature": .., ...}` or `{"error": ".."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherRecord {
    Observed(WeatherObservation),
    Error { error: String },
}

impl WeatherRecord {
    pub fn is_error(&self) -> bool {
        matches!(self, WeatherRecord::Error { .. })
    }

    pub fn observation(&self) -> Option<&WeatherObservation> {
        match self {
            WeatherRecord::Observed(obs) => Some(obs),
            WeatherRecord::Error { .. } => None,
        }
    }

    pub fn into_observation(self) -> Result<WeatherObservation, String> {
        match self {
            WeatherRecord::Observed(obs) => Ok(obs),
            WeatherRecord::Error { error } => Err(error),
        }
    }
}

/// Outcome of a repeated-snapshot forecast.
///
/// `records.len() + failed_days` equals the number of requested days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastReport {
    /// Successful records in call order (day 1 first).
    pub records: Vec<WeatherObservation>,
    /// Days dropped because the provider rejected the call or the transport failed.
    pub failed_days: u32,
}

impl ForecastReport {
    pub fn requested_days(&self) -> u32 {
        self.records.len() as u32 + self.failed_days
    }

    /// True when every requested day failed.
    pub fn is_total_failure(&self) -> bool {
        self.records.is_empty() && self.failed_days > 0
    }
}

struct OrNa<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for OrNa<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("n/a"),
        }
    }
}

/// One-line summary, e.g. `Current weather in Paris: clear sky, 18.5°C, Humidity: 60%, Wind: 3.1 m/s`.
impl fmt::Display for WeatherObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Current weather in {}: {}, {}°C, Humidity: {}%, Wind: {} m/s",
            OrNa(&self.city),
            OrNa(&self.condition),
            OrNa(&self.temperature),
            OrNa(&self.humidity),
            OrNa(&self.wind_speed),
        )
    }
}
