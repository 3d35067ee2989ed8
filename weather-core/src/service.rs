use std::sync::Arc;

use tracing::info;

use crate::{
    Config, ForecastConfig,
    error::{FetchError, ServiceError},
    forecast::forecast,
    model::{ForecastReport, WeatherRecord},
    normalize::parse,
    provider::{WeatherFetcher, fetcher_from_config},
};

/// Caller-facing entry point shared by the CLI and the MCP server.
#[derive(Debug, Clone)]
pub struct WeatherService {
    fetcher: Arc<dyn WeatherFetcher>,
    forecast: ForecastConfig,
}

impl WeatherService {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, forecast: ForecastConfig) -> Self {
        Self { fetcher, forecast }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(fetcher_from_config(config)?, config.forecast.clone()))
    }

    pub fn default_days(&self) -> u32 {
        self.forecast.default_days
    }

    /// Current conditions for `city`.
    ///
    /// A provider rejection comes back as [`WeatherRecord::Error`]; only
    /// transport failures are `Err`.
    pub async fn get_weather(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        info!(city, "Getting weather");
        let raw = self.fetcher.fetch(city).await?;
        Ok(parse(&raw))
    }

    /// `days` repeated snapshots of the current conditions for `city`.
    ///
    /// `None` uses the configured default day count.
    pub async fn get_forecast(
        &self,
        city: &str,
        days: Option<u32>,
    ) -> Result<ForecastReport, ServiceError> {
        let days = days.unwrap_or(self.forecast.default_days);
        if days == 0 || days > self.forecast.max_days {
            return Err(ServiceError::InvalidDays {
                requested: days,
                max: self.forecast.max_days,
            });
        }

        info!(city, days, "Getting forecast");
        Ok(forecast(self.fetcher.as_ref(), city, days).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::tests::{ScriptedFetcher, Step};
    use crate::model::PROVIDER_REJECTED;

    fn service(steps: Vec<Step>) -> (WeatherService, Arc<ScriptedFetcher>) {
        let fetcher = Arc::new(ScriptedFetcher::new(steps));
        let service = WeatherService::new(fetcher.clone(), ForecastConfig::default());
        (service, fetcher)
    }

    #[tokio::test]
    async fn get_weather_returns_observation() {
        let (service, _) = service(vec![Step::Ok("Paris")]);

        let record = service.get_weather("paris").await.unwrap();

        assert_eq!(
            record.observation().and_then(|o| o.city.as_deref()),
            Some("Paris")
        );
    }

    #[tokio::test]
    async fn get_weather_returns_rejection_in_band() {
        let (service, _) = service(vec![Step::Rejected]);

        let record = service.get_weather("paris").await.unwrap();

        assert_eq!(
            record,
            WeatherRecord::Error {
                error: PROVIDER_REJECTED.into()
            }
        );
    }

    #[tokio::test]
    async fn get_weather_propagates_fetch_fault() {
        let (service, _) = service(vec![Step::Fault]);

        assert!(service.get_weather("paris").await.is_err());
    }

    #[tokio::test]
    async fn get_forecast_uses_default_days() {
        let (service, fetcher) = service(vec![Step::Ok("a"), Step::Ok("b"), Step::Ok("c")]);

        let report = service.get_forecast("London", None).await.unwrap();

        assert_eq!(fetcher.calls(), 3);
        assert_eq!(report.records.len(), 3);
    }

    #[tokio::test]
    async fn get_forecast_reports_partial_failure() {
        let (service, _) = service(vec![Step::Ok("a"), Step::Rejected, Step::Ok("c")]);

        let report = service.get_forecast("London", Some(3)).await.unwrap();

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.failed_days, 1);
    }

    #[tokio::test]
    async fn get_forecast_rejects_zero_days_without_fetching() {
        let (service, fetcher) = service(vec![]);

        let err = service.get_forecast("London", Some(0)).await.unwrap_err();

        assert!(matches!(
            err,
            ServiceError::InvalidDays {
                requested: 0,
                max: 16
            }
        ));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn get_forecast_rejects_too_many_days() {
        let (service, fetcher) = service(vec![]);

        let err = service.get_forecast("London", Some(17)).await.unwrap_err();

        assert!(err.to_string().contains("between 1 and 16"));
        assert_eq!(fetcher.calls(), 0);
    }
}
