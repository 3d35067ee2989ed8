//! Repeated-snapshot forecast.
//!
//! The provider's current-weather endpoint is queried once per requested
//! day, so every entry describes "now". Callers that need real per-day
//! data must not treat the entries as distinct days.

use tracing::{info, warn};

use crate::{
    model::{ForecastReport, WeatherRecord},
    normalize::parse,
    provider::WeatherFetcher,
};

/// Runs `parse(fetch(city))` `days` times, sequentially, dropping failures.
///
/// Each iteration is an independent, uncached request. Error records and
/// transport failures are counted in [`ForecastReport::failed_days`] and
/// never abort the loop.
pub async fn forecast(fetcher: &dyn WeatherFetcher, city: &str, days: u32) -> ForecastReport {
    let mut report = ForecastReport::default();

    for day in 1..=days {
        match fetcher.fetch(city).await {
            Ok(raw) => match parse(&raw) {
                WeatherRecord::Observed(obs) => report.records.push(obs),
                WeatherRecord::Error { error } => {
                    warn!(city, day, %error, "Dropping forecast day");
                    report.failed_days += 1;
                }
            },
            Err(err) => {
                warn!(city, day, error = %err, "Dropping forecast day after transport failure");
                report.failed_days += 1;
            }
        }
    }

    info!(
        city,
        days,
        failed_days = report.failed_days,
        "Forecast assembled"
    );

    report
}
