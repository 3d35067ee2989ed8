use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{
    CustomType, CustomUserError, Password, PasswordDisplayMode, Text, validator::Validation,
};
use weather_core::{Config, WeatherRecord, WeatherService};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the OpenWeather API key and connection settings.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, forwarded to the provider as-is.
        city: String,

        /// Print the normalized record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show a repeated-snapshot forecast for a city.
    ///
    /// Every entry is the current conditions at request time; the provider's
    /// real multi-day forecast is not queried.
    Forecast {
        /// City name, forwarded to the provider as-is.
        city: String,

        /// Number of days; defaults to `forecast.default_days` from the config.
        #[arg(long, short)]
        days: Option<u32>,

        /// Print the forecast report as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => {
                let service = service()?;
                let record = service.get_weather(&city).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }

                match record {
                    WeatherRecord::Observed(obs) => {
                        if !json {
                            print!("{}", output::observation(&obs));
                        }
                        Ok(())
                    }
                    WeatherRecord::Error { error } => bail!("{error} for '{city}'"),
                }
            }
            Command::Forecast { city, days, json } => {
                let service = service()?;
                let report = service.get_forecast(&city, days).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", output::forecast(&report));
                }

                if report.is_total_failure() {
                    bail!("No forecast data could be fetched for '{city}'");
                }
                Ok(())
            }
        }
    }
}

fn service() -> anyhow::Result<WeatherService> {
    let config = Config::load()?;
    WeatherService::from_config(&config).context("Failed to set up weather provider")
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()?;

    let base_url = Text::new("Endpoint URL:")
        .with_default(&config.provider.base_url)
        .prompt()?;

    let timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.provider.timeout().as_secs())
        .with_error_message("Please enter a whole number of seconds")
        .with_validator(validate_timeout)
        .prompt()?;

    config.set_api_key(api_key.trim().to_string());
    config.provider.base_url = base_url.trim().to_string();
    config.provider.timeout_secs = timeout_secs;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn validate_timeout(secs: &u64) -> Result<Validation, CustomUserError> {
    Ok(if *secs == 0 {
        Validation::Invalid("Timeout must be at least 1 second".into())
    } else {
        Validation::Valid
    })
}
