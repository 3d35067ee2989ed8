use std::fmt::{Display, Write};

use weather_core::{ForecastReport, WeatherObservation};

fn or_na<T: Display>(value: &Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{v}{unit}"),
        None => "n/a".to_string(),
    }
}

pub fn observation(obs: &WeatherObservation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Location:    {}", or_na(&obs.city, ""));
    let _ = writeln!(out, "Temperature: {}", or_na(&obs.temperature, " °C"));
    let _ = writeln!(out, "Condition:   {}", or_na(&obs.condition, ""));
    let _ = writeln!(out, "Humidity:    {}", or_na(&obs.humidity, " %"));
    let _ = writeln!(out, "Wind:        {}", or_na(&obs.wind_speed, " m/s"));
    out
}

pub fn forecast(report: &ForecastReport) -> String {
    let mut out = String::new();

    for (i, obs) in report.records.iter().enumerate() {
        let _ = writeln!(
            out,
            "#{:<2} {:<16} {:>9}  {:<20} humidity {:>5}  wind {}",
            i + 1,
            or_na(&obs.city, ""),
            or_na(&obs.temperature, " °C"),
            or_na(&obs.condition, ""),
            or_na(&obs.humidity, "%"),
            or_na(&obs.wind_speed, " m/s"),
        );
    }

    if report.failed_days > 0 {
        let _ = writeln!(
            out,
            "{} of {} days could not be fetched",
            report.failed_days,
            report.requested_days()
        );
    }

    out
}
