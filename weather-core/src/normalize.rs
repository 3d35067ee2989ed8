//! Maps provider payloads onto [`WeatherRecord`].
//!
//! Missing or mistyped nested fields become absent values; nothing here fails.

use serde_json::Value;

use crate::model::{RawWeatherPayload, WeatherObservation, WeatherRecord};

pub fn parse(raw: &RawWeatherPayload) -> WeatherRecord {
    match raw {
        RawWeatherPayload::Error { error } => WeatherRecord::Error {
            error: error.clone(),
        },
        RawWeatherPayload::Provider(body) => parse_body(body),
    }
}

fn parse_body(body: &Value) -> WeatherRecord {
    // A provider body carrying its own `error` key passes through like a local one.
    if let Some(error) = body.get("error") {
        let error = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return WeatherRecord::Error { error };
    }

    let main = body.get("main");

    WeatherRecord::Observed(WeatherObservation {
        city: str_field(body.get("name")),
        temperature: main.and_then(|m| m.get("temp")).and_then(Value::as_f64),
        condition: str_field(
            body.get("weather")
                .and_then(|w| w.get(0))
                .and_then(|w| w.get("description")),
        ),
        humidity: main
            .and_then(|m| m.get("humidity"))
            .and_then(Value::as_u64)
            .and_then(|h| u8::try_from(h).ok()),
        wind_speed: body
            .get("wind")
            .and_then(|w| w.get("speed"))
            .and_then(Value::as_f64),
    })
}

fn str_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}
