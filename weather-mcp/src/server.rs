//! MCP surface over [`WeatherService`]: two tools, one resource template and
//! one prompt.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
        ListPromptsResult, ListResourceTemplatesResult, PaginatedRequestParam, PromptMessage,
        PromptMessageRole, ReadResourceRequestParam, ReadResourceResult, ResourceContents,
        ResourceTemplate, ServerCapabilities, ServerInfo,
    },
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use weather_core::{WeatherRecord, WeatherService};

pub const SERVER_NAME: &str = "Weather Service";

const RESOURCE_SCHEME: &str = "weather://";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CityRequest {
    /// Name of the city
    pub city: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ForecastRequest {
    /// Name of the city
    pub city: String,
    /// Number of days to forecast (default: 3)
    #[serde(default)]
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeWeatherArgs {
    /// Name of the city
    pub city: String,
}

#[derive(Clone)]
pub struct WeatherServer {
    service: WeatherService,
    tool_router: ToolRouter<Self>,
    prompt_router: PromptRouter<Self>,
}

#[tool_router]
impl WeatherServer {
    pub fn new(service: WeatherService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }

    #[tool(description = "Get current weather information for a city")]
    async fn get_weather(
        &self,
        Parameters(CityRequest { city }): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let record = match self.service.get_weather(&city).await {
            Ok(record) => record,
            Err(err) => return Ok(tool_failure(err)),
        };

        if let WeatherRecord::Observed(obs) = &record {
            info!(
                %city,
                condition = obs.condition.as_deref().unwrap_or("n/a"),
                temperature = ?obs.temperature,
                "Weather data fetched"
            );
        }

        Ok(CallToolResult::success(vec![Content::json(&record)?]))
    }

    #[tool(
        description = "Get weather forecast for the next few days. Each entry is a fresh snapshot of the current conditions."
    )]
    async fn get_forecast(
        &self,
        Parameters(ForecastRequest { city, days }): Parameters<ForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.service.get_forecast(&city, days).await {
            Ok(report) => Ok(CallToolResult::success(vec![Content::json(&report)?])),
            Err(err) => Ok(tool_failure(err)),
        }
    }
}

#[prompt_router]
impl WeatherServer {
    /// Provide a prompt template for weather analysis
    #[prompt(name = "analyze_weather")]
    async fn analyze_weather(
        &self,
        Parameters(AnalyzeWeatherArgs { city }): Parameters<AnalyzeWeatherArgs>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<Vec<PromptMessage>, McpError> {
        info!(%city, "Generating weather analysis prompt");

        Ok(vec![PromptMessage::new_text(
            PromptMessageRole::User,
            analysis_prompt(&city),
        )])
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Current weather and repeated-snapshot forecasts from OpenWeather. \
                 Read weather://{city} for a one-line summary."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        Ok(ListResourceTemplatesResult::with_all_items(vec![
            weather_template()?,
        ]))
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_weather_resource(uri).await
    }
}

impl WeatherServer {
    async fn read_weather_resource(&self, uri: String) -> Result<ReadResourceResult, McpError> {
        let Some(city) = city_from_uri(&uri) else {
            return Err(McpError::resource_not_found(
                "Unknown resource",
                Some(json!({ "uri": uri })),
            ));
        };
        info!(%city, "Accessing weather resource for city");

        let record = self
            .service
            .get_weather(&city)
            .await
            .map_err(|err| McpError::internal_error(error_chain(err), None))?;

        match record {
            WeatherRecord::Observed(obs) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(obs.to_string(), uri.clone())],
            }),
            WeatherRecord::Error { error } => Err(McpError::resource_not_found(
                error,
                Some(json!({ "uri": uri })),
            )),
        }
    }
}

fn weather_template() -> Result<ResourceTemplate, McpError> {
    serde_json::from_value(json!({
        "uriTemplate": "weather://{city}",
        "name": "city-weather",
        "description": "Current weather summary for a city",
        "mimeType": "text/plain"
    }))
    .map_err(|e| McpError::internal_error(e.to_string(), None))
}

/// Extracts and percent-decodes `city` from `weather://{city}`.
fn city_from_uri(uri: &str) -> Option<Cow<'_, str>> {
    let raw = uri.strip_prefix(RESOURCE_SCHEME)?.trim_end_matches('/');
    let city = percent_decode_str(raw).decode_utf8().ok()?;
    (!city.trim().is_empty()).then_some(city)
}

fn analysis_prompt(city: &str) -> String {
    format!(
        "Analyze the current weather conditions in {city} and provide \
         recommendations for outdoor activities."
    )
}

fn error_chain<E>(err: E) -> String
where
    E: std::error::Error + Send + Sync + 'static,
{
    format!("{:#}", anyhow::Error::new(err))
}

fn tool_failure<E>(err: E) -> CallToolResult
where
    E: std::error::Error + Send + Sync + 'static,
{
    CallToolResult::error(vec![Content::text(error_chain(err))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Arc;
    use weather_core::{FetchError, ForecastConfig, RawWeatherPayload, WeatherFetcher};

    /// Answers every request with the same payload.
    #[derive(Debug)]
    struct StaticFetcher(Option<Value>);

    #[async_trait]
    impl WeatherFetcher for StaticFetcher {
        async fn fetch(&self, _city: &str) -> Result<RawWeatherPayload, FetchError> {
            Ok(match &self.0 {
                Some(body) => RawWeatherPayload::Provider(body.clone()),
                None => RawWeatherPayload::rejected(),
            })
        }
    }

    fn server(body: Option<Value>) -> WeatherServer {
        let service = WeatherService::new(Arc::new(StaticFetcher(body)), ForecastConfig::default());
        WeatherServer::new(service)
    }

    fn paris() -> Value {
        json!({
            "name": "Paris",
            "main": {"temp": 18.5, "humidity": 60},
            "weather": [{"description": "clear sky"}],
            "wind": {"speed": 3.1}
        })
    }

    /// Returns `(is_error, first text content)`.
    fn unpack(result: CallToolResult) -> (bool, String) {
        let value = serde_json::to_value(result).unwrap();
        let is_error = value["isError"].as_bool().unwrap_or(false);
        let text = value["content"][0]["text"].as_str().unwrap().to_string();
        (is_error, text)
    }

    #[tokio::test]
    async fn get_weather_tool_returns_record_json() {
        let result = server(Some(paris()))
            .get_weather(Parameters(CityRequest {
                city: "paris".into(),
            }))
            .await
            .unwrap();

        let (is_error, text) = unpack(result);
        assert!(!is_error);
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({
                "city": "Paris",
                "temperature": 18.5,
                "condition": "clear sky",
                "humidity": 60,
                "wind_speed": 3.1
            })
        );
    }

    #[tokio::test]
    async fn get_weather_tool_passes_error_record_through() {
        let result = server(None)
            .get_weather(Parameters(CityRequest {
                city: "Atlantis".into(),
            }))
            .await
            .unwrap();

        let (is_error, text) = unpack(result);
        assert!(!is_error);
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"error": "Unable to fetch weather data"})
        );
    }

    #[tokio::test]
    async fn get_forecast_tool_reports_records_and_failures() {
        let result = server(Some(paris()))
            .get_forecast(Parameters(ForecastRequest {
                city: "Paris".into(),
                days: Some(2),
            }))
            .await
            .unwrap();

        let (_, text) = unpack(result);
        let report: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["records"].as_array().unwrap().len(), 2);
        assert_eq!(report["failed_days"], 0);
    }

    #[tokio::test]
    async fn get_forecast_tool_flags_invalid_days() {
        let result = server(Some(paris()))
            .get_forecast(Parameters(ForecastRequest {
                city: "Paris".into(),
                days: Some(0),
            }))
            .await
            .unwrap();

        let (is_error, text) = unpack(result);
        assert!(is_error);
        assert!(text.contains("between 1 and 16"));
    }

    #[test]
    fn forecast_request_days_defaults_to_none() {
        let req: ForecastRequest = serde_json::from_value(json!({"city": "Oslo"})).unwrap();
        assert_eq!(req.days, None);
    }

    #[test]
    fn city_is_extracted_from_resource_uri() {
        assert_eq!(city_from_uri("weather://London").as_deref(), Some("London"));
        assert_eq!(city_from_uri("weather://London/").as_deref(), Some("London"));
        assert_eq!(city_from_uri("weather://").as_deref(), None);
        assert_eq!(city_from_uri("file:///etc/passwd").as_deref(), None);
    }

    #[test]
    fn resource_uri_city_is_percent_decoded() {
        assert_eq!(
            city_from_uri("weather://New%20York").as_deref(),
            Some("New York")
        );
        assert_eq!(
            city_from_uri("weather://S%C3%A3o%20Paulo").as_deref(),
            Some("São Paulo")
        );
        assert_eq!(city_from_uri("weather://%20").as_deref(), None);
        assert_eq!(city_from_uri("weather://%FF").as_deref(), None);
    }

    /// Echoes the requested city back as the provider's location name.
    #[derive(Debug)]
    struct EchoFetcher;

    #[async_trait]
    impl WeatherFetcher for EchoFetcher {
        async fn fetch(&self, city: &str) -> Result<RawWeatherPayload, FetchError> {
            Ok(RawWeatherPayload::Provider(json!({
                "name": city,
                "main": {"temp": 21.0, "humidity": 40},
                "weather": [{"description": "few clouds"}],
                "wind": {"speed": 4.2}
            })))
        }
    }

    fn resource_text(result: ReadResourceResult) -> String {
        let value = serde_json::to_value(result).unwrap();
        value["contents"][0]["text"].as_str().unwrap().to_string()
    }

    fn error_code(err: &McpError) -> i64 {
        serde_json::to_value(err).unwrap()["code"].as_i64().unwrap()
    }

    const RESOURCE_NOT_FOUND: i64 = -32002;

    #[tokio::test]
    async fn weather_resource_returns_summary_line() {
        let result = server(Some(paris()))
            .read_weather_resource("weather://Paris".into())
            .await
            .unwrap();

        assert_eq!(
            resource_text(result),
            "Current weather in Paris: clear sky, 18.5°C, Humidity: 60%, Wind: 3.1 m/s"
        );
    }

    #[tokio::test]
    async fn weather_resource_sends_decoded_city() {
        let service = WeatherService::new(Arc::new(EchoFetcher), ForecastConfig::default());

        let result = WeatherServer::new(service)
            .read_weather_resource("weather://New%20York".into())
            .await
            .unwrap();

        assert!(resource_text(result).starts_with("Current weather in New York: few clouds"));
    }

    #[tokio::test]
    async fn weather_resource_maps_rejection_to_not_found() {
        let err = server(None)
            .read_weather_resource("weather://Atlantis".into())
            .await
            .unwrap_err();

        assert_eq!(error_code(&err), RESOURCE_NOT_FOUND);
        assert_eq!(err.message, "Unable to fetch weather data");
    }

    #[tokio::test]
    async fn unknown_resource_scheme_is_not_found() {
        let err = server(Some(paris()))
            .read_weather_resource("file:///etc/passwd".into())
            .await
            .unwrap_err();

        assert_eq!(error_code(&err), RESOURCE_NOT_FOUND);
    }

    #[test]
    fn resource_template_advertises_city_uri() {
        let value = serde_json::to_value(weather_template().unwrap()).unwrap();

        assert_eq!(value["uriTemplate"], "weather://{city}");
        assert_eq!(value["mimeType"], "text/plain");
    }

    #[test]
    fn analysis_prompt_names_city() {
        assert_eq!(
            analysis_prompt("Lisbon"),
            "Analyze the current weather conditions in Lisbon and provide \
             recommendations for outdoor activities."
        );
    }

    #[test]
    fn server_info_advertises_all_capabilities() {
        let info = server(None).get_info();

        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
    }
}
