use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use crate::models::{CurrentWeather, ForecastDay, WeatherSnapshot};

/// Errors that can occur when fetching a forecast
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Weather API client (weatherapi.com-compatible forecast endpoint)
///
/// Scoring only consumes the current conditions; the multi-day forecast is
/// passed through to API consumers. Callers are expected to degrade fetch
/// failures to the empty snapshot rather than aborting.
pub struct WeatherClient {
    base_url: String,
    api_key: String,
    forecast_days: u8,
    client: Client,
}

impl WeatherClient {
    pub fn new(base_url: String, api_key: String, forecast_days: u8) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            forecast_days,
            client,
        }
    }

    /// Fetch the forecast for a course location (e.g. "Monterey, CA")
    pub async fn fetch(&self, location: &str) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/forecast.json", self.base_url.trim_end_matches('/'));

        tracing::debug!("Fetching weather for: {}", location);

        let days = self.forecast_days.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::ApiError(format!(
                "Failed to fetch forecast: {}",
                response.status()
            )));
        }

        let payload: wire::ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(format!("Failed to parse forecast: {}", e)))?;

        Ok(payload.into())
    }
}

/// Wire format of the weather API
mod wire {
    use serde::Deserialize;

    use super::{CurrentWeather, ForecastDay, WeatherSnapshot};

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<Current>,
        pub forecast: Option<Forecast>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Current {
        #[serde(default)]
        pub wind_mph: f64,
        #[serde(default)]
        pub precip_mm: f64,
        pub condition: Option<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub text: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct Forecast {
        #[serde(default)]
        pub forecastday: Vec<WireForecastDay>,
    }

    #[derive(Debug, Deserialize)]
    pub struct WireForecastDay {
        pub date: String,
        pub day: Option<Day>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Day {
        pub maxtemp_f: Option<f64>,
        pub mintemp_f: Option<f64>,
        pub daily_chance_of_rain: Option<f64>,
        pub condition: Option<Condition>,
    }

    impl From<ForecastResponse> for WeatherSnapshot {
        fn from(payload: ForecastResponse) -> Self {
            let current = payload.current.map(|c| CurrentWeather {
                wind_mph: c.wind_mph,
                precip_mm: c.precip_mm,
                condition: c
                    .condition
                    .map_or_else(|| "Unknown".to_string(), |cond| cond.text),
            });

            let forecast = payload
                .forecast
                .map(|f| f.forecastday)
                .unwrap_or_default()
                .into_iter()
                .map(|entry| {
                    let day = entry.day;
                    ForecastDay {
                        date: entry.date,
                        max_temp_f: day.as_ref().and_then(|d| d.maxtemp_f),
                        min_temp_f: day.as_ref().and_then(|d| d.mintemp_f),
                        chance_of_rain: day.as_ref().and_then(|d| d.daily_chance_of_rain),
                        condition: day.and_then(|d| d.condition.map(|c| c.text)),
                    }
                })
                .collect();

            WeatherSnapshot { current, forecast }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_parses_forecast() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/forecast.json")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "Monterey, CA".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "current": {
                        "wind_mph": 18.2,
                        "precip_mm": 1.4,
                        "condition": {"text": "Light rain"}
                    },
                    "forecast": {
                        "forecastday": [
                            {
                                "date": "2026-08-06",
                                "day": {
                                    "maxtemp_f": 71.0,
                                    "mintemp_f": 55.0,
                                    "daily_chance_of_rain": 80.0,
                                    "condition": {"text": "Rain"}
                                }
                            }
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let client = WeatherClient::new(server.url(), "test_key".to_string(), 7);
        let snapshot = client.fetch("Monterey, CA").await.unwrap();

        mock.assert_async().await;
        assert_eq!(snapshot.wind_mph(), 18.2);
        assert_eq!(snapshot.precip_mm(), 1.4);
        assert_eq!(snapshot.condition_text(), "Light rain");
        assert_eq!(snapshot.forecast.len(), 1);
        assert_eq!(snapshot.forecast[0].date, "2026-08-06");
    }

    #[tokio::test]
    async fn test_fetch_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forecast.json")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let client = WeatherClient::new(server.url(), "test_key".to_string(), 7);
        let result = client.fetch("Austin, TX").await;

        assert!(matches!(result, Err(WeatherError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/forecast.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = WeatherClient::new(server.url(), "test_key".to_string(), 7);
        let result = client.fetch("Austin, TX").await;

        assert!(matches!(result, Err(WeatherError::InvalidResponse(_))));
    }
}
