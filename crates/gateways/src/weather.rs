//! Weather Data Gateway — OpenWeatherMap current conditions by place name.
//!
//! One attempt per fetch, bounded timeout, no retries. An unknown place,
//! provider error, or timeout is a normal outcome reported as
//! `Fetch::Unavailable`.

use async_trait::async_trait;
use nimbus_core::error::Error;
use nimbus_core::gateway::WeatherGateway;
use nimbus_core::model::{Fetch, WeatherReading};
use tracing::{debug, warn};

/// Gateway to the OpenWeatherMap current-conditions API.
pub struct OpenWeatherGateway {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenWeatherGateway {
    /// Create a gateway with a bounded per-call timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        })
    }

    async fn fetch_inner(&self, place: &str) -> Result<WeatherReading, String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", place),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("provider returned status {status}"));
        }

        let body: openweather::CurrentConditions = response
            .json()
            .await
            .map_err(|e| format!("unparseable body: {e}"))?;

        Ok(body.into())
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn fetch(&self, place: &str) -> Fetch<WeatherReading> {
        let place = place.trim();
        if place.is_empty() {
            warn!("Weather fetch with empty place name");
            return Fetch::Unavailable;
        }

        match self.fetch_inner(place).await {
            Ok(reading) => {
                debug!(place, temp = reading.temperature, "Weather retrieved");
                Fetch::Ready(reading)
            }
            Err(reason) => {
                warn!(place, %reason, "Weather unavailable");
                Fetch::Unavailable
            }
        }
    }
}

/// OpenWeatherMap wire types and conversion.
mod openweather {
    use nimbus_core::model::WeatherReading;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentConditions {
        pub main: MainBlock,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainBlock {
        pub temp: f64,
        pub feels_like: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    impl From<CurrentConditions> for WeatherReading {
        fn from(cc: CurrentConditions) -> Self {
            let condition = cc
                .weather
                .into_iter()
                .next()
                .map(|c| c.description)
                .unwrap_or_else(|| "unknown".into());

            WeatherReading {
                temperature: cc.main.temp,
                feels_like: cc.main.feels_like,
                condition,
                humidity: cc.main.humidity.min(100),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> OpenWeatherGateway {
        OpenWeatherGateway::new(
            "https://api.openweathermap.org/data/2.5/weather",
            "test-key",
            std::time::Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn constructor_builds_a_timed_client() {
        // The client carries the requested timeout; a builder failure is an
        // error, never a silent fallback to an unbounded client.
        assert!(OpenWeatherGateway::new(
            "https://api.openweathermap.org/data/2.5/weather",
            "test-key",
            std::time::Duration::from_secs(10),
        )
        .is_ok());
    }

    #[tokio::test]
    async fn empty_place_is_unavailable_without_network() {
        // No provider call is made, so a dummy key and real URL are safe.
        let gw = gateway();
        assert_eq!(gw.fetch("").await, Fetch::Unavailable);
        assert_eq!(gw.fetch("   ").await, Fetch::Unavailable);
    }

    #[test]
    fn parse_current_conditions() {
        let data = r#"{
            "coord": {"lon": 2.3488, "lat": 48.8534},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 18.3, "feels_like": 17.9, "temp_min": 16.7, "temp_max": 19.4,
                     "pressure": 1012, "humidity": 72},
            "name": "Paris",
            "cod": 200
        }"#;
        let parsed: super::openweather::CurrentConditions = serde_json::from_str(data).unwrap();
        let reading: WeatherReading = parsed.into();

        assert!((reading.temperature - 18.3).abs() < f64::EPSILON);
        assert!((reading.feels_like - 17.9).abs() < f64::EPSILON);
        assert_eq!(reading.condition, "light rain");
        assert_eq!(reading.humidity, 72);
    }

    #[test]
    fn missing_conditions_array_defaults_to_unknown() {
        let data = r#"{"main": {"temp": 1.0, "feels_like": -2.0, "humidity": 80}}"#;
        let parsed: super::openweather::CurrentConditions = serde_json::from_str(data).unwrap();
        let reading: WeatherReading = parsed.into();
        assert_eq!(reading.condition, "unknown");
    }
}
