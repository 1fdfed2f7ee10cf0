use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    model::{WeatherSnapshot, mps_to_kmh},
    provider::truncate_body,
};

use super::WeatherProvider;

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// `cod` value marking a successful lookup. It travels in the body, not the HTTP status.
const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self { api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    #[serde(default)]
    sys: OwSys,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl From<OwCurrentResponse> for WeatherSnapshot {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (condition, description, icon) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description, w.icon))
            .unwrap_or_default();

        WeatherSnapshot {
            location_name: parsed.name,
            country: parsed.sys.country,
            temperature_c: parsed.main.temp,
            description,
            condition,
            icon,
            humidity_pct: parsed.main.humidity,
            wind_speed_kmh: mps_to_kmh(parsed.wind.speed),
        }
    }
}

/// Decodes a current-weather body. Unknown cities come back as `{"cod": "404", ...}`.
fn parse_current(body: &str) -> Result<Option<WeatherSnapshot>> {
    let value: Value =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    if value.get("cod").and_then(Value::as_i64) != Some(SUCCESS_CODE) {
        tracing::debug!(cod = ?value.get("cod"), "openweather returned no conditions");
        return Ok(None);
    }

    let parsed: OwCurrentResponse = serde_json::from_value(value)
        .context("OpenWeather current JSON is missing expected fields")?;

    Ok(Some(parsed.into()))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<Option<WeatherSnapshot>> {
        let res = self
            .http
            .get(CURRENT_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", "fr"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        parse_current(&body).with_context(|| {
            format!(
                "OpenWeather current request answered with status {}: {}",
                status,
                truncate_body(&body),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASABLANCA: &str = r#"{
        "coord": {"lon": -7.6114, "lat": 33.5883},
        "weather": [{"id": 801, "main": "Clouds", "description": "peu nuageux", "icon": "02d"}],
        "main": {"temp": 21.56, "feels_like": 21.4, "humidity": 64},
        "wind": {"speed": 4.12, "deg": 320},
        "sys": {"country": "MA"},
        "name": "Casablanca",
        "cod": 200
    }"#;

    #[test]
    fn parses_successful_payload() {
        let snapshot = parse_current(CASABLANCA).expect("valid").expect("cod 200");

        assert_eq!(snapshot.location_name, "Casablanca");
        assert_eq!(snapshot.country, "MA");
        assert_eq!(snapshot.rounded_temperature(), 22);
        assert_eq!(snapshot.description, "peu nuageux");
        assert_eq!(snapshot.condition, "Clouds");
        assert_eq!(snapshot.humidity_pct, 64);
        assert_eq!(snapshot.wind_speed_kmh, 15);
        assert_eq!(snapshot.icon_url(), "https://openweathermap.org/img/wn/02d@2x.png");
    }

    #[test]
    fn unknown_city_is_soft() {
        let body = r#"{"cod": "404", "message": "city not found"}"#;
        assert_eq!(parse_current(body).expect("valid JSON"), None);
    }

    #[test]
    fn string_success_code_is_not_accepted() {
        let body = CASABLANCA.replace("\"cod\": 200", "\"cod\": \"200\"");
        assert_eq!(parse_current(&body).expect("valid JSON"), None);
    }

    #[test]
    fn non_json_is_an_error() {
        let err = parse_current("<html>Bad Gateway</html>").unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather current JSON"));
    }

    #[test]
    fn success_without_main_block_is_an_error() {
        let body = r#"{"cod": 200, "name": "Nowhere", "wind": {"speed": 1.0}}"#;
        assert!(parse_current(body).is_err());
    }

    #[test]
    fn missing_weather_entry_falls_back() {
        let body = r#"{"cod": 200, "name": "Rabat", "main": {"temp": 18.4, "humidity": 70},
                       "wind": {"speed": 0.0}}"#;
        let snapshot = parse_current(body).expect("valid").expect("cod 200");

        assert_eq!(snapshot.description, "");
        assert_eq!(snapshot.icon, "");
        assert_eq!(snapshot.country, "");
        assert_eq!(snapshot.wind_speed_kmh, 0);
    }
}
