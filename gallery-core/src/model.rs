use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SearchTermError;

/// A trimmed, non-empty city query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn parse(raw: &str) -> Result<Self, SearchTermError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchTermError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One hit returned by the image search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHit {
    pub id: u64,
    pub preview_url: String,
    pub tags: String,
    pub width: u32,
    pub height: u32,
    pub page_url: Option<String>,
    pub author: Option<String>,
}

/// Current conditions for a city, as reported by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub description: String,
    pub condition: String,
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed_kmh: u32,
}

impl WeatherSnapshot {
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

/// Converts a provider wind speed in m/s to whole km/h.
pub fn mps_to_kmh(speed_mps: f64) -> u32 {
    (speed_mps * 3.6).round().max(0.0) as u32
}

/// A single fetch issued for a (term, page) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Monotonic id; only the latest issued id is applied on completion.
    pub id: u64,
    pub term: SearchTerm,
    pub page: u32,
}

impl FetchRequest {
    /// Weather is only looked up for the first page.
    pub fn includes_weather(&self) -> bool {
        self.page == 1
    }
}

/// What happened to the weather half of a fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherUpdate {
    /// Not requested (page other than 1); keep whatever is already held.
    Skipped,
    Found(WeatherSnapshot),
    /// Provider answered but not with a success code (unknown city, ...).
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedData {
    pub images: Vec<ImageHit>,
    pub weather: WeatherUpdate,
    pub fetched_at: DateTime<Utc>,
}

/// Joint result of the image and weather requests.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(FetchedData),
    /// Either request failed. `reason` is for logs only; users get one generic message.
    Failed { reason: String },
}
