use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

const ICON_URL_PREFIX: &str = "https://openweathermap.org/img/wn/";

/// Unit system the provider converts temperatures into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            "standard" => Ok(Units::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial, standard."
            )),
        }
    }
}

/// One qualitative descriptor of the weather, e.g. "light rain".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon_id: String,
}

impl Condition {
    /// Icon image on the provider's CDN.
    pub fn icon_url(&self) -> String {
        format!("{ICON_URL_PREFIX}{}@2x.png", self.icon_id)
    }
}

/// A point-in-time observation for a named location.
///
/// Only the client builds these, and it guarantees `conditions` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub location_name: String,
    /// Value as returned by the provider, expressed in `units`.
    pub temperature: f64,
    pub units: Units,
    pub conditions: Vec<Condition>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherReading {
    pub fn temperature_celsius(&self) -> f64 {
        match self.units {
            Units::Metric => self.temperature,
            Units::Imperial => (self.temperature - 32.0) * 5.0 / 9.0,
            Units::Standard => self.temperature - 273.15,
        }
    }

    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}
