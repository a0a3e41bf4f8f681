use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{Result, WeatherError},
    model::{Condition, Units, WeatherReading},
    source::WeatherSource,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings fixed for the lifetime of a [`WeatherClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub units: Units,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            units: Units::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One-shot current-weather lookups against the `/weather` endpoint.
///
/// Cloning is cheap and clones share the underlying connection pool.
/// Dropping the future returned by a fetch aborts the request.
#[derive(Clone)]
pub struct WeatherClient {
    endpoint: String,
    api_key: String,
    units: Units,
    timeout: Duration,
    http: Client,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("endpoint", &self.endpoint)
            .field("units", &self.units)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(WeatherError::ClientBuild)?;

        let endpoint = format!("{}/weather", config.base_url.trim_end_matches('/'));

        Ok(Self {
            endpoint,
            api_key: config.api_key,
            units: config.units,
            timeout: config.timeout,
            http,
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch_weather(&self, city: &str) -> Result<WeatherReading> {
        self.fetch_weather_in(city, self.units).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_weather_in(&self, city: &str, units: Units) -> Result<WeatherReading> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }

        debug!(endpoint = %self.endpoint, "Sending current weather request");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", units.as_str())])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();

        if status == StatusCode::NOT_FOUND {
            warn!("Weather service does not know this city");
            return Err(WeatherError::NotFound { city: city.to_string() });
        }

        let body = res.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(%status, "Weather request failed");
            return Err(WeatherError::Http { status, body: truncate_body(&body) });
        }

        let reading = parse_reading(&body, units)?;
        info!(location = %reading.location_name, temperature = reading.temperature, "Weather fetched");

        Ok(reading)
    }

    fn transport_error(&self, err: reqwest::Error) -> WeatherError {
        if err.is_timeout() {
            warn!(timeout = ?self.timeout, "Weather request timed out");
            WeatherError::Timeout(self.timeout)
        } else {
            warn!(error = %err, "Weather service unreachable");
            WeatherError::NetworkUnavailable(err)
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherClient {
    async fn current_weather(&self, city: &str, units: Units) -> Result<WeatherReading> {
        self.fetch_weather_in(city, units).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
}

fn parse_reading(body: &str, units: Units) -> Result<WeatherReading> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(e.to_string()))?;

    if parsed.weather.is_empty() {
        return Err(WeatherError::MalformedResponse(
            "response contained no weather conditions".to_string(),
        ));
    }

    let conditions = parsed
        .weather
        .into_iter()
        .map(|w| Condition { description: w.description, icon_id: w.icon })
        .collect();

    Ok(WeatherReading {
        location_name: parsed.name,
        temperature: parsed.main.temp,
        units,
        conditions,
        observed_at: parsed.dt.and_then(unix_to_utc),
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
