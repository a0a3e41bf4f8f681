use crate::{
    Config, WeatherClient,
    error::Result,
    model::{Units, WeatherReading},
};
use async_trait::async_trait;
use std::fmt::Debug;

/// Anything that can answer "what is the weather in this city right now".
///
/// Consumers hold a `dyn WeatherSource` so lookups can be swapped for a
/// stub in tests.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn current_weather(&self, city: &str, units: Units) -> Result<WeatherReading>;
}

/// Construct the HTTP-backed source from the loaded configuration.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let client_config = config.client_config()?;
    let client = WeatherClient::new(client_config)?;

    Ok(Box::new(client))
}
