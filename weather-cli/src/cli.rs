use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use tracing::debug;
use weather_core::{Config, Units, WeatherSource, source_from_config};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default units.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "London,GB".
        city: String,

        /// Unit system: metric, imperial or standard. Defaults to the configured units.
        #[arg(long)]
        units: Option<String>,

        /// Print the reading as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { city, units, json } => show(&city, units.as_deref(), json).await?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load_file()?;

    let prompt = if config.is_configured() {
        "API key (leave empty to keep the current one):"
    } else {
        "API key:"
    };

    let key = Password::new(prompt)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;

    match key.trim() {
        "" if !config.is_configured() => bail!("An API key is required"),
        "" => {}
        key => config.set_api_key(key.to_string()),
    }

    let current = config.units().unwrap_or_default();
    let cursor = Units::all().iter().position(|u| *u == current).unwrap_or(0);
    let units = Select::new("Default units:", Units::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()?;
    config.set_units(units);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(city: &str, units: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let units = resolve_units(units, &config)?;

    let source = source_from_config(&config)?;
    debug!(?source, "Resolved weather source");

    print!("{}", lookup(source.as_ref(), city, units, json).await?);

    Ok(())
}

/// A `--units` flag wins over the configured default.
fn resolve_units(flag: Option<&str>, config: &Config) -> anyhow::Result<Units> {
    match flag {
        Some(u) => Units::try_from(u),
        None => config.units(),
    }
}

async fn lookup(
    source: &dyn WeatherSource,
    city: &str,
    units: Units,
    json: bool,
) -> anyhow::Result<String> {
    let reading = source
        .current_weather(city, units)
        .await
        .context("Failed to retrieve weather. Please check the city name")?;

    if json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&reading)?))
    } else {
        Ok(output::render(&reading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use weather_core::{Condition, WeatherError, WeatherReading};

    #[derive(Debug)]
    struct FixedSource;

    #[async_trait]
    impl WeatherSource for FixedSource {
        async fn current_weather(
            &self,
            city: &str,
            units: Units,
        ) -> weather_core::error::Result<WeatherReading> {
            if city == "Atlantis" {
                return Err(WeatherError::NotFound { city: city.to_string() });
            }

            Ok(WeatherReading {
                location_name: city.to_string(),
                temperature: 15.2,
                units,
                conditions: vec![Condition {
                    description: "light rain".into(),
                    icon_id: "10d".into(),
                }],
                observed_at: None,
            })
        }
    }

    #[tokio::test]
    async fn failed_lookup_carries_generic_message_and_cause() {
        let err = lookup(&FixedSource, "Atlantis", Units::Metric, false).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to retrieve weather. Please check the city name");
        let cause = err.downcast_ref::<WeatherError>().expect("typed cause is kept");
        assert!(matches!(cause, WeatherError::NotFound { .. }));
    }

    #[tokio::test]
    async fn json_output_has_reading_shape() {
        let text = lookup(&FixedSource, "London", Units::Imperial, true).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["location_name"], "London");
        assert_eq!(value["temperature"], 15.2);
        assert_eq!(value["units"], "imperial");
        assert_eq!(value["conditions"][0]["description"], "light rain");
        assert_eq!(value["conditions"][0]["icon_id"], "10d");
        assert!(value["observed_at"].is_null());
    }

    #[tokio::test]
    async fn text_output_is_rendered_reading() {
        let text = lookup(&FixedSource, "London", Units::Metric, false).await.unwrap();

        assert!(text.starts_with("Weather in London\n"));
        assert!(text.contains("15.2°C"));
        assert!(text.contains("https://openweathermap.org/img/wn/10d@2x.png"));
    }

    #[test]
    fn units_flag_overrides_configured_units() {
        let mut config = Config::default();
        config.set_units(Units::Imperial);

        assert_eq!(resolve_units(Some("metric"), &config).unwrap(), Units::Metric);
        assert_eq!(resolve_units(None, &config).unwrap(), Units::Imperial);
        assert!(resolve_units(Some("furlongs"), &config).is_err());
    }
}
