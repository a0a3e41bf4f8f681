//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The current-weather HTTP client and its typed errors
//! - Shared domain models (readings, conditions, units)
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod source;

pub use client::{ClientConfig, WeatherClient};
pub use config::Config;
pub use error::WeatherError;
pub use model::{Condition, Units, WeatherReading};
pub use source::{WeatherSource, source_from_config};
