use chrono::Local;
use std::fmt::Write;
use weather_core::WeatherReading;

/// Human-readable block for a single reading.
pub fn render(reading: &WeatherReading) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Weather in {}", reading.location_name);
    let _ = writeln!(out, "  {:.1}{}", reading.temperature, reading.units.symbol());

    if let Some(condition) = reading.primary_condition() {
        let _ = writeln!(out, "  {}", condition.description);
        let _ = writeln!(out, "  Icon: {}", condition.icon_url());
    }

    if let Some(at) = reading.observed_at {
        let local = at.with_timezone(&Local);
        let _ = writeln!(out, "  Observed: {}", local.format("%Y-%m-%d %H:%M"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use weather_core::{Condition, Units};

    fn london() -> WeatherReading {
        WeatherReading {
            location_name: "London".into(),
            temperature: 15.2,
            units: Units::Metric,
            conditions: vec![Condition {
                description: "light rain".into(),
                icon_id: "10d".into(),
            }],
            observed_at: None,
        }
    }

    #[test]
    fn renders_name_temperature_description_and_icon() {
        let text = render(&london());

        assert_eq!(
            text,
            "Weather in London\n  15.2°C\n  light rain\n  Icon: https://openweathermap.org/img/wn/10d@2x.png\n"
        );
    }

    #[test]
    fn renders_unit_symbol_and_observation_time() {
        let mut reading = london();
        reading.units = Units::Imperial;
        reading.temperature = 59.36;
        reading.observed_at = DateTime::<Utc>::from_timestamp(1_700_000_000, 0);

        let text = render(&reading);
        assert!(text.contains("59.4°F"));
        assert!(text.contains("Observed: 2023-11-1"));
    }
}
