use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{ArgGroup, Parser};
use serde_json::json;
use tracing::debug;
use xmlweather_core::{
    ForecastTable, Loader, Units, WeatherQuery, model::DAY_OF_WEEK,
};

use crate::config::Config;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "xmlweather", version, about = "Current weather and forecast for a city")]
#[command(group(ArgGroup::new("forecast_output").args(["forecast", "json"]).multiple(true)))]
pub struct Cli {
    /// City name, e.g. "New York".
    pub city: String,

    /// Feed language code; defaults to the config file value or "en".
    #[arg(long = "lang", value_name = "LANG")]
    pub language: Option<String>,

    /// Temperature units: c or f.
    #[arg(long, value_name = "UNITS")]
    pub units: Option<Units>,

    /// Also print the forecast for the following days.
    #[arg(long)]
    pub forecast: bool,

    /// Include today in the forecast (with --forecast or --json).
    #[arg(long, requires = "forecast_output")]
    pub today: bool,

    /// Forecast field to leave out of the output; may be repeated.
    #[arg(long, value_name = "FIELD")]
    pub ignore: Vec<String>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Feed endpoint URL.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Config file to read instead of the platform default.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print current conditions and forecast as JSON; the forecast is always included.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let mut loader_config = config.loader_config();
        if let Some(endpoint) = &self.endpoint {
            loader_config = loader_config.with_endpoint(endpoint.clone());
        }
        if let Some(secs) = self.timeout {
            loader_config = loader_config.with_timeout(Duration::from_secs(secs));
        }
        let units = self.units.unwrap_or_else(|| config.units());
        debug!(?loader_config, %units, "resolved settings");

        let loader = Loader::new(loader_config).context("Failed to set up HTTP client")?;
        let query = WeatherQuery::load(&loader, &self.city, self.language.as_deref())
            .with_context(|| format!("Failed to load weather for '{}'", self.city))?;

        let ignore: Vec<&str> = self.ignore.iter().map(String::as_str).collect();

        if self.json {
            let forecast = query.forecast(self.today)?.without(&ignore);
            let out = json!({
                "city": self.city,
                "units": units,
                "current": query.current_conditions()?,
                "forecast": forecast,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
            return Ok(());
        }

        let temperature = query
            .temperature(units)
            .with_context(|| format!("Feed has no temperature in {}", units.symbol()))?;
        let condition = query.condition_description()?;
        println!("{}", current_line(&temperature, units, &condition));

        if self.forecast {
            let forecast = query.forecast(self.today)?.without(&ignore);
            for line in forecast_lines(&forecast) {
                println!("{line}");
            }
        }

        Ok(())
    }
}

/// `"<temp>°C, <condition>"`.
pub fn current_line(temperature: &str, units: Units, condition: &str) -> String {
    format!("{temperature}{}, {condition}", units.symbol())
}

/// One line per day: the label, then the remaining fields sorted by name.
pub fn forecast_lines(forecast: &ForecastTable) -> Vec<String> {
    forecast
        .iter()
        .map(|entry| {
            let fields: Vec<String> = entry
                .fields
                .sorted_fields()
                .into_iter()
                .filter(|field| *field != DAY_OF_WEEK)
                .filter_map(|field| entry.fields.get(field).map(|value| format!("{field}={value}")))
                .collect();
            format!("{}: {}", entry.day, fields.join(", "))
        })
        .collect()
}
