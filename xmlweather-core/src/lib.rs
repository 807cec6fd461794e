//! Core library for the `xmlweather` CLI.
//!
//! This crate defines:
//! - The document loader (URL construction, one blocking GET, XML parsing)
//! - Read-only extraction of current conditions and forecasts
//! - Shared domain models (condition sets, forecast tables, units)
//!
//! It is used by `xmlweather-cli`, but can also be reused by other binaries or services.
//! Nothing here prints; diagnostics go through `tracing`.

pub mod document;
pub mod error;
pub mod loader;
pub mod model;
pub mod query;

pub use document::WeatherDocument;
pub use error::{Result, WeatherError};
pub use loader::{HttpFetch, Loader, LoaderConfig, ReqwestFetcher};
pub use model::{ConditionSet, ForecastDay, ForecastTable, Units};
pub use query::WeatherQuery;
