//! Read-only extraction of current conditions and forecasts.
//!
//! Every query walks the held document again; nothing is cached between
//! calls, so results never depend on what was asked before.

use tracing::debug;
use xmltree::Element;

use crate::{
    document::{WeatherDocument, child_elements, data_of, fields_of, find_all_in, require_in},
    error::{Result, WeatherError},
    loader::{HttpFetch, Loader},
    model::{ConditionSet, DAY_OF_WEEK, ForecastTable, Units},
};

const WEATHER: &str = "weather";
const CURRENT_CONDITIONS: &str = "current_conditions";
const FORECAST_CONDITIONS: &str = "forecast_conditions";
const FORECAST_INFORMATION: &str = "forecast_information";
const CONDITION: &str = "condition";

/// One loaded feed and the queries that can be run against it.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    document: WeatherDocument,
}

impl WeatherQuery {
    /// Fetch and parse the feed for `city` through `loader`.
    pub fn load<F: HttpFetch>(loader: &Loader<F>, city: &str, language: Option<&str>) -> Result<Self> {
        Ok(Self::new(loader.load(city, language)?))
    }

    /// Query over an already fetched body.
    pub fn from_xml(xml: &str) -> Result<Self> {
        Ok(Self::new(WeatherDocument::parse(xml)?))
    }

    pub fn new(document: WeatherDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &WeatherDocument {
        &self.document
    }

    /// The `weather` element every query looks inside. An error page has
    /// none; that is a `NotFound`, unlike a feed that merely lacks a section.
    fn container(&self) -> Result<&Element> {
        self.document.require(WEATHER)
    }

    /// Every field of the `current_conditions` node, unfiltered.
    pub fn current_conditions(&self) -> Result<ConditionSet> {
        let node = require_in(self.container()?, CURRENT_CONDITIONS)?;
        fields_of(node)
    }

    /// Current temperature in `units`. A feed that omits that unit is a
    /// `NotFound`, never a default.
    pub fn temperature(&self, units: Units) -> Result<String> {
        current_field(&self.current_conditions()?, units.field())
    }

    pub fn condition_description(&self) -> Result<String> {
        current_field(&self.current_conditions()?, CONDITION)
    }

    /// Forecast days keyed by `day_of_week`, in feed order. The feed lists
    /// today first; it is dropped unless `include_today` is set.
    pub fn forecast(&self, include_today: bool) -> Result<ForecastTable> {
        let nodes = find_all_in(self.container()?, FORECAST_CONDITIONS);
        let skip = if include_today { 0 } else { 1 };
        debug!(nodes = nodes.len(), include_today, "extracting forecast");

        let mut table = ForecastTable::new();
        for node in nodes.into_iter().skip(skip) {
            let label = child_elements(node)
                .find(|child| child.name == DAY_OF_WEEK)
                .ok_or_else(|| {
                    WeatherError::NotFound(format!("{FORECAST_CONDITIONS}/{DAY_OF_WEEK}"))
                })
                .and_then(|child| data_of(node, child))?;

            table.insert(label, fields_of(node)?);
        }

        Ok(table)
    }

    /// The days after today.
    pub fn next_days(&self) -> Result<ForecastTable> {
        self.forecast(false)
    }

    /// Today and the days after it.
    pub fn all_days(&self) -> Result<ForecastTable> {
        self.forecast(true)
    }

    /// Fields of the `forecast_information` node (city, date, unit system...).
    pub fn forecast_information(&self) -> Result<ConditionSet> {
        let node = require_in(self.container()?, FORECAST_INFORMATION)?;
        fields_of(node)
    }
}

fn current_field(conditions: &ConditionSet, field: &str) -> Result<String> {
    conditions
        .get(field)
        .map(str::to_owned)
        .ok_or_else(|| WeatherError::NotFound(format!("{CURRENT_CONDITIONS}/{field}")))
}
