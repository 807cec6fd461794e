use serde::{Deserialize, Serialize};
use std::collections::{HashMap, hash_map};

use crate::error::WeatherError;

/// Field that labels every forecast entry.
pub const DAY_OF_WEEK: &str = "day_of_week";

/// Temperature units a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Units {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Celsius => "c",
            Units::Fahrenheit => "f",
        }
    }

    /// Name of the current-conditions field carrying this unit's temperature.
    pub fn field(&self) -> &'static str {
        match self {
            Units::Celsius => "temp_c",
            Units::Fahrenheit => "temp_f",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Units::Celsius => "°C",
            Units::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Celsius, Units::Fahrenheit]
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "c" | "celsius" => Ok(Units::Celsius),
            "f" | "fahrenheit" => Ok(Units::Fahrenheit),
            _ => Err(WeatherError::InvalidArgument(format!(
                "Units must be c or f, not '{value}'"
            ))),
        }
    }
}

impl TryFrom<String> for Units {
    type Error = WeatherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Units::try_from(value.as_str())
    }
}

impl std::str::FromStr for Units {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::try_from(s)
    }
}

/// Flat mapping of feed field names to their `data` values.
///
/// Built fresh by every extractor call, so mutating one never affects the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionSet(HashMap<String, String>);

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(field.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Field names in sorted order, for stable display.
    pub fn sorted_fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.0.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }

    /// Copy of this set with the given fields left out.
    pub fn without(&self, ignore: &[&str]) -> ConditionSet {
        self.0
            .iter()
            .filter(|(field, _)| !ignore.contains(&field.as_str()))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}

impl FromIterator<(String, String)> for ConditionSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One day of a [`ForecastTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub fields: ConditionSet,
}

/// Day label to day fields, kept in the order the feed lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastTable(Vec<ForecastDay>);

impl ForecastTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a day at the end. A label already present keeps its position and
    /// takes the new fields.
    pub fn insert(&mut self, day: impl Into<String>, fields: ConditionSet) {
        let day = day.into();
        match self.0.iter_mut().find(|entry| entry.day == day) {
            Some(entry) => entry.fields = fields,
            None => self.0.push(ForecastDay { day, fields }),
        }
    }

    pub fn get(&self, day: &str) -> Option<&ConditionSet> {
        self.0.iter().find(|entry| entry.day == day).map(|entry| &entry.fields)
    }

    pub fn days(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.day.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastDay> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of this table with the given fields dropped from every day.
    /// `day_of_week` is always kept.
    pub fn without(&self, ignore: &[&str]) -> ForecastTable {
        let ignore: Vec<&str> = ignore.iter().copied().filter(|f| *f != DAY_OF_WEEK).collect();

        ForecastTable(
            self.0
                .iter()
                .map(|entry| ForecastDay {
                    day: entry.day.clone(),
                    fields: entry.fields.without(&ignore),
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ForecastTable {
    type Item = &'a ForecastDay;
    type IntoIter = std::slice::Iter<'a, ForecastDay>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(&str, &str)]) -> ConditionSet {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn units_as_str_roundtrip() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
    }

    #[test]
    fn units_accept_long_names_case_insensitively() {
        assert_eq!(Units::try_from("Celsius").unwrap(), Units::Celsius);
        assert_eq!("FAHRENHEIT".parse::<Units>().unwrap(), Units::Fahrenheit);
    }

    #[test]
    fn unknown_units_are_invalid_argument() {
        let err = Units::try_from("k").unwrap_err();
        assert!(matches!(err, WeatherError::InvalidArgument(_)));
        assert!(err.to_string().contains("Units must be c or f"));
    }

    #[test]
    fn units_deserialize_from_short_and_long_names() {
        let parsed: Vec<Units> = serde_json::from_str(r#"["f", "C", "celsius", "Fahrenheit"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Units::Fahrenheit, Units::Celsius, Units::Celsius, Units::Fahrenheit]
        );

        assert!(serde_json::from_str::<Units>(r#""kelvin""#).is_err());
        assert_eq!(serde_json::to_string(&Units::Fahrenheit).unwrap(), r#""fahrenheit""#);
    }

    #[test]
    fn units_pick_matching_field_and_symbol() {
        assert_eq!(Units::Celsius.field(), "temp_c");
        assert_eq!(Units::Fahrenheit.field(), "temp_f");
        assert_eq!(Units::Fahrenheit.symbol(), "°F");
    }

    #[test]
    fn without_leaves_original_untouched() {
        let conditions = set(&[("temp_c", "5"), ("icon", "/x.gif"), ("condition", "Cloudy")]);

        let filtered = conditions.without(&["icon"]);

        assert_eq!(filtered, set(&[("temp_c", "5"), ("condition", "Cloudy")]));
        assert_eq!(conditions.len(), 3);
        assert_eq!(conditions.get("icon"), Some("/x.gif"));
    }

    #[test]
    fn forecast_table_keeps_insertion_order() {
        let mut table = ForecastTable::new();
        table.insert("Wed", set(&[(DAY_OF_WEEK, "Wed")]));
        table.insert("Mon", set(&[(DAY_OF_WEEK, "Mon")]));
        table.insert("Tue", set(&[(DAY_OF_WEEK, "Tue")]));

        assert_eq!(table.days().collect::<Vec<_>>(), vec!["Wed", "Mon", "Tue"]);
    }

    #[test]
    fn repeated_day_replaces_fields_in_place() {
        let mut table = ForecastTable::new();
        table.insert("Mon", set(&[(DAY_OF_WEEK, "Mon"), ("low", "1")]));
        table.insert("Tue", set(&[(DAY_OF_WEEK, "Tue")]));
        table.insert("Mon", set(&[(DAY_OF_WEEK, "Mon"), ("low", "2")]));

        assert_eq!(table.len(), 2);
        assert_eq!(table.days().collect::<Vec<_>>(), vec!["Mon", "Tue"]);
        assert_eq!(table.get("Mon").and_then(|d| d.get("low")), Some("2"));
    }

    #[test]
    fn table_without_never_drops_day_of_week() {
        let mut table = ForecastTable::new();
        table.insert("Mon", set(&[(DAY_OF_WEEK, "Mon"), ("icon", "/sun.gif"), ("high", "9")]));

        let filtered = table.without(&["icon", DAY_OF_WEEK]);
        let mon = filtered.get("Mon").expect("Mon must remain");

        assert_eq!(mon.get(DAY_OF_WEEK), Some("Mon"));
        assert!(!mon.contains("icon"));
        assert_eq!(mon.get("high"), Some("9"));
    }

    #[test]
    fn forecast_table_serializes_as_ordered_list() {
        let mut table = ForecastTable::new();
        table.insert("Tue", set(&[(DAY_OF_WEEK, "Tue")]));
        table.insert("Mon", set(&[(DAY_OF_WEEK, "Mon")]));

        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json[0]["day"], "Tue");
        assert_eq!(json[1]["day"], "Mon");
        assert_eq!(json[1]["fields"][DAY_OF_WEEK], "Mon");
    }
}
