//! Station readings and the city filter over them.

use std::fmt;

use city_common::CityFilter;
use serde_json::{Map, Value};

use crate::config::LabelConfig;

/// One observation as returned by the portal, keyed by labeled field names.
pub type Station = Map<String, Value>;

/// Keeps the readings of one city.
///
/// Stateless: applying it twice to the same input gives the same output.
#[derive(Debug, Clone)]
pub struct StationFilter {
    city: CityFilter,
}

impl StationFilter {
    pub fn new(city: CityFilter) -> Self {
        Self { city }
    }

    pub fn target(&self) -> &str {
        &self.city.target
    }

    /// Matching readings in input order, duplicates included.
    pub fn apply(&self, stations: Vec<Station>) -> Vec<Station> {
        self.city.retain_maps(stations)
    }
}

/// Human-readable one-liner for a reading.
pub struct StationSummary<'a> {
    station: &'a Station,
    labels: &'a LabelConfig,
}

impl<'a> StationSummary<'a> {
    pub fn new(station: &'a Station, labels: &'a LabelConfig) -> Self {
        Self { station, labels }
    }

    fn field(&self, label: &str) -> String {
        match self.station.get(label) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => "-".to_string(),
            Some(other) => other.to_string(),
        }
    }
}

impl fmt::Display for StationSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}°C, 雨量: {}mm",
            self.field(&self.labels.name),
            self.field(&self.labels.id),
            self.field(&self.labels.temperature),
            self.field(&self.labels.rainfall),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{cities, city_station, labels, mixed_stations, station};

    fn taoyuan() -> StationFilter {
        StationFilter::new(CityFilter::new(labels::CITY, cities::TAOYUAN))
    }

    #[test]
    fn test_keeps_city_in_order() {
        let input = vec![
            city_station("桃園市", "A"),
            city_station("台北市", "B"),
            city_station("桃園市", "C"),
        ];
        let expected = vec![city_station("桃園市", "A"), city_station("桃園市", "C")];
        assert_eq!(taoyuan().apply(input), expected);
    }

    #[test]
    fn test_keeps_duplicates() {
        let kept = taoyuan().apply(mixed_stations());
        let ids: Vec<&str> = kept.iter().map(|s| s[labels::ID].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["C0C480", "C0C490", "C0C460", "C0C480"]);
    }

    #[test]
    fn test_idempotent() {
        let filter = taoyuan();
        let once = filter.apply(mixed_stations());
        let twice = filter.apply(once.clone());
        assert_eq!(once, twice);
        assert_eq!(filter.apply(mixed_stations()), once);
    }

    #[test]
    fn test_result_is_exact_subsequence() {
        let input = mixed_stations();
        let kept = taoyuan().apply(input.clone());

        let mut rest = input.iter();
        for station in &kept {
            assert!(rest.any(|s| s == station), "output is not a subsequence of input");
        }
        let expected = input
            .iter()
            .filter(|s| s.get(labels::CITY) == Some(&Value::from(cities::TAOYUAN)))
            .count();
        assert_eq!(kept.len(), expected);
    }

    #[test]
    fn test_variant_spelling_does_not_match() {
        let filter = StationFilter::new(CityFilter::new(labels::CITY, cities::TAIPEI));
        let kept = filter.apply(mixed_stations());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0][labels::NAME], "臺北");
    }

    #[test]
    fn test_summary_line() {
        let reading = station("C0C480", "大溪", cities::TAOYUAN, 18.2, 0.5);
        let labels = LabelConfig::default();
        assert_eq!(
            StationSummary::new(&reading, &labels).to_string(),
            "大溪 (C0C480): 18.2°C, 雨量: 0.5mm"
        );
    }

    #[test]
    fn test_summary_missing_fields() {
        let reading = city_station(cities::TAOYUAN, "A");
        let labels = LabelConfig::default();
        assert_eq!(
            StationSummary::new(&reading, &labels).to_string(),
            "- (A): -°C, 雨量: -mm"
        );
    }
}
