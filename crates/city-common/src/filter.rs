//! Exact-match city predicate used by both pipelines.
//!
//! A record matches when its `field` property is a JSON string equal to
//! `target`, byte for byte. There is no trimming, case folding or Unicode
//! normalization, so `台北市` and `臺北市` are different cities.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// Name of the property to compare and the city it must equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityFilter {
    pub field: String,
    pub target: String,
}

impl CityFilter {
    pub fn new(field: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            target: target.into(),
        }
    }

    /// Check a single property map.
    ///
    /// A missing key or a non-string value is a non-match, never an error.
    pub fn matches(&self, properties: &Map<String, Value>) -> bool {
        match properties.get(&self.field) {
            Some(Value::String(value)) => value == &self.target,
            Some(other) => {
                debug!(field = %self.field, value = %other, "Non-string city value, skipping");
                false
            }
            None => {
                debug!(field = %self.field, "Record has no city property, skipping");
                false
            }
        }
    }

    /// Keep the matching items in their original order.
    ///
    /// `properties` projects each item onto the map the predicate inspects.
    pub fn select<T, I, F>(&self, items: I, properties: F) -> Vec<T>
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<&Map<String, Value>>,
    {
        items
            .into_iter()
            .filter(|item| properties(item).is_some_and(|props| self.matches(props)))
            .collect()
    }

    /// Keep the matching maps in their original order.
    pub fn retain_maps(&self, maps: Vec<Map<String, Value>>) -> Vec<Map<String, Value>> {
        self.select(maps, |map| Some(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_exact_match() {
        let filter = CityFilter::new("COUNTYNAME", "桃園市");
        assert!(filter.matches(&props(json!({"COUNTYNAME": "桃園市"}))));
        assert!(!filter.matches(&props(json!({"COUNTYNAME": "桃園市 "}))));
        assert!(!filter.matches(&props(json!({"COUNTYNAME": "桃園縣"}))));
    }

    #[test]
    fn test_case_sensitive() {
        let filter = CityFilter::new("city", "Taoyuan");
        assert!(!filter.matches(&props(json!({"city": "taoyuan"}))));
    }

    #[test]
    fn test_missing_key_is_no_match() {
        let filter = CityFilter::new("縣市", "桃園市");
        assert!(!filter.matches(&props(json!({"站名": "大溪"}))));
    }

    #[test]
    fn test_non_string_value_is_no_match() {
        let filter = CityFilter::new("code", "68");
        assert!(!filter.matches(&props(json!({"code": 68}))));
        assert!(!filter.matches(&props(json!({"code": null}))));
    }

    #[test]
    fn test_select_skips_items_without_properties() {
        let filter = CityFilter::new("city", "A");
        let items = vec![
            (1, Some(props(json!({"city": "A"})))),
            (2, None),
            (3, Some(props(json!({"city": "A"})))),
        ];
        let kept = filter.select(items, |(_, p)| p.as_ref());
        let ids: Vec<i32> = kept.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
