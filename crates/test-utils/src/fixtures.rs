//! Common test fixtures for the Taoyuan data tools.
//!
//! Field labels follow what the CWA QPEplus monitor returns and what the MOI
//! township attribute table contains.

use serde_json::{json, Map, Value};

/// City names used across tests.
pub mod cities {
    pub const TAOYUAN: &str = "桃園市";
    pub const TAIPEI: &str = "臺北市";
    /// Same city as `TAIPEI` with the variant character; must not match it
    pub const TAIPEI_VARIANT: &str = "台北市";
    pub const NEW_TAIPEI: &str = "新北市";
}

/// Labels of the station reading fields.
pub mod labels {
    pub const NAME: &str = "站名";
    pub const ID: &str = "站號";
    pub const TEMPERATURE: &str = "溫度(°C)";
    pub const RAINFALL: &str = "當日累積雨量(mm)";
    pub const CITY: &str = "縣市";
}

/// A station reading with the labeled fields the portal returns.
pub fn station(
    id: &str,
    name: &str,
    city: &str,
    temperature: f64,
    rainfall: f64,
) -> Map<String, Value> {
    object(json!({
        (labels::ID): id,
        (labels::NAME): name,
        (labels::TEMPERATURE): temperature,
        (labels::RAINFALL): rainfall,
        (labels::CITY): city,
    }))
}

/// Minimal `{city, id}` reading.
pub fn city_station(city: &str, id: &str) -> Map<String, Value> {
    object(json!({ (labels::CITY): city, (labels::ID): id }))
}

/// A mixed set of readings: four in Taoyuan interleaved with other cities.
pub fn mixed_stations() -> Vec<Map<String, Value>> {
    vec![
        station("C0C480", "大溪", cities::TAOYUAN, 18.2, 0.5),
        station("466920", "臺北", cities::TAIPEI, 19.1, 0.0),
        station("C0C490", "八德", cities::TAOYUAN, 18.6, 1.0),
        station("C0AD10", "八里", cities::NEW_TAIPEI, 17.9, 0.0),
        station("C0C460", "復興", cities::TAOYUAN, 12.4, 6.5),
        station("C0A9C0", "天母", cities::TAIPEI_VARIANT, 18.0, 0.0),
        station("C0C480", "大溪", cities::TAOYUAN, 18.2, 0.5),
    ]
}

/// Successful portal body wrapping `stations`.
pub fn portal_success(stations: &[Map<String, Value>]) -> Value {
    json!({ "status": "success", "data": stations })
}

/// Rejected portal body.
pub fn portal_failure(failed_code: &str) -> Value {
    json!({ "status": "error", "failed_code": failed_code })
}

/// Attribute row of the MOI township table.
pub fn town_properties(county: &str, town: &str, town_code: &str) -> Map<String, Value> {
    object(json!({
        "TOWNID": town_code,
        "TOWNCODE": town_code,
        "COUNTYNAME": county,
        "TOWNNAME": town,
        "TOWNENG": "",
        "COUNTYID": "H",
        "COUNTYCODE": "68000",
    }))
}

/// Unwrap a JSON object literal into its map.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_stations_has_duplicates() {
        let stations = mixed_stations();
        let taoyuan = stations
            .iter()
            .filter(|s| s[labels::CITY] == cities::TAOYUAN)
            .count();
        assert_eq!(taoyuan, 4);
    }

    #[test]
    fn test_station_keeps_field_order() {
        let reading = station("A", "a", "c", 1.0, 2.0);
        let keys: Vec<&str> = reading.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                labels::ID,
                labels::NAME,
                labels::TEMPERATURE,
                labels::RAINFALL,
                labels::CITY,
            ]
        );
    }
}
