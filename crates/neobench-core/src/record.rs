//! Near-earth-object record: the fixed row schema the benchmark moves around.
//!
//! Field names follow the dataset columns (`est_diameter_min`, `sentry_object`, ...)
//! through serde renames, so one struct serves both the CSV header and the SQL
//! column list.

use serde::{Deserialize, Deserializer};

/// Column names in dataset / table order.
pub const COLUMNS: [&str; 10] = [
    "id",
    "name",
    "est_diameter_min",
    "est_diameter_max",
    "relative_velocity",
    "miss_distance",
    "orbiting_body",
    "sentry_object",
    "absolute_magnitude",
    "hazardous",
];

/// One dataset row. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    #[serde(rename = "est_diameter_min")]
    pub min_diameter: f64,
    #[serde(rename = "est_diameter_max")]
    pub max_diameter: f64,
    pub relative_velocity: f64,
    pub miss_distance: f64,
    pub orbiting_body: String,
    #[serde(rename = "sentry_object", deserialize_with = "lenient_bool")]
    pub is_sentry_object: bool,
    pub absolute_magnitude: f32,
    #[serde(rename = "hazardous", deserialize_with = "lenient_bool")]
    pub is_hazardous: bool,
}

/// Parse the boolean spellings found in exported datasets.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn lenient_bool<'de, D>(d: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(d)?;
    parse_bool(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid boolean: {s:?}")))
}
