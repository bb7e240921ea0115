//! Response payloads, mirroring the JSON returned by each endpoint.
//!
//! Every record tolerates missing fields and explicit `null`s, so partial
//! responses decode with empty values rather than failing. Field names match
//! the wire names exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Result of a reverse geocoding request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseResult {
    #[serde(deserialize_with = "null_as_default")]
    pub place_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub licence: String,
    /// `node`, `way` or `relation`.
    #[serde(deserialize_with = "null_as_default")]
    pub osm_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lon: String,
    /// Main OSM tag key, e.g. `place` or `highway`.
    #[serde(deserialize_with = "null_as_default")]
    pub class: String,
    /// Main OSM tag value, e.g. `city` or `residential`.
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub place_rank: i32,
    pub importance: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub addresstype: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub address: ReverseAddress,
    /// `[min_lat, max_lat, min_lon, max_lon]`, as strings.
    #[serde(deserialize_with = "null_as_default")]
    pub boundingbox: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverseAddress {
    #[serde(deserialize_with = "null_as_default")]
    pub amenity: String,
    #[serde(deserialize_with = "null_as_default")]
    pub house_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub road: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quarter: String,
    #[serde(deserialize_with = "null_as_default")]
    pub neighbourhood: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suburb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(rename = "ISO3166-2-lvl4", deserialize_with = "null_as_default")]
    pub iso3166_2_lvl4: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_code: String,
}

/// Detailed information about a single OSM object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsResult {
    #[serde(deserialize_with = "null_as_default")]
    pub place_id: i64,
    pub parent_place_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    /// Number or string depending on the object; kept as raw JSON.
    pub admin_level: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub localname: String,
    /// `name`, `name:de`, `name:ru`, ...
    #[serde(deserialize_with = "null_as_default")]
    pub names: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub addresstags: BTreeMap<String, String>,
    pub housenumber: Value,
    #[serde(deserialize_with = "null_as_default")]
    pub calculated_postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_code: String,
    pub indexed_date: Option<DateTime<Utc>>,
    pub importance: Option<f64>,
    pub calculated_importance: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub extratags: BTreeMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub calculated_wikipedia: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rank_address: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub rank_search: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub isarea: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub centroid: Geometry,
    #[serde(deserialize_with = "null_as_default")]
    pub geometry: Geometry,
}

/// GeoJSON geometry. Coordinates stay raw since their nesting depends on `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub coordinates: Value,
}

/// One match of a free-text search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(deserialize_with = "null_as_default")]
    pub address: SearchAddress,
    #[serde(deserialize_with = "null_as_default")]
    pub boundingbox: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub class: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    pub importance: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub licence: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub place_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub svg: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchAddress {
    #[serde(rename = "ISO3166-2-lvl4", deserialize_with = "null_as_default")]
    pub iso3166_2_lvl4: String,
    #[serde(deserialize_with = "null_as_default")]
    pub borough: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub historic: String,
    #[serde(deserialize_with = "null_as_default")]
    pub house_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub neighbourhood: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub road: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suburb: String,
}

/// One object returned by a lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupResult {
    #[serde(deserialize_with = "null_as_default")]
    pub place_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub licence: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub osm_id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub boundingbox: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: String,
    #[serde(deserialize_with = "null_as_default")]
    pub lon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub class: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    pub importance: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub address: LookupAddress,
    /// `wikidata`, `wikipedia`, `heritage`, `architect`, ...
    #[serde(deserialize_with = "null_as_default")]
    pub extratags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupAddress {
    #[serde(deserialize_with = "null_as_default")]
    pub tourism: String,
    #[serde(deserialize_with = "null_as_default")]
    pub road: String,
    #[serde(deserialize_with = "null_as_default")]
    pub suburb: String,
    #[serde(deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country_code: String,
}

/// Decode `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
