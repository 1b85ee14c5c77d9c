//! Land classification records (thousand acres).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Land classification for a single state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandAreaRecord {
    /// Region display name.
    pub region: String,
    /// Subregion display name.
    pub subregion: String,
    /// Full state name.
    pub state: String,
    /// All land, forested or not.
    pub total_land_area: Option<f64>,
    /// All forest land.
    pub total_forest_land: Option<f64>,
    /// Forest land capable of producing commercial timber.
    pub total_timberland: Option<f64>,
    /// Timberland established by planting.
    pub planted_timberland: Option<f64>,
    /// Timberland of natural origin.
    pub natural_timberland: Option<f64>,
    /// Productive forest withdrawn from harvest.
    pub productive_reserved: Option<f64>,
    /// Unproductive forest withdrawn from harvest.
    pub unproductive_reserved: Option<f64>,
    /// Other forest land.
    pub other_forest: Option<f64>,
    /// Woodland.
    pub woodland_area: Option<f64>,
    /// Non-forest land.
    pub other_land: Option<f64>,
}

/// Columns of a [`LandAreaRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum LandAreaField {
    Region,
    Subregion,
    State,
    TotalLandArea,
    TotalForestLand,
    TotalTimberland,
    PlantedTimberland,
    NaturalTimberland,
    ProductiveReserved,
    UnproductiveReserved,
    OtherForest,
    WoodlandArea,
    OtherLand,
}

/// Land-area records with pre-aggregated totals.
///
/// The totals are computed server-side and are an independent signal from
/// `data`; they may disagree with a sum over `data` on partial coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandAreaResponse {
    /// Matching records.
    pub data: Vec<LandAreaRecord>,
    /// Number of records returned.
    pub total_records: usize,
    /// Total land area.
    pub total_land_area: Option<f64>,
    /// Total forest land.
    pub total_forest_land: Option<f64>,
    /// Total timberland.
    pub total_timberland: Option<f64>,
    /// Forest land as a percentage of land area.
    pub forest_cover_percent: Option<f64>,
}

/// Land-area totals for a named region or state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandAreaSummary {
    /// Region or state name.
    pub name: String,
    /// Total land area.
    pub total_land_area: Option<f64>,
    /// Total forest land.
    pub total_forest_land: Option<f64>,
    /// Total timberland.
    pub total_timberland: Option<f64>,
    /// Forest land as a percentage of land area.
    pub forest_cover_percent: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_values_deserialize_as_none() {
        let json = r#"{
            "region": "South",
            "subregion": "Southeast",
            "state": "Georgia",
            "total_land_area": 36740.5,
            "total_forest_land": null
        }"#;
        let record: LandAreaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.total_land_area, Some(36740.5));
        assert_eq!(record.total_forest_land, None);
        assert_eq!(record.other_land, None);
    }

    #[test]
    fn field_names_match_json_keys() {
        assert_eq!(LandAreaField::TotalForestLand.to_string(), "total_forest_land");
        assert_eq!(
            "natural_timberland".parse::<LandAreaField>().unwrap(),
            LandAreaField::NaturalTimberland
        );
    }
}
