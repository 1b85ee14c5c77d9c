//! Growth, mortality, and removals of growing stock (thousand cubic feet
//! per year).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Annual dynamics for a region, species group, and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsRecord {
    pub region: String,
    /// Absent on region-level rows.
    pub subregion: Option<String>,
    pub species_group: String,
    pub year: i32,
    pub growth: Option<f64>,
    pub mortality: Option<f64>,
    pub removals: Option<f64>,
    pub net_change: Option<f64>,
}

/// Columns of a [`DynamicsRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum DynamicsField {
    Region,
    Subregion,
    SpeciesGroup,
    Year,
    Growth,
    Mortality,
    Removals,
    NetChange,
}

/// Dynamics records and the years they span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsResponse {
    pub data: Vec<DynamicsRecord>,
    pub years: Vec<i32>,
    pub total_records: usize,
}

/// National dynamics totals for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicsSummary {
    pub year: i32,
    pub total_growth: Option<f64>,
    pub total_mortality: Option<f64>,
    pub total_removals: Option<f64>,
    pub net_change: Option<f64>,
    /// Growth / (mortality + removals), as computed by the API.
    pub sustainability_ratio: Option<f64>,
}

/// Dynamics totals for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalDynamics {
    pub region: String,
    pub growth: Option<f64>,
    pub mortality: Option<f64>,
    pub removals: Option<f64>,
    pub net_change: Option<f64>,
}
