//! Historical forest-area series (thousand acres).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Forest area for one state in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestAreaTrendRecord {
    pub region: String,
    pub subregion: String,
    pub state: String,
    pub year: i32,
    pub area: Option<f64>,
}

/// Columns of a [`ForestAreaTrendRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TrendField {
    Region,
    Subregion,
    State,
    Year,
    Area,
}

/// Trend records and the years they span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestAreaTrendResponse {
    pub data: Vec<ForestAreaTrendRecord>,
    pub years: Vec<i32>,
    pub total_records: usize,
}

/// A single point of a yearly series. `value` is `None` for years without
/// an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub year: i32,
    pub value: Option<f64>,
}

/// A named yearly series (one line of a multi-series trend chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalTrend {
    pub name: String,
    pub data: Vec<TimeSeriesPoint>,
}

impl RegionalTrend {
    /// Returns the value reported for `year`, or `None` when the year is
    /// missing or unreported.
    #[must_use]
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.data
            .iter()
            .find(|p| p.year == year)
            .and_then(|p| p.value)
    }
}
