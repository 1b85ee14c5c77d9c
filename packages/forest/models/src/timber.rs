//! Timber volume records (million cubic feet).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Timber volume on timberland for a single state, split by tree class and
/// species group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimberVolumeRecord {
    pub region: String,
    pub subregion: String,
    pub state: String,
    pub all_timber_total: Option<f64>,
    pub all_timber_softwoods: Option<f64>,
    pub all_timber_hardwoods: Option<f64>,
    pub growing_stock_total: Option<f64>,
    pub growing_stock_softwoods: Option<f64>,
    pub growing_stock_hardwoods: Option<f64>,
    pub cull_total: Option<f64>,
    pub cull_softwoods: Option<f64>,
    pub cull_hardwoods: Option<f64>,
    pub sound_dead_total: Option<f64>,
    pub sound_dead_softwoods: Option<f64>,
    pub sound_dead_hardwoods: Option<f64>,
}

/// Columns of a [`TimberVolumeRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum TimberField {
    Region,
    Subregion,
    State,
    AllTimberTotal,
    AllTimberSoftwoods,
    AllTimberHardwoods,
    GrowingStockTotal,
    GrowingStockSoftwoods,
    GrowingStockHardwoods,
    CullTotal,
    CullSoftwoods,
    CullHardwoods,
    SoundDeadTotal,
    SoundDeadSoftwoods,
    SoundDeadHardwoods,
}

/// Timber records with pre-aggregated totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimberVolumeResponse {
    pub data: Vec<TimberVolumeRecord>,
    pub total_records: usize,
    pub total_volume: Option<f64>,
    pub softwood_volume: Option<f64>,
    pub hardwood_volume: Option<f64>,
    pub softwood_percent: Option<f64>,
    pub hardwood_percent: Option<f64>,
}

/// Volume held by one tree class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimberBreakdown {
    pub category: String,
    pub volume: Option<f64>,
    pub percentage: Option<f64>,
}
