//! Forest ownership records (thousand acres).

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Forest area by owner class for a single state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub region: String,
    pub subregion: String,
    pub state: String,
    /// All owners combined.
    pub all_ownerships: Option<f64>,
    /// Federal, state, and local government.
    pub total_public: Option<f64>,
    pub total_federal: Option<f64>,
    pub national_forest: Option<f64>,
    /// Bureau of Land Management.
    pub blm: Option<f64>,
    pub other_federal: Option<f64>,
    pub state_owned: Option<f64>,
    pub county_municipal: Option<f64>,
    pub total_private: Option<f64>,
    pub private_corporate: Option<f64>,
    pub private_noncorporate: Option<f64>,
}

/// Columns of an [`OwnershipRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum OwnershipField {
    Region,
    Subregion,
    State,
    AllOwnerships,
    TotalPublic,
    TotalFederal,
    NationalForest,
    Blm,
    OtherFederal,
    StateOwned,
    CountyMunicipal,
    TotalPrivate,
    PrivateCorporate,
    PrivateNoncorporate,
}

/// Ownership records with pre-aggregated totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipResponse {
    pub data: Vec<OwnershipRecord>,
    pub total_records: usize,
    pub total_public: Option<f64>,
    pub total_private: Option<f64>,
    pub total_federal: Option<f64>,
}

/// Area held by one ownership category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipBreakdown {
    /// Category display name.
    pub category: String,
    pub area: Option<f64>,
    /// Share of all ownerships, as computed by the API.
    pub percentage: Option<f64>,
}
