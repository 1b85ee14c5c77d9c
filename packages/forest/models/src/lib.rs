#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forest inventory dataset records and API response shapes.
//!
//! Every dataset served by the statistics API has a typed record, a
//! response envelope carrying pre-aggregated summary scalars, and a field
//! enum that names each column of the record. Nullable numbers are
//! `Option<f64>`: `None` means "not reported" and is never the same thing
//! as a reported zero.
//!
//! Land area, ownership, and timber values are in thousand acres or
//! million cubic feet as published. Dynamics values are in thousand cubic
//! feet.

pub mod dynamics;
pub mod land_area;
pub mod ownership;
pub mod timber;
pub mod trends;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use dynamics::{DynamicsField, DynamicsRecord, DynamicsResponse, DynamicsSummary, RegionalDynamics};
pub use land_area::{LandAreaField, LandAreaRecord, LandAreaResponse, LandAreaSummary};
pub use ownership::{OwnershipBreakdown, OwnershipField, OwnershipRecord, OwnershipResponse};
pub use timber::{TimberBreakdown, TimberField, TimberVolumeRecord, TimberVolumeResponse};
pub use trends::{
    ForestAreaTrendRecord, ForestAreaTrendResponse, RegionalTrend, TimeSeriesPoint, TrendField,
};

/// Years with a national forest-area estimate, oldest first.
pub const TREND_YEARS: &[i32] = &[
    1630, 1907, 1920, 1938, 1953, 1963, 1977, 1987, 1997, 2007, 2012, 2017, 2022,
];

/// Years with ownership estimates, oldest first.
pub const OWNERSHIP_YEARS: &[i32] = &[1953, 1977, 1987, 1997, 2007, 2012, 2017, 2022];

/// Years with growth/mortality/removals estimates, newest first (the
/// order the dynamics year picker offers them).
pub const DYNAMICS_YEARS: &[i32] = &[2022, 2016, 2011, 2006, 1996, 1976, 1952];

/// The datasets exposed by the statistics API.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Dataset {
    /// Land classification by state.
    LandArea,
    /// Forest ownership by state.
    Ownership,
    /// Timber volume by state.
    Timber,
    /// Growth, mortality, and removals by region and year.
    Dynamics,
    /// Historical forest area by state and year.
    Trends,
}

impl Dataset {
    /// All datasets in navigation order.
    pub const ALL: &[Self] = &[
        Self::LandArea,
        Self::Ownership,
        Self::Timber,
        Self::Dynamics,
        Self::Trends,
    ];

    /// Returns the API path of the dataset's record-list endpoint.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::LandArea => "/api/land-area",
            Self::Ownership => "/api/ownership",
            Self::Timber => "/api/timber",
            Self::Dynamics => "/api/dynamics",
            Self::Trends => "/api/trends/forest-area",
        }
    }

    /// Returns the human-readable page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::LandArea => "Land Area Analysis",
            Self::Ownership => "Forest Ownership",
            Self::Timber => "Timber Volume",
            Self::Dynamics => "Forest Dynamics",
            Self::Trends => "Historical Trends",
        }
    }
}

/// Species groupings used by timber and dynamics data.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SpeciesGroup {
    /// Conifers.
    Softwood,
    /// Broadleaf species.
    Hardwood,
    /// All species combined.
    Total,
}

impl SpeciesGroup {
    /// All groups in picker order.
    pub const ALL: &[Self] = &[Self::Total, Self::Softwood, Self::Hardwood];
}

/// Forest ownership categories, in the order the breakdown reports them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum OwnershipCategory {
    #[serde(rename = "National forest")]
    #[strum(serialize = "National forest")]
    NationalForest,
    #[serde(rename = "Bureau of Land Management")]
    #[strum(serialize = "Bureau of Land Management", serialize = "BLM")]
    BureauOfLandManagement,
    #[serde(rename = "Other federal")]
    #[strum(serialize = "Other federal")]
    OtherFederal,
    #[serde(rename = "State")]
    #[strum(serialize = "State")]
    State,
    #[serde(rename = "County and municipal")]
    #[strum(serialize = "County and municipal")]
    CountyMunicipal,
    #[serde(rename = "Private corporate")]
    #[strum(serialize = "Private corporate")]
    PrivateCorporate,
    #[serde(rename = "Private noncorporate")]
    #[strum(serialize = "Private noncorporate")]
    PrivateNoncorporate,
}

impl OwnershipCategory {
    /// All categories in reporting order.
    pub const ALL: &[Self] = &[
        Self::NationalForest,
        Self::BureauOfLandManagement,
        Self::OtherFederal,
        Self::State,
        Self::CountyMunicipal,
        Self::PrivateCorporate,
        Self::PrivateNoncorporate,
    ];

    /// Returns `true` for federal, state, and local government owners.
    #[must_use]
    pub const fn is_public(self) -> bool {
        !matches!(self, Self::PrivateCorporate | Self::PrivateNoncorporate)
    }
}

/// Land classification classes, in the order the land-area table lists
/// them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum LandClass {
    #[strum(serialize = "Total land area")]
    TotalLandArea,
    #[strum(serialize = "Total forest land")]
    TotalForestLand,
    #[strum(serialize = "Total timberland")]
    TotalTimberland,
    #[strum(serialize = "Planted timberland")]
    PlantedTimberland,
    #[strum(serialize = "Natural origin timberland")]
    NaturalTimberland,
    #[strum(serialize = "Productive reserved")]
    ProductiveReserved,
    #[strum(serialize = "Unproductive reserved")]
    UnproductiveReserved,
    #[strum(serialize = "Other forest")]
    OtherForest,
    #[strum(serialize = "Woodland area")]
    WoodlandArea,
    #[strum(serialize = "Other land")]
    OtherLand,
}

impl LandClass {
    /// Returns the land-area record field holding this class.
    #[must_use]
    pub const fn field(self) -> LandAreaField {
        match self {
            Self::TotalLandArea => LandAreaField::TotalLandArea,
            Self::TotalForestLand => LandAreaField::TotalForestLand,
            Self::TotalTimberland => LandAreaField::TotalTimberland,
            Self::PlantedTimberland => LandAreaField::PlantedTimberland,
            Self::NaturalTimberland => LandAreaField::NaturalTimberland,
            Self::ProductiveReserved => LandAreaField::ProductiveReserved,
            Self::UnproductiveReserved => LandAreaField::UnproductiveReserved,
            Self::OtherForest => LandAreaField::OtherForest,
            Self::WoodlandArea => LandAreaField::WoodlandArea,
            Self::OtherLand => LandAreaField::OtherLand,
        }
    }
}
