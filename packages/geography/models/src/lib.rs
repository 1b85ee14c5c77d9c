#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region, subregion, and state reference types for the forest inventory.
//!
//! The national inventory reports every state under one of four regions,
//! each split into a fixed set of subregions. These tables are read-only
//! reference data: they define which subregion names are legal for a
//! region and which states a region/subregion pair resolves to. The
//! [`FilterSelection`] type that narrows a dataset along this hierarchy
//! lives here too, since both the API client and the presentation layer
//! speak it.

pub mod states;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use states::{STATE_ABBREVIATIONS, state_abbr, state_name};

/// Top-level inventory regions.
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
pub enum Region {
    /// Northeast and North Central states.
    #[serde(rename = "North")]
    #[strum(serialize = "North")]
    North,
    /// Southeast and South Central states.
    #[serde(rename = "South")]
    #[strum(serialize = "South")]
    South,
    /// Great Plains and Intermountain states.
    #[serde(rename = "Rocky Mountain")]
    #[strum(serialize = "Rocky Mountain")]
    RockyMountain,
    /// Alaska, Pacific Northwest, and Pacific Southwest.
    #[serde(rename = "Pacific Coast")]
    #[strum(serialize = "Pacific Coast")]
    PacificCoast,
}

impl Region {
    /// All regions in reporting order.
    pub const ALL: &[Self] = &[
        Self::North,
        Self::South,
        Self::RockyMountain,
        Self::PacificCoast,
    ];

    /// Returns the subregions of this region, in reporting order.
    #[must_use]
    pub const fn subregions(self) -> &'static [Subregion] {
        match self {
            Self::North => &[Subregion::Northeast, Subregion::NorthCentral],
            Self::South => &[Subregion::Southeast, Subregion::SouthCentral],
            Self::RockyMountain => &[Subregion::GreatPlains, Subregion::Intermountain],
            Self::PacificCoast => &[
                Subregion::Alaska,
                Subregion::PacificNorthwest,
                Subregion::PacificSouthwest,
            ],
        }
    }
}

/// Subregions, each belonging to exactly one [`Region`].
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
pub enum Subregion {
    #[serde(rename = "Northeast")]
    #[strum(serialize = "Northeast")]
    Northeast,
    #[serde(rename = "North Central")]
    #[strum(serialize = "North Central")]
    NorthCentral,
    #[serde(rename = "Southeast")]
    #[strum(serialize = "Southeast")]
    Southeast,
    #[serde(rename = "South Central")]
    #[strum(serialize = "South Central")]
    SouthCentral,
    #[serde(rename = "Great Plains")]
    #[strum(serialize = "Great Plains")]
    GreatPlains,
    #[serde(rename = "Intermountain")]
    #[strum(serialize = "Intermountain")]
    Intermountain,
    #[serde(rename = "Alaska")]
    #[strum(serialize = "Alaska")]
    Alaska,
    #[serde(rename = "Pacific Northwest")]
    #[strum(serialize = "Pacific Northwest")]
    PacificNorthwest,
    #[serde(rename = "Pacific Southwest")]
    #[strum(serialize = "Pacific Southwest")]
    PacificSouthwest,
}

impl Subregion {
    /// Returns the region this subregion belongs to.
    #[must_use]
    pub const fn region(self) -> Region {
        match self {
            Self::Northeast | Self::NorthCentral => Region::North,
            Self::Southeast | Self::SouthCentral => Region::South,
            Self::GreatPlains | Self::Intermountain => Region::RockyMountain,
            Self::Alaska | Self::PacificNorthwest | Self::PacificSouthwest => Region::PacificCoast,
        }
    }

    /// Returns the member states of this subregion.
    ///
    /// The source tables list Kansas, Nebraska, and the Dakotas under both
    /// North Central and Great Plains; both lists are kept as published.
    #[must_use]
    pub const fn states(self) -> &'static [&'static str] {
        match self {
            Self::Northeast => &[
                "Connecticut",
                "Delaware",
                "Maine",
                "Maryland",
                "Massachusetts",
                "New Hampshire",
                "New Jersey",
                "New York",
                "Pennsylvania",
                "Rhode Island",
                "Vermont",
                "West Virginia",
            ],
            Self::NorthCentral => &[
                "Illinois",
                "Indiana",
                "Iowa",
                "Michigan",
                "Minnesota",
                "Missouri",
                "Ohio",
                "Wisconsin",
                "Kansas",
                "Nebraska",
                "North Dakota",
                "South Dakota",
            ],
            Self::Southeast => &[
                "Florida",
                "Georgia",
                "North Carolina",
                "South Carolina",
                "Virginia",
            ],
            Self::SouthCentral => &[
                "Alabama",
                "Arkansas",
                "Kentucky",
                "Louisiana",
                "Mississippi",
                "Oklahoma",
                "Tennessee",
                "Texas",
            ],
            Self::GreatPlains => &["Kansas", "Nebraska", "North Dakota", "South Dakota"],
            Self::Intermountain => &[
                "Arizona",
                "Colorado",
                "Idaho",
                "Montana",
                "Nevada",
                "New Mexico",
                "Utah",
                "Wyoming",
            ],
            Self::Alaska => &["Alaska"],
            Self::PacificNorthwest => &["Oregon", "Washington"],
            Self::PacificSouthwest => &["California", "Hawaii"],
        }
    }
}

/// A region together with the names of the subregions it contains.
///
/// This is the shape returned by the regions directory endpoint and the
/// only source of legal subregion values for a [`FilterSelection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegionInfo {
    /// Region display name (e.g. "Pacific Coast").
    pub name: String,
    /// Ordered subregion display names.
    pub subregions: Vec<String>,
}

impl RegionInfo {
    /// Returns `true` if `subregion` is one of this region's children.
    #[must_use]
    pub fn contains(&self, subregion: &str) -> bool {
        self.subregions.iter().any(|s| s == subregion)
    }
}

impl From<Region> for RegionInfo {
    fn from(region: Region) -> Self {
        Self {
            name: region.to_string(),
            subregions: region.subregions().iter().map(ToString::to_string).collect(),
        }
    }
}

/// Returns the full region directory built from the static tables.
#[must_use]
pub fn region_directory() -> Vec<RegionInfo> {
    Region::ALL.iter().copied().map(RegionInfo::from).collect()
}

/// A dataset filter along the region → subregion → state hierarchy, plus
/// an independent year constraint.
///
/// `None` means "no constraint". Values are stored as given: this type does
/// not check that a subregion belongs to its region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterSelection {
    /// Region display name.
    pub region: Option<String>,
    /// Subregion display name.
    pub subregion: Option<String>,
    /// Full state name.
    pub state: Option<String>,
    /// Inventory year.
    pub year: Option<i32>,
}

impl FilterSelection {
    /// Returns `true` when no level of the hierarchy and no year is set.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.region.is_none()
            && self.subregion.is_none()
            && self.state.is_none()
            && self.year.is_none()
    }

    /// Returns the selection as query parameters, omitting unset values.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(region) = &self.region {
            pairs.push(("region", region.clone()));
        }
        if let Some(subregion) = &self.subregion {
            pairs.push(("subregion", subregion.clone()));
        }
        if let Some(state) = &self.state {
            pairs.push(("state", state.clone()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        pairs
    }
}

/// Enumerates the states reachable under a region/subregion constraint.
///
/// The filter sidebar uses this to offer only legal state options.
pub trait StateDirectory {
    /// Returns the sorted state names for the given constraint.
    fn states(&self, region: Option<&str>, subregion: Option<&str>) -> Vec<String>;
}

/// A [`StateDirectory`] backed by the built-in reference tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticDirectory;

impl StateDirectory for StaticDirectory {
    fn states(&self, region: Option<&str>, subregion: Option<&str>) -> Vec<String> {
        states_for(region, subregion)
    }
}

/// Returns the sorted, de-duplicated state names matching the constraint.
///
/// An unknown region or subregion name yields an empty list. With no
/// constraint every state is returned.
#[must_use]
pub fn states_for(region: Option<&str>, subregion: Option<&str>) -> Vec<String> {
    let subregions: Vec<Subregion> = match (region, subregion) {
        (_, Some(sub)) => match sub.parse::<Subregion>() {
            Ok(sub) if region.is_none_or(|r| r == sub.region().as_ref()) => vec![sub],
            _ => Vec::new(),
        },
        (Some(region), None) => region
            .parse::<Region>()
            .map(|r| r.subregions().to_vec())
            .unwrap_or_default(),
        (None, None) => {
            return STATE_ABBREVIATIONS
                .iter()
                .map(|(name, _)| (*name).to_string())
                .collect();
        }
    };

    let mut states: Vec<String> = subregions
        .iter()
        .flat_map(|s| s.states().iter())
        .map(|s| (*s).to_string())
        .collect();
    states.sort_unstable();
    states.dedup();
    states
}
