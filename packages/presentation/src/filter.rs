//! Cascading region → subregion → state filter.
//!
//! [`FilterContext`] is the single owner of a page's filter selection.
//! Every transition keeps the hierarchy well formed: a subregion is only
//! ever set together with a region, a state only together with a region,
//! and changing an ancestor always clears its descendants. The context
//! stores whatever names it is given; offering only legal names is the job
//! of [`FilterContext::subregion_options`] and
//! [`FilterContext::state_options`].

use forest_dash_geography_models::{FilterSelection, RegionInfo, StateDirectory};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One level of the filter hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterLevel {
    Region,
    Subregion,
    State,
    Year,
}

/// A set filter value, as shown in the "active filters" chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveFilter {
    pub level: FilterLevel,
    pub value: String,
}

/// A user-driven change to the selection.
///
/// An empty string clears the corresponding level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterTransition {
    SetRegion(String),
    SetSubregion(String),
    SetState(String),
    SetYear(i32),
    ClearYear,
    ClearAll,
}

/// The live filter selection of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterContext {
    selection: FilterSelection,
    revision: u64,
}

impl FilterContext {
    /// Creates an unconstrained context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Counter bumped on every change that alters the selection. The CLI
    /// keys each view fetch by it, so a response issued under an older
    /// revision can be recognized as stale.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.selection.region.as_deref()
    }

    #[must_use]
    pub fn subregion(&self) -> Option<&str> {
        self.selection.subregion.as_deref()
    }

    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.selection.state.as_deref()
    }

    #[must_use]
    pub const fn year(&self) -> Option<i32> {
        self.selection.year
    }

    /// Selects `region` and clears subregion and state, even when `region`
    /// is already selected. An empty name clears the region.
    pub fn set_region(&mut self, region: &str) {
        let mut next = self.selection.clone();
        next.region = non_empty(region);
        next.subregion = None;
        next.state = None;
        self.commit("region", next);
    }

    /// Selects `subregion` under the current region and clears the state.
    /// Ignored while no region is selected. An empty name clears the
    /// subregion.
    pub fn set_subregion(&mut self, subregion: &str) {
        let value = non_empty(subregion);
        if value.is_some() && self.selection.region.is_none() {
            log::warn!("Ignoring subregion '{subregion}': no region selected");
            return;
        }
        let mut next = self.selection.clone();
        next.subregion = value;
        next.state = None;
        self.commit("subregion", next);
    }

    /// Selects `state` under the current region (and subregion, if any).
    /// Ignored while no region is selected. An empty name clears the state.
    pub fn set_state(&mut self, state: &str) {
        let value = non_empty(state);
        if value.is_some() && self.selection.region.is_none() {
            log::warn!("Ignoring state '{state}': no region selected");
            return;
        }
        let mut next = self.selection.clone();
        next.state = value;
        self.commit("state", next);
    }

    /// Sets the year constraint. Independent of the hierarchy.
    pub fn set_year(&mut self, year: i32) {
        let mut next = self.selection.clone();
        next.year = Some(year);
        self.commit("year", next);
    }

    pub fn clear_year(&mut self) {
        let mut next = self.selection.clone();
        next.year = None;
        self.commit("year", next);
    }

    /// Clears every level, the year included.
    pub fn clear_all(&mut self) {
        self.commit("all", FilterSelection::default());
    }

    /// Applies a single transition.
    pub fn apply(&mut self, transition: &FilterTransition) {
        match transition {
            FilterTransition::SetRegion(region) => self.set_region(region),
            FilterTransition::SetSubregion(subregion) => self.set_subregion(subregion),
            FilterTransition::SetState(state) => self.set_state(state),
            FilterTransition::SetYear(year) => self.set_year(*year),
            FilterTransition::ClearYear => self.clear_year(),
            FilterTransition::ClearAll => self.clear_all(),
        }
    }

    /// Returns `true` if any hierarchy level is set (the "Clear all"
    /// affordance is shown).
    #[must_use]
    pub const fn has_hierarchy_filters(&self) -> bool {
        self.selection.region.is_some()
            || self.selection.subregion.is_some()
            || self.selection.state.is_some()
    }

    /// Set filters in hierarchy order, followed by the year.
    #[must_use]
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        let levels = [
            (FilterLevel::Region, self.selection.region.clone()),
            (FilterLevel::Subregion, self.selection.subregion.clone()),
            (FilterLevel::State, self.selection.state.clone()),
            (FilterLevel::Year, self.selection.year.map(|y| y.to_string())),
        ];
        levels
            .into_iter()
            .filter_map(|(level, value)| value.map(|value| ActiveFilter { level, value }))
            .collect()
    }

    /// Returns `true` when no level is set without its ancestors.
    #[must_use]
    pub const fn is_well_formed(&self) -> bool {
        let has_region = self.selection.region.is_some();
        (self.selection.subregion.is_none() || has_region)
            && (self.selection.state.is_none() || has_region)
    }

    /// Returns `true` when the selection is well formed and every set name
    /// is a legal child of its parent according to the directories.
    #[must_use]
    pub fn is_consistent(&self, regions: &[RegionInfo], states: &impl StateDirectory) -> bool {
        if !self.is_well_formed() {
            return false;
        }
        let Some(region) = self.region() else {
            return true;
        };
        let Some(info) = regions.iter().find(|r| r.name == region) else {
            return false;
        };
        if self.subregion().is_some_and(|s| !info.contains(s)) {
            return false;
        }
        self.state().is_none_or(|state| {
            states
                .states(Some(region), self.subregion())
                .iter()
                .any(|s| s == state)
        })
    }

    /// Subregions that may be selected under the current region. Empty
    /// while no region is selected.
    #[must_use]
    pub fn subregion_options(&self, regions: &[RegionInfo]) -> Vec<String> {
        self.region()
            .and_then(|region| regions.iter().find(|r| r.name == region))
            .map(|info| info.subregions.clone())
            .unwrap_or_default()
    }

    /// States that may be selected under the current region and
    /// subregion. Empty while no region is selected.
    #[must_use]
    pub fn state_options(&self, states: &impl StateDirectory) -> Vec<String> {
        self.region()
            .map(|region| states.states(Some(region), self.subregion()))
            .unwrap_or_default()
    }

    fn commit(&mut self, level: &str, next: FilterSelection) {
        if next == self.selection {
            log::trace!("Filter change on {level} left selection unchanged");
            return;
        }
        self.selection = next;
        self.revision += 1;
        log::debug!(
            "Filter {level} changed (revision {}): {:?}",
            self.revision,
            self.selection
        );
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
