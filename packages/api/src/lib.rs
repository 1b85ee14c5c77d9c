#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the forest inventory statistics API.
//!
//! The API serves pre-aggregated Forest Inventory and Analysis tables as
//! JSON. [`ForestApi`] names one method per endpoint the dashboard reads;
//! [`HttpForestApi`] implements it over `reqwest`. [`latest`] guards
//! against out-of-order responses when the filter changes while a fetch
//! is still in flight.

pub mod http;
pub mod latest;

use async_trait::async_trait;
use forest_dash_forest_models::{
    DynamicsResponse, DynamicsSummary, ForestAreaTrendResponse, LandAreaResponse,
    LandAreaSummary, OwnershipBreakdown, OwnershipResponse, RegionalDynamics, RegionalTrend,
    SpeciesGroup, TimberBreakdown, TimberVolumeResponse, TimeSeriesPoint,
};
use forest_dash_geography_models::{FilterSelection, RegionInfo};
use forest_dash_presentation::Row;
use thiserror::Error;

pub use http::{DEFAULT_BASE_URL, HttpForestApi};
pub use latest::{LatestRequest, Ticket};

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body was not the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The configured base URL or endpoint path does not form a URL.
    #[error("Invalid URL: {message}")]
    InvalidUrl {
        /// What was wrong.
        message: String,
    },
}

impl ApiError {
    /// Returns `true` if retrying the same request could succeed.
    ///
    /// Server errors, timeouts, and connection failures are transient;
    /// client errors and malformed bodies are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            Self::Json(_) | Self::InvalidUrl { .. } => false,
        }
    }
}

/// Read access to every endpoint the dashboard uses.
///
/// Parameters that are `None` are left off the request entirely.
#[async_trait]
pub trait ForestApi: Send + Sync {
    /// Regions with their subregion names.
    async fn regions(&self) -> Result<Vec<RegionInfo>, ApiError>;

    /// State names under an optional region and subregion.
    async fn states(
        &self,
        region: Option<&str>,
        subregion: Option<&str>,
    ) -> Result<Vec<String>, ApiError>;

    /// Inventory years with land area data.
    async fn years(&self) -> Result<Vec<i32>, ApiError>;

    /// Land area records matching `filter`.
    async fn land_area(&self, filter: &FilterSelection) -> Result<LandAreaResponse, ApiError>;

    /// Land area totals per region.
    async fn land_area_by_region(&self) -> Result<Vec<LandAreaSummary>, ApiError>;

    /// Land area totals per state, optionally within one region.
    async fn land_area_by_state(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<LandAreaSummary>, ApiError>;

    /// Ownership records matching `filter`.
    async fn ownership(&self, filter: &FilterSelection) -> Result<OwnershipResponse, ApiError>;

    /// Forest area by ownership category.
    async fn ownership_breakdown(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<OwnershipBreakdown>, ApiError>;

    /// Ownership totals per region. The shape is not fixed by the API.
    async fn ownership_by_region(&self) -> Result<Vec<Row>, ApiError>;

    /// Timber volume records matching `filter`.
    async fn timber(&self, filter: &FilterSelection) -> Result<TimberVolumeResponse, ApiError>;

    /// Timber volume by species group.
    async fn timber_breakdown(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<TimberBreakdown>, ApiError>;

    /// Timber volume per region. The shape is not fixed by the API.
    async fn timber_by_region(&self) -> Result<Vec<Row>, ApiError>;

    /// Timber volume per state. The shape is not fixed by the API.
    async fn timber_by_state(&self, region: Option<&str>) -> Result<Vec<Row>, ApiError>;

    /// Dynamics records for a region, year, and species group.
    async fn dynamics(
        &self,
        filter: &FilterSelection,
        species: Option<SpeciesGroup>,
    ) -> Result<DynamicsResponse, ApiError>;

    /// National dynamics totals for `year`.
    async fn dynamics_summary(&self, year: i32) -> Result<DynamicsSummary, ApiError>;

    /// Dynamics totals per region for `year` and `species`.
    async fn dynamics_by_region(
        &self,
        year: i32,
        species: SpeciesGroup,
    ) -> Result<Vec<RegionalDynamics>, ApiError>;

    /// Historical forest area records matching `filter`.
    async fn forest_area_trends(
        &self,
        filter: &FilterSelection,
    ) -> Result<ForestAreaTrendResponse, ApiError>;

    /// National forest area per trend year.
    async fn national_trend(&self) -> Result<Vec<TimeSeriesPoint>, ApiError>;

    /// Forest area series per region.
    async fn trend_by_region(&self) -> Result<Vec<RegionalTrend>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_classify_by_code() {
        let server = ApiError::Status {
            status: 503,
            url: "http://localhost:8000/api/timber".to_string(),
        };
        let client = ApiError::Status {
            status: 404,
            url: "http://localhost:8000/api/timber".to_string(),
        };
        assert!(server.is_transient());
        assert!(!client.is_transient());
        assert_eq!(
            client.to_string(),
            "API error: 404 for http://localhost:8000/api/timber"
        );
    }

    #[test]
    fn malformed_body_is_not_transient() {
        let err: ApiError = serde_json::from_str::<Vec<i32>>("{")
            .map_err(ApiError::from)
            .unwrap_err();
        assert!(!err.is_transient());
    }
}
