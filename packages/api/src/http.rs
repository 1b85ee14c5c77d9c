//! [`ForestApi`] over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use forest_dash_forest_models::{
    DynamicsResponse, DynamicsSummary, ForestAreaTrendResponse, LandAreaResponse,
    LandAreaSummary, OwnershipBreakdown, OwnershipResponse, RegionalDynamics, RegionalTrend,
    SpeciesGroup, TimberBreakdown, TimberVolumeResponse, TimeSeriesPoint,
};
use forest_dash_geography_models::{FilterSelection, RegionInfo};
use forest_dash_presentation::Row;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{ApiError, ForestApi};

/// Where the API listens when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Query parameters of one request. Empty values are dropped.
type Params = Vec<(&'static str, String)>;

/// A [`ForestApi`] that issues GET requests against a base URL.
#[derive(Debug, Clone)]
pub struct HttpForestApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpForestApi {
    /// Creates a client for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not an absolute
    /// URL, or [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            message: format!("{base_url}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                message: format!("{base_url}: not a base URL"),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("forest-dash/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL of `path` with `params` appended as a query string.
    ///
    /// `path` is appended to the base URL's own path, so a base of
    /// `https://host/stats/` serves `/api/timber` from
    /// `https://host/stats/api/timber`. Parameters with an empty or
    /// whitespace-only value are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the joined URL does not parse.
    pub fn endpoint_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined).map_err(|e| ApiError::InvalidUrl {
            message: format!("{joined}: {e}"),
        })?;

        let kept: Vec<&(&str, String)> = params
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        if !kept.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in kept {
                query.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, params: Params) -> Result<T, ApiError> {
        let url = self.endpoint_url(path, &params)?;
        log::debug!("GET {url}");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            log::warn!("{url} returned {status}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        log::trace!("{url}: {} byte(s)", body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

fn optional(key: &'static str, value: Option<&str>) -> Params {
    value
        .map(|v| vec![(key, v.to_string())])
        .unwrap_or_default()
}

#[async_trait]
impl ForestApi for HttpForestApi {
    async fn regions(&self) -> Result<Vec<RegionInfo>, ApiError> {
        self.get("/api/filters/regions", Vec::new()).await
    }

    async fn states(
        &self,
        region: Option<&str>,
        subregion: Option<&str>,
    ) -> Result<Vec<String>, ApiError> {
        let mut params = optional("region", region);
        params.extend(optional("subregion", subregion));
        self.get("/api/filters/states", params).await
    }

    async fn years(&self) -> Result<Vec<i32>, ApiError> {
        self.get("/api/filters/years", Vec::new()).await
    }

    async fn land_area(&self, filter: &FilterSelection) -> Result<LandAreaResponse, ApiError> {
        self.get("/api/land-area", filter.query_pairs()).await
    }

    async fn land_area_by_region(&self) -> Result<Vec<LandAreaSummary>, ApiError> {
        self.get("/api/land-area/summary/by-region", Vec::new())
            .await
    }

    async fn land_area_by_state(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<LandAreaSummary>, ApiError> {
        self.get("/api/land-area/summary/by-state", optional("region", region))
            .await
    }

    async fn ownership(&self, filter: &FilterSelection) -> Result<OwnershipResponse, ApiError> {
        self.get("/api/ownership", filter.query_pairs()).await
    }

    async fn ownership_breakdown(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<OwnershipBreakdown>, ApiError> {
        self.get("/api/ownership/breakdown", optional("region", region))
            .await
    }

    async fn ownership_by_region(&self) -> Result<Vec<Row>, ApiError> {
        self.get("/api/ownership/by-region", Vec::new()).await
    }

    async fn timber(&self, filter: &FilterSelection) -> Result<TimberVolumeResponse, ApiError> {
        self.get("/api/timber", filter.query_pairs()).await
    }

    async fn timber_breakdown(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<TimberBreakdown>, ApiError> {
        self.get("/api/timber/breakdown", optional("region", region))
            .await
    }

    async fn timber_by_region(&self) -> Result<Vec<Row>, ApiError> {
        self.get("/api/timber/by-region", Vec::new()).await
    }

    async fn timber_by_state(&self, region: Option<&str>) -> Result<Vec<Row>, ApiError> {
        self.get("/api/timber/by-state", optional("region", region))
            .await
    }

    async fn dynamics(
        &self,
        filter: &FilterSelection,
        species: Option<SpeciesGroup>,
    ) -> Result<DynamicsResponse, ApiError> {
        self.get("/api/dynamics", dynamics_params(filter, species))
            .await
    }

    async fn dynamics_summary(&self, year: i32) -> Result<DynamicsSummary, ApiError> {
        self.get("/api/dynamics/summary", vec![("year", year.to_string())])
            .await
    }

    async fn dynamics_by_region(
        &self,
        year: i32,
        species: SpeciesGroup,
    ) -> Result<Vec<RegionalDynamics>, ApiError> {
        let params = vec![("year", year.to_string()), ("species", species.to_string())];
        self.get("/api/dynamics/by-region", params).await
    }

    async fn forest_area_trends(
        &self,
        filter: &FilterSelection,
    ) -> Result<ForestAreaTrendResponse, ApiError> {
        self.get("/api/trends/forest-area", filter.query_pairs())
            .await
    }

    async fn national_trend(&self) -> Result<Vec<TimeSeriesPoint>, ApiError> {
        self.get("/api/trends/forest-area/national", Vec::new())
            .await
    }

    async fn trend_by_region(&self) -> Result<Vec<RegionalTrend>, ApiError> {
        self.get("/api/trends/forest-area/by-region", Vec::new())
            .await
    }
}

/// The dynamics endpoint filters by region and year only.
fn dynamics_params(filter: &FilterSelection, species: Option<SpeciesGroup>) -> Params {
    let mut params = optional("region", filter.region.as_deref());
    if let Some(year) = filter.year {
        params.push(("year", year.to_string()));
    }
    if let Some(species) = species {
        params.push(("species", species.to_string()));
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpForestApi {
        HttpForestApi::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn omits_empty_and_missing_params() {
        let filter = FilterSelection {
            region: Some("South".to_string()),
            subregion: Some(String::new()),
            state: None,
            year: Some(2017),
        };
        let url = api(DEFAULT_BASE_URL)
            .endpoint_url("/api/land-area", &filter.query_pairs())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/land-area?region=South&year=2017"
        );
    }

    #[test]
    fn no_params_means_no_query_string() {
        let url = api(DEFAULT_BASE_URL)
            .endpoint_url("/api/filters/regions", &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/filters/regions");
        assert!(url.query().is_none());
    }

    #[test]
    fn keeps_base_path_prefix() {
        let url = api("https://stats.example.org/forest/")
            .endpoint_url("/api/timber/by-state", &[("region", "North".to_string())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://stats.example.org/forest/api/timber/by-state?region=North"
        );
    }

    #[test]
    fn encodes_spaces_in_values() {
        let url = api(DEFAULT_BASE_URL)
            .endpoint_url(
                "/api/filters/states",
                &[("region", "Pacific Coast".to_string())],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/filters/states?region=Pacific+Coast"
        );
    }

    #[test]
    fn dynamics_ignores_subregion_and_state() {
        let filter = FilterSelection {
            region: Some("South".to_string()),
            subregion: Some("Southeast".to_string()),
            state: Some("Georgia".to_string()),
            year: Some(2022),
        };
        assert_eq!(
            dynamics_params(&filter, Some(SpeciesGroup::Softwood)),
            vec![
                ("region", "South".to_string()),
                ("year", "2022".to_string()),
                ("species", "Softwood".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_relative_base() {
        assert!(matches!(
            HttpForestApi::new("localhost", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl { .. })
        ));
    }
}
