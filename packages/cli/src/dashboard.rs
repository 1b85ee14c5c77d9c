//! Fetches what a view needs and renders it as text.

use std::future::Future;

use forest_dash_api::{ApiError, ForestApi, LatestRequest};
use forest_dash_forest_models::{Dataset, SpeciesGroup};
use forest_dash_geography_models::{FilterSelection, StaticDirectory};
use forest_dash_presentation::filter::FilterContext;
use forest_dash_presentation::pages::{
    DynamicsPage, LATEST_YEAR, LandAreaPage, NAME_FIELD, OwnershipPage, PageOptions, TimberPage,
    TrendsPage, dynamics_page, land_area_page, ownership_page, timber_page, trend_map,
    trend_table, trends_page,
};
use forest_dash_presentation::palette::Choropleth;
use forest_dash_presentation::table::TableView;
use forest_dash_presentation::{PresentationError, Record};
use thiserror::Error;

use crate::render::{format_cards, format_map, format_rows, format_shares, format_table};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Presentation(#[from] PresentationError),

    #[error("The {dataset} dataset has no {view} view")]
    Unsupported {
        dataset: Dataset,
        view: &'static str,
    },
}

/// Sort and page requested for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRequest {
    pub sort: Option<String>,
    pub descending: bool,
    /// Zero-based page index.
    pub page: usize,
}

impl TableRequest {
    fn render<R: Record>(&self, mut table: TableView<R>) -> String {
        if let Some(key) = &self.sort {
            table.sort(key);
            if self.descending {
                table.sort(key);
            }
        }
        table.go_to_page(self.page);
        format_table(&table)
    }
}

/// Region directory with each region's subregions.
///
/// # Errors
///
/// Returns [`DashboardError::Api`] if the directory cannot be fetched.
pub async fn regions(api: &dyn ForestApi) -> Result<String, DashboardError> {
    let regions = api.regions().await?;
    Ok(regions.iter().fold(String::new(), |mut out, region| {
        out.push_str(&region.name);
        out.push('\n');
        for subregion in &region.subregions {
            out.push_str("  ");
            out.push_str(subregion);
            out.push('\n');
        }
        out
    }))
}

/// States reachable under the filter's region and subregion.
///
/// # Errors
///
/// Returns [`DashboardError::Api`] if the list cannot be fetched.
pub async fn states(api: &dyn ForestApi, filter: &FilterContext) -> Result<String, DashboardError> {
    let states = api.states(filter.region(), filter.subregion()).await?;
    Ok(states.iter().fold(String::new(), |mut out, state| {
        out.push_str(state);
        out.push('\n');
        out
    }))
}

/// Logs when the filter names a subregion or state outside its region.
///
/// A fetch failure here only skips the check.
pub async fn check_filter(api: &dyn ForestApi, filter: &FilterContext) {
    if !filter.has_hierarchy_filters() {
        return;
    }
    match api.regions().await {
        Ok(regions) if !filter.is_consistent(&regions, &StaticDirectory) => {
            log::warn!(
                "Filter {:?} does not match the region directory; results may be empty",
                filter.selection()
            );
        }
        Ok(_) => {}
        Err(e) => log::debug!("Skipping filter check: {e}"),
    }
}

async fn land_area(
    api: &dyn ForestApi,
    filter: &FilterContext,
    options: &PageOptions,
) -> Result<LandAreaPage, DashboardError> {
    let (response, by_state) = tokio::try_join!(
        api.land_area(filter.selection()),
        api.land_area_by_state(filter.region())
    )?;
    Ok(land_area_page(&response, &by_state, options)?)
}

async fn ownership(
    api: &dyn ForestApi,
    filter: &FilterContext,
    options: &PageOptions,
) -> Result<OwnershipPage, DashboardError> {
    let (response, breakdown, by_region) = tokio::try_join!(
        api.ownership(filter.selection()),
        api.ownership_breakdown(filter.region()),
        api.ownership_by_region()
    )?;
    Ok(ownership_page(&response, &breakdown, &by_region, options)?)
}

async fn timber(
    api: &dyn ForestApi,
    filter: &FilterContext,
    options: &PageOptions,
) -> Result<TimberPage, DashboardError> {
    let (response, breakdown, by_region, by_state) = tokio::try_join!(
        api.timber(filter.selection()),
        api.timber_breakdown(filter.region()),
        api.timber_by_region(),
        api.timber_by_state(filter.region())
    )?;
    Ok(timber_page(&response, &breakdown, &by_region, &by_state, options)?)
}

async fn dynamics(
    api: &dyn ForestApi,
    filter: &FilterContext,
    species: SpeciesGroup,
    options: &PageOptions,
) -> Result<DynamicsPage, DashboardError> {
    let year = filter.year().unwrap_or(LATEST_YEAR);
    let selection = FilterSelection {
        year: Some(year),
        ..filter.selection().clone()
    };
    let (summary, by_region, records) = tokio::try_join!(
        api.dynamics_summary(year),
        api.dynamics_by_region(year, species),
        api.dynamics(&selection, Some(species))
    )?;
    Ok(dynamics_page(&summary, &by_region, &records.data, options)?)
}

async fn trends(api: &dyn ForestApi) -> Result<TrendsPage, DashboardError> {
    let (national, regional) = tokio::try_join!(api.national_trend(), api.trend_by_region())?;
    Ok(trends_page(&national, &regional))
}

/// One page of a dataset's table.
///
/// # Errors
///
/// Returns [`DashboardError`] if a fetch fails or the page options are
/// invalid.
pub async fn table(
    api: &dyn ForestApi,
    dataset: Dataset,
    filter: &FilterContext,
    species: SpeciesGroup,
    options: &PageOptions,
    request: &TableRequest,
) -> Result<String, DashboardError> {
    Ok(match dataset {
        Dataset::LandArea => request.render(land_area(api, filter, options).await?.table),
        Dataset::Ownership => request.render(ownership(api, filter, options).await?.table),
        Dataset::Timber => request.render(timber(api, filter, options).await?.table),
        Dataset::Dynamics => request.render(dynamics(api, filter, species, options).await?.table),
        Dataset::Trends => {
            let response = api.forest_area_trends(filter.selection()).await?;
            request.render(trend_table(&response.data, options)?)
        }
    })
}

/// Keeps only the newest view per dataset and filter revision.
///
/// Each run is keyed by `(dataset, filter.revision())` before its fetch
/// starts. A run that finishes after a newer one was started is dropped
/// and yields `None`.
#[derive(Debug, Default)]
pub struct LatestView {
    latest: LatestRequest<(Dataset, u64)>,
}

impl LatestView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Awaits `view` and returns its output unless a newer run superseded
    /// it in the meantime.
    ///
    /// # Errors
    ///
    /// Returns the error of `view` when this run is still the newest.
    pub async fn run<F>(
        &self,
        dataset: Dataset,
        filter: &FilterContext,
        view: F,
    ) -> Result<Option<String>, DashboardError>
    where
        F: Future<Output = Result<String, DashboardError>>,
    {
        let ticket = self.latest.issue((dataset, filter.revision()));
        match view.await {
            Ok(output) => Ok(self.latest.accept(&ticket, output)),
            Err(e) if self.latest.is_current(&ticket) => Err(e),
            Err(e) => {
                log::debug!("Dropping error from superseded {dataset} view: {e}");
                Ok(None)
            }
        }
    }
}

/// Choropleth of a dataset's per-state headline value.
///
/// # Errors
///
/// Returns [`DashboardError::Unsupported`] for datasets without per-state
/// rows, or any fetch or binning error.
pub async fn map(
    api: &dyn ForestApi,
    dataset: Dataset,
    filter: &FilterContext,
    options: &PageOptions,
) -> Result<String, DashboardError> {
    let map = match dataset {
        Dataset::LandArea => land_area(api, filter, options).await?.map,
        Dataset::Ownership => {
            let response = api.ownership(filter.selection()).await?;
            Choropleth::build(
                response
                    .data
                    .iter()
                    .map(|r| (r.state.clone(), r.all_ownerships)),
                "thousand acres",
                options.bins,
                &options.palette,
            )?
        }
        Dataset::Timber => {
            let response = api.timber(filter.selection()).await?;
            Choropleth::build(
                response
                    .data
                    .iter()
                    .map(|r| (r.state.clone(), r.all_timber_total)),
                "million cubic feet",
                options.bins,
                &options.palette,
            )?
        }
        Dataset::Trends => {
            let year = filter.year().unwrap_or(LATEST_YEAR);
            let response = api.forest_area_trends(filter.selection()).await?;
            trend_map(&response.data, year, options)?
        }
        Dataset::Dynamics => {
            return Err(DashboardError::Unsupported {
                dataset,
                view: "map",
            });
        }
    };
    Ok(format_map(&map.with_selection(filter.state())))
}

/// Metric cards and breakdowns of a dataset's page.
///
/// # Errors
///
/// Returns [`DashboardError`] if a fetch fails or the page options are
/// invalid.
pub async fn summary(
    api: &dyn ForestApi,
    dataset: Dataset,
    filter: &FilterContext,
    species: SpeciesGroup,
    options: &PageOptions,
) -> Result<String, DashboardError> {
    let mut out = format!("{}\n", dataset.title());
    match dataset {
        Dataset::LandArea => {
            let page = land_area(api, filter, options).await?;
            out.push_str(&format_cards(&page.cards));
            out.push_str(&format_rows(
                "Top forested states (million acres)",
                &page.top_states,
                NAME_FIELD,
            ));
        }
        Dataset::Ownership => {
            let page = ownership(api, filter, options).await?;
            out.push_str(&format_cards(&page.cards));
            out.push_str(&format_shares("Ownership distribution", &page.distribution));
            out.push_str(&format_rows(
                "By region (million acres)",
                &page.by_region,
                NAME_FIELD,
            ));
        }
        Dataset::Timber => {
            let page = timber(api, filter, options).await?;
            out.push_str(&format_cards(&page.cards));
            out.push_str(&format_shares("By tree class", &page.species));
            out.push_str(&format_rows(
                "Top states (billion cubic feet)",
                &page.top_states,
                NAME_FIELD,
            ));
        }
        Dataset::Dynamics => {
            let page = dynamics(api, filter, species, options).await?;
            out.push_str(&format_cards(&page.cards));
            out.push_str(&format!("  Verdict: {}\n", page.verdict));
            out.push_str(&format_rows(
                "By region (billion cubic feet)",
                &page.by_region,
                NAME_FIELD,
            ));
        }
        Dataset::Trends => out.push_str(&trends_summary(&trends(api).await?)),
    }
    Ok(out)
}

fn trends_summary(page: &TrendsPage) -> String {
    format_cards(&page.cards)
}

/// Landmark cards and the year-by-region series.
///
/// # Errors
///
/// Returns [`DashboardError::Api`] if a series cannot be fetched.
pub async fn trend_series(api: &dyn ForestApi) -> Result<String, DashboardError> {
    let page = trends(api).await?;
    let mut out = trends_summary(&page);
    out.push_str(&format_rows(
        "Forest area by region (thousand acres)",
        &page.regional,
        forest_dash_presentation::metrics::YEAR_FIELD,
    ));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use forest_dash_forest_models::{
        DynamicsResponse, DynamicsSummary, ForestAreaTrendResponse, LandAreaRecord,
        LandAreaResponse, LandAreaSummary, OwnershipBreakdown, OwnershipResponse,
        RegionalDynamics, RegionalTrend, TimberBreakdown, TimberVolumeResponse, TimeSeriesPoint,
    };
    use forest_dash_geography_models::{RegionInfo, region_directory, states_for};
    use forest_dash_presentation::Row;

    use super::*;

    /// Serves canned land-area data and the static directory; everything
    /// else is a 404.
    struct FakeApi;

    fn missing<T>() -> Result<T, ApiError> {
        Err(ApiError::Status {
            status: 404,
            url: "fake".to_string(),
        })
    }

    fn record(state: &str, land: f64, forest: Option<f64>) -> LandAreaRecord {
        LandAreaRecord {
            region: "North".to_string(),
            subregion: "Northeast".to_string(),
            state: state.to_string(),
            total_land_area: Some(land),
            total_forest_land: forest,
            total_timberland: None,
            planted_timberland: None,
            natural_timberland: None,
            productive_reserved: None,
            unproductive_reserved: None,
            other_forest: None,
            woodland_area: None,
            other_land: None,
        }
    }

    #[async_trait]
    impl ForestApi for FakeApi {
        async fn regions(&self) -> Result<Vec<RegionInfo>, ApiError> {
            Ok(region_directory())
        }
        async fn states(
            &self,
            region: Option<&str>,
            subregion: Option<&str>,
        ) -> Result<Vec<String>, ApiError> {
            Ok(states_for(region, subregion))
        }
        async fn years(&self) -> Result<Vec<i32>, ApiError> {
            missing()
        }
        async fn land_area(&self, _: &FilterSelection) -> Result<LandAreaResponse, ApiError> {
            let data = vec![
                record("Maine", 19_700.0, Some(17_600.0)),
                record("Vermont", 5_900.0, Some(4_500.0)),
                record("Delaware", 1_200.0, None),
            ];
            Ok(LandAreaResponse {
                total_records: data.len(),
                data,
                total_land_area: Some(26_800.0),
                total_forest_land: Some(22_100.0),
                total_timberland: None,
                forest_cover_percent: Some(82.5),
            })
        }
        async fn land_area_by_region(&self) -> Result<Vec<LandAreaSummary>, ApiError> {
            missing()
        }
        async fn land_area_by_state(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<LandAreaSummary>, ApiError> {
            Ok(Vec::new())
        }
        async fn ownership(&self, _: &FilterSelection) -> Result<OwnershipResponse, ApiError> {
            missing()
        }
        async fn ownership_breakdown(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<OwnershipBreakdown>, ApiError> {
            missing()
        }
        async fn ownership_by_region(&self) -> Result<Vec<Row>, ApiError> {
            missing()
        }
        async fn timber(&self, _: &FilterSelection) -> Result<TimberVolumeResponse, ApiError> {
            missing()
        }
        async fn timber_breakdown(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<TimberBreakdown>, ApiError> {
            missing()
        }
        async fn timber_by_region(&self) -> Result<Vec<Row>, ApiError> {
            missing()
        }
        async fn timber_by_state(&self, _: Option<&str>) -> Result<Vec<Row>, ApiError> {
            missing()
        }
        async fn dynamics(
            &self,
            _: &FilterSelection,
            _: Option<SpeciesGroup>,
        ) -> Result<DynamicsResponse, ApiError> {
            missing()
        }
        async fn dynamics_summary(&self, _: i32) -> Result<DynamicsSummary, ApiError> {
            missing()
        }
        async fn dynamics_by_region(
            &self,
            _: i32,
            _: SpeciesGroup,
        ) -> Result<Vec<RegionalDynamics>, ApiError> {
            missing()
        }
        async fn forest_area_trends(
            &self,
            _: &FilterSelection,
        ) -> Result<ForestAreaTrendResponse, ApiError> {
            missing()
        }
        async fn national_trend(&self) -> Result<Vec<TimeSeriesPoint>, ApiError> {
            missing()
        }
        async fn trend_by_region(&self) -> Result<Vec<RegionalTrend>, ApiError> {
            missing()
        }
    }

    fn options() -> PageOptions {
        PageOptions::for_dataset(Dataset::LandArea)
    }

    #[tokio::test]
    async fn land_area_table_sorted_descending_keeps_nulls_last() {
        let request = TableRequest {
            sort: Some("total_forest_land".to_string()),
            descending: true,
            page: 0,
        };
        let text = table(
            &FakeApi,
            Dataset::LandArea,
            &FilterContext::new(),
            SpeciesGroup::Total,
            &options(),
            &request,
        )
        .await
        .unwrap();

        let body: Vec<&str> = text.lines().skip(2).take(3).collect();
        assert!(body[0].starts_with("Maine"));
        assert!(body[1].starts_with("Vermont"));
        assert!(body[2].starts_with("Delaware"));
        assert!(text.contains("Showing 1 to 3 of 3 entries"));
    }

    #[tokio::test]
    async fn land_area_map_marks_unreported_state() {
        let text = map(&FakeApi, Dataset::LandArea, &FilterContext::new(), &options())
            .await
            .unwrap();
        assert!(text.contains("DE #e5e7eb Delaware: N/A thousand acres"));
        assert!(text.contains("ME "));
    }

    #[tokio::test]
    async fn map_highlights_filtered_state() {
        let mut filter = FilterContext::new();
        filter.set_region("North");
        filter.set_state("Vermont");
        let text = map(&FakeApi, Dataset::LandArea, &filter, &options())
            .await
            .unwrap();
        let selected: Vec<&str> = text.lines().filter(|l| l.starts_with('*')).collect();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].starts_with("*VT "));
    }

    #[tokio::test]
    async fn superseded_view_is_dropped() {
        let views = LatestView::new();
        let mut filter = FilterContext::new();
        let stale_filter = filter.clone();
        filter.set_region("South");

        let slow = async {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            Ok("stale".to_string())
        };
        let fast = async { Ok("fresh".to_string()) };
        let (stale, fresh) = tokio::join!(
            views.run(Dataset::LandArea, &stale_filter, slow),
            views.run(Dataset::LandArea, &filter, fast),
        );
        assert_eq!(stale.unwrap(), None);
        assert_eq!(fresh.unwrap().as_deref(), Some("fresh"));

        let again = views
            .run(Dataset::LandArea, &filter, async { Ok("again".to_string()) })
            .await
            .unwrap();
        assert_eq!(again.as_deref(), Some("again"));
    }

    #[tokio::test]
    async fn superseded_error_is_dropped_but_current_error_surfaces() {
        let views = LatestView::new();
        let filter = FilterContext::new();
        let failing = || async {
            Err::<String, _>(DashboardError::Unsupported {
                dataset: Dataset::Dynamics,
                view: "map",
            })
        };

        let (old, new) = tokio::join!(
            views.run(Dataset::Dynamics, &filter, async {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                failing().await
            }),
            views.run(Dataset::Timber, &filter, async { Ok("timber".to_string()) }),
        );
        assert!(matches!(old, Ok(None)));
        assert_eq!(new.unwrap().as_deref(), Some("timber"));

        assert!(views.run(Dataset::Dynamics, &filter, failing()).await.is_err());
    }

    #[tokio::test]
    async fn dynamics_has_no_map() {
        let err = map(&FakeApi, Dataset::Dynamics, &FilterContext::new(), &options())
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Unsupported { .. }));
    }

    #[tokio::test]
    async fn fetch_errors_surface() {
        let err = summary(
            &FakeApi,
            Dataset::Timber,
            &FilterContext::new(),
            SpeciesGroup::Total,
            &options(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "API error: 404 for fake");
    }

    #[tokio::test]
    async fn states_follow_region_filter() {
        let mut filter = FilterContext::new();
        filter.set_region("Pacific Coast");
        let text = states(&FakeApi, &filter).await.unwrap();
        assert!(text.lines().any(|s| s == "Oregon"));
        assert!(!text.lines().any(|s| s == "Maine"));
    }
}
