//! Display models for each dashboard page.
//!
//! Each builder takes the API responses a page fetches and produces its
//! metric cards, chart series, table, and (for land area) map. Summary
//! scalars come straight from the response envelopes and are never
//! re-derived by summing the record list.

use forest_dash_forest_models::{
    Dataset, DynamicsField, DynamicsRecord, DynamicsSummary, ForestAreaTrendRecord,
    LandAreaField, LandAreaRecord, LandAreaResponse, LandAreaSummary, OwnershipBreakdown,
    OwnershipField, OwnershipRecord, OwnershipResponse, RegionalDynamics, RegionalTrend,
    TimberBreakdown, TimberField, TimberVolumeRecord, TimberVolumeResponse, TimeSeriesPoint,
    TrendField,
};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::PresentationError;
use crate::metrics::{
    Derivation, DerivedMetric, Share, UnitScale, derive, percent_change, percentage_of,
    share_breakdown, sustainability_ratio, top_n,
};
use crate::palette::{Choropleth, Palette};
use crate::record::{Record, Row};
use crate::table::{Align, Column, TableView};
use crate::value::{UNAVAILABLE, Value, format_fixed};
use crate::view::MetricCard;

/// Field holding the category name in chart rows.
pub const NAME_FIELD: &str = "name";

const MILLION_ACRES: &str = "million acres";
const BILLION_CU_FT: &str = "billion cu ft";

/// States shown in the land-area bar chart.
pub const LAND_AREA_TOP_STATES: usize = 15;
/// States shown in the timber bar chart.
pub const TIMBER_TOP_STATES: usize = 12;

/// Pre-settlement baseline year of the trend series.
pub const BASELINE_YEAR: i32 = 1630;
/// Year of the historical forest-area minimum.
pub const LOW_POINT_YEAR: i32 = 1920;
/// Latest trend estimate.
pub const LATEST_YEAR: i32 = 2022;

/// Rows per table page when no size is configured.
#[must_use]
pub const fn default_page_size(dataset: Dataset) -> usize {
    match dataset {
        Dataset::Dynamics => 10,
        Dataset::LandArea | Dataset::Ownership | Dataset::Timber | Dataset::Trends => 15,
    }
}

/// Table and map settings shared by the page builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    pub page_size: usize,
    pub bins: usize,
    pub palette: Palette,
}

impl PageOptions {
    /// Defaults for `dataset`: its usual page size and one bin per palette
    /// color.
    #[must_use]
    pub const fn for_dataset(dataset: Dataset) -> Self {
        let palette = Palette::greens9();
        Self {
            page_size: default_page_size(dataset),
            bins: palette.len(),
            palette,
        }
    }
}

fn card(
    title: &str,
    raw: Option<f64>,
    scale: UnitScale,
    unit: &str,
    decimals: usize,
) -> MetricCard {
    MetricCard::new(title, scale.apply(raw))
        .unit(unit)
        .decimals(decimals)
}

/// Rescales `series` fields of untyped rows for a chart, renaming
/// `name_field` to [`NAME_FIELD`].
///
/// # Errors
///
/// Returns [`PresentationError::UnknownField`] if no row carries
/// `name_field` or one of `series`.
pub fn chart_rows(
    rows: &[Row],
    name_field: &str,
    series: &[&'static str],
    scale: UnitScale,
) -> Result<Vec<Row>, PresentationError> {
    let metrics: Vec<DerivedMetric<String>> = series
        .iter()
        .map(|field| {
            DerivedMetric::new(
                *field,
                Derivation::Scale {
                    field: (*field).to_string(),
                    scale,
                },
            )
        })
        .collect();
    crate::record::validate_fields(rows, &[name_field.to_string()])?;

    Ok(derive(rows, &metrics)?
        .into_iter()
        .map(|enriched| {
            let name = enriched.record.value(&name_field.to_string());
            series.iter().fold(Row::new().with(NAME_FIELD, name), |row, field| {
                row.with(*field, enriched.derived(field))
            })
        })
        .collect())
}

fn percent_cell(value: &Value, _: &LandAreaRecord) -> String {
    value
        .as_number()
        .map_or_else(|| UNAVAILABLE.to_string(), |p| format!("{}%", format_fixed(p, 1)))
}

fn ratio_cell(value: &Value, _: &DynamicsRecord) -> String {
    value
        .as_number()
        .map_or_else(|| UNAVAILABLE.to_string(), |r| format_fixed(r, 2))
}

/// Land-area page: classification cards, top forested states, state table
/// with forest share, and a forest-land choropleth.
#[derive(Debug, Clone)]
pub struct LandAreaPage {
    pub cards: Vec<MetricCard>,
    pub top_states: Vec<Row>,
    pub table: TableView<LandAreaRecord>,
    pub map: Choropleth,
}

/// Builds the land-area page.
///
/// # Errors
///
/// Returns a [`PresentationError`] if the table or map cannot be built
/// with `options`.
pub fn land_area_page(
    response: &LandAreaResponse,
    by_state: &[LandAreaSummary],
    options: &PageOptions,
) -> Result<LandAreaPage, PresentationError> {
    let scale = UnitScale::ThousandsToMillions;
    let cards = vec![
        card("Total Land Area", response.total_land_area, scale, MILLION_ACRES, 1),
        card("Total Forest Land", response.total_forest_land, scale, MILLION_ACRES, 1),
        card("Forest Cover", response.forest_cover_percent, UnitScale::Identity, "%", 1),
    ];

    let summary_rows: Vec<Row> = by_state
        .iter()
        .map(|s| {
            Row::new()
                .with(NAME_FIELD, s.name.as_str())
                .with("forest", scale.apply(s.total_forest_land))
                .with("timberland", scale.apply(s.total_timberland))
        })
        .collect();
    let top_states = top_n(&summary_rows, &"forest".to_string(), LAND_AREA_TOP_STATES)?
        .into_iter()
        .cloned()
        .collect();

    let columns = vec![
        Column::field(LandAreaField::State, "State"),
        Column::field(LandAreaField::Region, "Region"),
        Column::field(LandAreaField::Subregion, "Subregion"),
        Column::field(LandAreaField::TotalLandArea, "Total Land").align(Align::Right),
        Column::field(LandAreaField::TotalForestLand, "Forest Land").align(Align::Right),
        Column::field(LandAreaField::TotalTimberland, "Timberland").align(Align::Right),
        Column::computed("forest_percent", "Forest %", |r: &LandAreaRecord| {
            Value::from(percentage_of(r.total_forest_land, r.total_land_area))
        })
        .align(Align::Right)
        .render(percent_cell),
    ];
    let table = TableView::new(response.data.clone(), columns, options.page_size)?;

    let map = Choropleth::build(
        response
            .data
            .iter()
            .map(|r| (r.state.clone(), r.total_forest_land)),
        "thousand acres",
        options.bins,
        &options.palette,
    )?;

    Ok(LandAreaPage {
        cards,
        top_states,
        table,
        map,
    })
}

/// Ownership page: public/private/federal cards, category shares,
/// public vs private by region, and the state table.
#[derive(Debug, Clone)]
pub struct OwnershipPage {
    pub cards: Vec<MetricCard>,
    pub distribution: Vec<Share>,
    pub by_region: Vec<Row>,
    pub table: TableView<OwnershipRecord>,
}

/// Builds the ownership page.
///
/// # Errors
///
/// Returns a [`PresentationError`] if `by_region` lacks the expected
/// fields or the table cannot be built.
pub fn ownership_page(
    response: &OwnershipResponse,
    breakdown: &[OwnershipBreakdown],
    by_region: &[Row],
    options: &PageOptions,
) -> Result<OwnershipPage, PresentationError> {
    let scale = UnitScale::ThousandsToMillions;
    let cards = vec![
        card("Total Public", response.total_public, scale, MILLION_ACRES, 1),
        card("Total Private", response.total_private, scale, MILLION_ACRES, 1),
        card("Total Federal", response.total_federal, scale, MILLION_ACRES, 1),
    ];

    let distribution = share_breakdown(breakdown.iter().map(|b| (b.category.as_str(), b.area)));
    let by_region = chart_rows(by_region, "region", &["public", "private"], scale)?;

    let columns = vec![
        Column::field(OwnershipField::State, "State"),
        Column::field(OwnershipField::Region, "Region"),
        Column::field(OwnershipField::AllOwnerships, "Total").align(Align::Right),
        Column::field(OwnershipField::TotalPublic, "Public").align(Align::Right),
        Column::field(OwnershipField::TotalPrivate, "Private").align(Align::Right),
        Column::field(OwnershipField::NationalForest, "Nat. Forest").align(Align::Right),
        Column::field(OwnershipField::StateOwned, "State").align(Align::Right),
        Column::field(OwnershipField::PrivateCorporate, "Corporate").align(Align::Right),
        Column::field(OwnershipField::PrivateNoncorporate, "Non-Corp").align(Align::Right),
    ];
    let table = TableView::new(response.data.clone(), columns, options.page_size)?;

    Ok(OwnershipPage {
        cards,
        distribution,
        by_region,
        table,
    })
}

/// Timber page: volume cards, species shares, regional and top-state
/// volumes, and the state table.
#[derive(Debug, Clone)]
pub struct TimberPage {
    pub cards: Vec<MetricCard>,
    pub species: Vec<Share>,
    pub by_region: Vec<Row>,
    pub top_states: Vec<Row>,
    pub table: TableView<TimberVolumeRecord>,
}

/// Builds the timber page.
///
/// # Errors
///
/// Returns a [`PresentationError`] if `by_region` or `by_state` lacks the
/// expected fields or the table cannot be built.
pub fn timber_page(
    response: &TimberVolumeResponse,
    breakdown: &[TimberBreakdown],
    by_region: &[Row],
    by_state: &[Row],
    options: &PageOptions,
) -> Result<TimberPage, PresentationError> {
    // Published in million cubic feet.
    let scale = UnitScale::ThousandsToMillions;
    let share_subtitle = |pct: Option<f64>| {
        format!(
            "{}% of total",
            pct.map_or_else(|| UNAVAILABLE.to_string(), |p| format_fixed(p, 0))
        )
    };
    #[allow(clippy::cast_precision_loss)]
    let state_count = response.total_records as f64;
    let cards = vec![
        card("Total Volume", response.total_volume, scale, BILLION_CU_FT, 0),
        card("Softwood", response.softwood_volume, scale, BILLION_CU_FT, 0)
            .subtitle(share_subtitle(response.softwood_percent)),
        card("Hardwood", response.hardwood_volume, scale, BILLION_CU_FT, 0)
            .subtitle(share_subtitle(response.hardwood_percent)),
        MetricCard::new("States", Some(state_count))
            .decimals(0)
            .subtitle("With timber data"),
    ];

    let species = share_breakdown(breakdown.iter().map(|b| (b.category.as_str(), b.volume)));
    let by_region = chart_rows(by_region, "region", &["softwood", "hardwood"], scale)?;

    let top: Vec<Row> = top_n(by_state, &"total".to_string(), TIMBER_TOP_STATES)?
        .into_iter()
        .cloned()
        .collect();
    let top_states = chart_rows(&top, "state", &["total"], scale)?;

    let columns = vec![
        Column::field(TimberField::State, "State"),
        Column::field(TimberField::Region, "Region"),
        Column::field(TimberField::AllTimberTotal, "Total").align(Align::Right),
        Column::field(TimberField::AllTimberSoftwoods, "Softwood").align(Align::Right),
        Column::field(TimberField::AllTimberHardwoods, "Hardwood").align(Align::Right),
        Column::field(TimberField::GrowingStockTotal, "Growing Stock").align(Align::Right),
        Column::field(TimberField::CullTotal, "Cull").align(Align::Right),
        Column::field(TimberField::SoundDeadTotal, "Sound Dead").align(Align::Right),
    ];
    let table = TableView::new(response.data.clone(), columns, options.page_size)?;

    Ok(TimberPage {
        cards,
        species,
        by_region,
        top_states,
        table,
    })
}

/// Whether growth keeps up with mortality plus removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
pub enum Sustainability {
    #[strum(serialize = "Sustainable (>1.0)")]
    Sustainable,
    #[strum(serialize = "Unsustainable (<1.0)")]
    Unsustainable,
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl Sustainability {
    /// Classifies a growth-to-loss ratio; 1.0 counts as sustainable.
    #[must_use]
    pub fn from_ratio(ratio: Option<f64>) -> Self {
        match ratio {
            Some(r) if r >= 1.0 => Self::Sustainable,
            Some(_) => Self::Unsustainable,
            None => Self::Unknown,
        }
    }
}

/// Dynamics page: national cards, sustainability verdict, regional bars,
/// and the region-level table.
#[derive(Debug, Clone)]
pub struct DynamicsPage {
    pub cards: Vec<MetricCard>,
    pub verdict: Sustainability,
    pub by_region: Vec<Row>,
    pub table: TableView<DynamicsRecord>,
}

/// Builds the dynamics page. Only region-level records (no subregion)
/// appear in the table.
///
/// # Errors
///
/// Returns a [`PresentationError`] if the table cannot be built.
pub fn dynamics_page(
    summary: &DynamicsSummary,
    by_region: &[RegionalDynamics],
    records: &[DynamicsRecord],
    options: &PageOptions,
) -> Result<DynamicsPage, PresentationError> {
    let scale = UnitScale::ThousandsToBillions;
    let verdict = Sustainability::from_ratio(summary.sustainability_ratio);
    let net_subtitle = if summary.net_change.is_some_and(|n| n > 0.0) {
        "Net gain"
    } else {
        "Net loss"
    };
    let cards = vec![
        card("Total Growth", summary.total_growth, scale, BILLION_CU_FT, 1)
            .subtitle("Annual addition"),
        card("Total Mortality", summary.total_mortality, scale, BILLION_CU_FT, 1)
            .subtitle("Natural loss"),
        card("Total Removals", summary.total_removals, scale, BILLION_CU_FT, 1)
            .subtitle("Harvested"),
        card("Net Change", summary.net_change, scale, BILLION_CU_FT, 1).subtitle(net_subtitle),
        MetricCard::new("Sustainability Ratio", summary.sustainability_ratio)
            .decimals(2)
            .subtitle(verdict.to_string()),
    ];

    let by_region = by_region
        .iter()
        .map(|r| {
            Row::new()
                .with(NAME_FIELD, r.region.as_str())
                .with("growth", scale.apply(r.growth))
                .with("mortality", scale.apply(r.mortality))
                .with("removals", scale.apply(r.removals))
        })
        .collect();

    let region_level: Vec<DynamicsRecord> = records
        .iter()
        .filter(|r| r.subregion.is_none())
        .cloned()
        .collect();
    let columns = vec![
        Column::field(DynamicsField::Region, "Region"),
        Column::field(DynamicsField::SpeciesGroup, "Species"),
        Column::field(DynamicsField::Growth, "Growth").align(Align::Right),
        Column::field(DynamicsField::Mortality, "Mortality").align(Align::Right),
        Column::field(DynamicsField::Removals, "Removals").align(Align::Right),
        Column::field(DynamicsField::NetChange, "Net Change").align(Align::Right),
        Column::computed("sustainability_ratio", "Ratio", |r: &DynamicsRecord| {
            Value::from(sustainability_ratio(r.growth, r.mortality, r.removals))
        })
        .align(Align::Right)
        .render(ratio_cell),
    ];
    let table = TableView::new(region_level, columns, options.page_size)?;

    Ok(DynamicsPage {
        cards,
        verdict,
        by_region,
        table,
    })
}

/// Trends page: landmark-year cards, percent changes, and the national and
/// regional series.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendsPage {
    pub cards: Vec<MetricCard>,
    pub change_since_baseline: Option<f64>,
    pub change_since_low_point: Option<f64>,
    pub national: Vec<TimeSeriesPoint>,
    /// One row per year with a field per region; missing points are null.
    pub regional: Vec<Row>,
}

fn point_at(series: &[TimeSeriesPoint], year: i32) -> Option<f64> {
    series.iter().find(|p| p.year == year).and_then(|p| p.value)
}

/// Builds the trends page.
#[must_use]
pub fn trends_page(national: &[TimeSeriesPoint], regional: &[RegionalTrend]) -> TrendsPage {
    let scale = UnitScale::ThousandsToMillions;
    let baseline = point_at(national, BASELINE_YEAR);
    let low_point = point_at(national, LOW_POINT_YEAR);
    let latest = point_at(national, LATEST_YEAR);
    let change_since_baseline = percent_change(baseline, latest);
    let change_since_low_point = percent_change(low_point, latest);

    let cards = vec![
        card(&format!("{BASELINE_YEAR} Forest Area"), baseline, scale, MILLION_ACRES, 0)
            .subtitle("Estimated pre-settlement"),
        card(&format!("{LOW_POINT_YEAR} Low Point"), low_point, scale, MILLION_ACRES, 0)
            .subtitle("Historical minimum"),
        card(&format!("{LATEST_YEAR} Forest Area"), latest, scale, MILLION_ACRES, 0)
            .subtitle("Current estimate"),
        MetricCard::new(format!("Recovery Since {LOW_POINT_YEAR}"), change_since_low_point)
            .unit("%")
            .decimals(1)
            .subtitle("Forest area increase"),
    ];

    TrendsPage {
        cards,
        change_since_baseline,
        change_since_low_point,
        national: national.to_vec(),
        regional: crate::metrics::pivot_series(regional),
    }
}

/// State-by-year forest area records as a table.
///
/// # Errors
///
/// Returns [`PresentationError::InvalidPageSize`] if `options.page_size`
/// is zero.
pub fn trend_table(
    records: &[ForestAreaTrendRecord],
    options: &PageOptions,
) -> Result<TableView<ForestAreaTrendRecord>, PresentationError> {
    let columns = vec![
        Column::field(TrendField::State, "State"),
        Column::field(TrendField::Region, "Region"),
        Column::field(TrendField::Subregion, "Subregion"),
        Column::field(TrendField::Year, "Year").align(Align::Right),
        Column::field(TrendField::Area, "Forest Area").align(Align::Right),
    ];
    TableView::new(records.to_vec(), columns, options.page_size)
}

/// Classifies each state's forest area in `year`.
///
/// States without a record for `year` are left off the map.
///
/// # Errors
///
/// Returns [`PresentationError::InvalidBinCount`] if `options.bins` does
/// not fit the palette.
pub fn trend_map(
    records: &[ForestAreaTrendRecord],
    year: i32,
    options: &PageOptions,
) -> Result<Choropleth, PresentationError> {
    Choropleth::build(
        records
            .iter()
            .filter(|r| r.year == year)
            .map(|r| (r.state.clone(), r.area)),
        "thousand acres",
        options.bins,
        &options.palette,
    )
}
