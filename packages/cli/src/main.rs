#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the forest inventory dashboard.
//!
//! Each subcommand fetches what one dashboard view needs from the
//! statistics API, runs it through the presentation engine, and prints the
//! result as text.

mod config;
mod dashboard;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use forest_dash_api::HttpForestApi;
use forest_dash_forest_models::{Dataset, SpeciesGroup};
use forest_dash_presentation::filter::{FilterContext, FilterTransition};

use crate::config::DashboardConfig;
use crate::dashboard::{LatestView, TableRequest};

#[derive(Parser)]
#[command(name = "forest_dash", about = "Forest inventory dashboard")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// API base URL (overrides `FOREST_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Region name (e.g., "Pacific Coast")
    #[arg(long)]
    region: Option<String>,
    /// Subregion name; requires --region
    #[arg(long)]
    subregion: Option<String>,
    /// Full state name; requires --region
    #[arg(long)]
    state: Option<String>,
    /// Inventory year
    #[arg(long)]
    year: Option<i32>,
}

impl FilterArgs {
    fn transitions(&self) -> Vec<FilterTransition> {
        let mut transitions = Vec::new();
        if let Some(region) = &self.region {
            transitions.push(FilterTransition::SetRegion(region.clone()));
        }
        if let Some(subregion) = &self.subregion {
            transitions.push(FilterTransition::SetSubregion(subregion.clone()));
        }
        if let Some(state) = &self.state {
            transitions.push(FilterTransition::SetState(state.clone()));
        }
        if let Some(year) = self.year {
            transitions.push(FilterTransition::SetYear(year));
        }
        transitions
    }

    fn context(&self) -> FilterContext {
        let mut filter = FilterContext::new();
        for transition in self.transitions() {
            filter.apply(&transition);
        }
        filter
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List regions and their subregions
    Regions,
    /// List states, optionally within a region or subregion
    States {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print one page of a dataset's table
    Table {
        /// land-area, ownership, timber, dynamics, or trends
        dataset: Dataset,
        #[command(flatten)]
        filter: FilterArgs,
        /// Species group for dynamics (Total, Softwood, Hardwood)
        #[arg(long, default_value = "Total")]
        species: SpeciesGroup,
        /// Column key to sort by
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page (overrides `FOREST_PAGE_SIZE`)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Print a dataset's choropleth classification
    Map {
        dataset: Dataset,
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of color bins (overrides `FOREST_BIN_COUNT`)
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Print a dataset's headline cards and breakdowns
    Summary {
        dataset: Dataset,
        #[command(flatten)]
        filter: FilterArgs,
        /// Species group for dynamics (Total, Softwood, Hardwood)
        #[arg(long, default_value = "Total")]
        species: SpeciesGroup,
    },
    /// Print historical forest area landmarks and regional series
    Trends,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    log::debug!("Using API at {}", config.api_url);

    let api = HttpForestApi::new(&config.api_url, config.timeout())?;
    let views = LatestView::new();

    let result = match cli.command {
        Commands::Regions => dashboard::regions(&api).await.map(Some),
        Commands::States { filter } => dashboard::states(&api, &filter.context()).await.map(Some),
        Commands::Table {
            dataset,
            filter,
            species,
            sort,
            desc,
            page,
            page_size,
        } => {
            if let Some(size) = page_size {
                config.page_size = Some(size);
            }
            let filter = filter.context();
            dashboard::check_filter(&api, &filter).await;
            let request = TableRequest {
                sort,
                descending: desc,
                page: page.saturating_sub(1),
            };
            let options = config.page_options(dataset);
            let view = dashboard::table(&api, dataset, &filter, species, &options, &request);
            views.run(dataset, &filter, view).await
        }
        Commands::Map {
            dataset,
            filter,
            bins,
        } => {
            if let Some(bins) = bins {
                config.bins = bins;
            }
            let filter = filter.context();
            dashboard::check_filter(&api, &filter).await;
            let options = config.page_options(dataset);
            let view = dashboard::map(&api, dataset, &filter, &options);
            views.run(dataset, &filter, view).await
        }
        Commands::Summary {
            dataset,
            filter,
            species,
        } => {
            let filter = filter.context();
            dashboard::check_filter(&api, &filter).await;
            let options = config.page_options(dataset);
            let view = dashboard::summary(&api, dataset, &filter, species, &options);
            views.run(dataset, &filter, view).await
        }
        Commands::Trends => dashboard::trend_series(&api).await.map(Some),
    };

    match result {
        Ok(Some(output)) => {
            print!("{output}");
            Ok(())
        }
        Ok(None) => {
            log::debug!("View was superseded before it finished");
            Ok(())
        }
        Err(e) => {
            log::error!("{e}");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subregion_without_region_is_dropped() {
        let args = FilterArgs {
            subregion: Some("Northeast".to_string()),
            year: Some(2017),
            ..FilterArgs::default()
        };
        let filter = args.context();
        assert_eq!(filter.subregion(), None);
        assert_eq!(filter.year(), Some(2017));
    }

    #[test]
    fn flags_apply_top_down() {
        let args = FilterArgs {
            region: Some("North".to_string()),
            subregion: Some("Northeast".to_string()),
            state: Some("Maine".to_string()),
            year: None,
        };
        let filter = args.context();
        assert_eq!(filter.region(), Some("North"));
        assert_eq!(filter.subregion(), Some("Northeast"));
        assert_eq!(filter.state(), Some("Maine"));
    }

    #[test]
    fn parses_table_flags() {
        let cli = Cli::try_parse_from([
            "forest_dash",
            "table",
            "land-area",
            "--region",
            "South",
            "--sort",
            "total_forest_land",
            "--desc",
            "--page",
            "2",
        ])
        .unwrap();
        let Commands::Table {
            dataset,
            filter,
            desc,
            page,
            ..
        } = cli.command
        else {
            panic!("expected table command");
        };
        assert_eq!(dataset, Dataset::LandArea);
        assert_eq!(filter.region.as_deref(), Some("South"));
        assert!(desc);
        assert_eq!(page, 2);
    }

    #[test]
    fn desc_requires_sort() {
        assert!(Cli::try_parse_from(["forest_dash", "table", "timber", "--desc"]).is_err());
    }
}
