#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive data-presentation engine for the forest inventory dashboard.
//!
//! Turns raw, irregularly-shaped API records into display-ready views:
//!
//! * [`metrics`] derives unit-normalized values, percentages, ratios, and
//!   top-N selections while propagating "not reported" as a first-class
//!   value.
//! * [`binning`] fits an equal-frequency classifier used to color a
//!   choropleth; [`palette`] maps its buckets to colors.
//! * [`filter`] owns the cascading region → subregion → state selection.
//! * [`table`] sorts (stably, nulls last), paginates, and renders records.
//!
//! All of it is synchronous and side-effect free over its inputs. The only
//! mutable state is the [`filter::FilterContext`] owned by a page and the
//! sort/page cursor of each [`table::TableView`].

pub mod binning;
pub mod datasets;
pub mod filter;
pub mod metrics;
pub mod pages;
pub mod palette;
pub mod record;
pub mod table;
pub mod value;
pub mod view;

use thiserror::Error;

pub use record::{Record, Row, validate_fields};
pub use value::{SortDirection, UNAVAILABLE, Value};

/// Configuration errors raised by the presentation engine.
///
/// These indicate a programming mistake in a page declaration (a column or
/// derivation naming a field no record carries, a zero page size) and are
/// never used for missing data, which is [`Value::Null`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresentationError {
    /// A declared column or derivation references a field absent from
    /// every record of a non-empty dataset.
    #[error("Unknown field '{field}': no record in the dataset carries it")]
    UnknownField {
        /// The offending field name.
        field: String,
    },

    /// A column key was declared twice in the same table.
    #[error("Duplicate column key '{key}'")]
    DuplicateColumn {
        /// The repeated key.
        key: String,
    },

    /// A quantile scale was requested with zero bins or more bins than the
    /// palette has colors.
    #[error("Invalid bin count {requested}: expected 1..={max}")]
    InvalidBinCount {
        /// The requested bin count.
        requested: usize,
        /// The largest supported bin count.
        max: usize,
    },

    /// A table was declared with a page size of zero.
    #[error("Page size must be at least 1")]
    InvalidPageSize,
}
