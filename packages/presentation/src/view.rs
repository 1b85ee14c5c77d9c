//! Metric cards and fetch-scoped view state.

use std::fmt;

use serde::Serialize;

use crate::value::{UNAVAILABLE, format_fixed, format_grouped};

/// A headline number with its title and unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: String,
    /// Display value, already scaled to `unit`.
    pub value: Option<f64>,
    pub unit: Option<String>,
    /// Fixed number of fractional digits; `None` groups thousands and
    /// shows at most one fractional digit.
    pub decimals: Option<usize>,
    pub subtitle: Option<String>,
}

impl MetricCard {
    pub fn new(title: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            title: title.into(),
            value,
            unit: None,
            decimals: None,
            subtitle: None,
        }
    }

    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    #[must_use]
    pub const fn decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }

    #[must_use]
    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// The formatted value. A reported zero is shown as a number; only a
    /// missing value shows [`UNAVAILABLE`].
    #[must_use]
    pub fn display_value(&self) -> String {
        match (self.value, self.decimals) {
            (None, _) => UNAVAILABLE.to_string(),
            (Some(v), Some(decimals)) => format_fixed(v, decimals),
            (Some(v), None) => format_grouped(v, 1),
        }
    }
}

impl fmt::Display for MetricCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.display_value())?;
        if let Some(unit) = &self.unit {
            write!(f, " {unit}")?;
        }
        if let Some(subtitle) = &self.subtitle {
            write!(f, " ({subtitle})")?;
        }
        Ok(())
    }
}

/// What a fetch-backed section of a page should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState<'a, T> {
    /// The fetch failed.
    Error(&'a str),
    /// The fetch is in flight.
    Loading,
    /// The fetch succeeded with nothing to show.
    Empty,
    /// Data to render.
    Ready(&'a T),
}

/// The data, loading flag, and error of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedView<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> Default for ScopedView<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

impl<T> ScopedView<T> {
    /// A view with a fetch in flight.
    #[must_use]
    pub const fn loading() -> Self {
        Self {
            loading: true,
            error: None,
            data: None,
        }
    }

    /// A view holding the outcome of a completed fetch.
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self {
                loading: false,
                error: None,
                data: Some(data),
            },
            Err(e) => Self {
                loading: false,
                error: Some(e.to_string()),
                data: None,
            },
        }
    }

    /// Resolves the view with precedence error > loading > empty > ready.
    /// Data counts as empty when absent.
    #[must_use]
    pub fn state(&self) -> ViewState<'_, T> {
        self.state_by(|_| false)
    }

    /// Like [`Self::state`], also treating data for which `is_empty`
    /// returns `true` as empty.
    pub fn state_by(&self, is_empty: impl FnOnce(&T) -> bool) -> ViewState<'_, T> {
        if let Some(error) = &self.error {
            return ViewState::Error(error);
        }
        if self.loading {
            return ViewState::Loading;
        }
        match &self.data {
            Some(data) if !is_empty(data) => ViewState::Ready(data),
            _ => ViewState::Empty,
        }
    }
}

impl<T> ScopedView<Vec<T>> {
    /// [`Self::state`] with an empty list counted as empty.
    #[must_use]
    pub fn list_state(&self) -> ViewState<'_, Vec<T>> {
        self.state_by(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_card_shows_glyph_and_zero_shows_number() {
        assert_eq!(MetricCard::new("Growth", None).display_value(), UNAVAILABLE);
        assert_eq!(
            MetricCard::new("Growth", Some(0.0)).decimals(1).display_value(),
            "0.0"
        );
        assert_eq!(MetricCard::new("Growth", Some(0.0)).display_value(), "0");
    }

    #[test]
    fn card_formats_with_unit_and_subtitle() {
        let card = MetricCard::new("Total Forest Land", Some(765.489))
            .decimals(1)
            .unit("million acres")
            .subtitle("All forest land");
        assert_eq!(
            card.to_string(),
            "Total Forest Land: 765.5 million acres (All forest land)"
        );
        assert_eq!(
            MetricCard::new("States", Some(12_345.0)).display_value(),
            "12,345"
        );
    }

    #[test]
    fn error_takes_precedence_over_everything() {
        let view = ScopedView {
            loading: true,
            error: Some("HTTP 500".to_string()),
            data: Some(vec![1]),
        };
        assert_eq!(view.list_state(), ViewState::Error("HTTP 500"));
    }

    #[test]
    fn loading_beats_stale_data() {
        let view = ScopedView {
            loading: true,
            error: None,
            data: Some(vec![1]),
        };
        assert_eq!(view.list_state(), ViewState::Loading);
    }

    #[test]
    fn empty_and_ready() {
        let empty: ScopedView<Vec<i32>> = ScopedView::from_result(Ok::<_, String>(Vec::new()));
        assert_eq!(empty.list_state(), ViewState::Empty);
        assert_eq!(ScopedView::<i32>::default().state(), ViewState::Empty);

        let ready = ScopedView::from_result(Ok::<_, String>(vec![3]));
        assert_eq!(ready.list_state(), ViewState::Ready(&vec![3]));

        let failed: ScopedView<i32> = ScopedView::from_result(Err("timeout"));
        assert_eq!(failed.state(), ViewState::Error("timeout"));
        assert_eq!(ScopedView::<i32>::loading().state(), ViewState::Loading);
    }
}
