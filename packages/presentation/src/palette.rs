//! Color palettes and choropleth assembly.

use forest_dash_geography_models::state_abbr;
use serde::Serialize;

use crate::PresentationError;
use crate::binning::QuantileScale;
use crate::value::format_grouped;

/// Fill for states without a reported value.
pub const NO_DATA_COLOR: &str = "#e5e7eb";

/// Placeholder shown in a tooltip for a state without a reported value.
pub const TOOLTIP_UNAVAILABLE: &str = "N/A";

/// An ordered sequential color ramp, lightest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub name: &'static str,
    colors: &'static [&'static str],
}

impl Palette {
    /// The 9-step sequential green scheme used by every map.
    #[must_use]
    pub const fn greens9() -> Self {
        Self {
            name: "greens",
            colors: &[
                "#f7fcf5", "#e5f5e0", "#c7e9c0", "#a1d99b", "#74c476", "#41ab5d", "#238b45",
                "#006d2c", "#00441b",
            ],
        }
    }

    /// Number of colors in the ramp.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub const fn colors(&self) -> &'static [&'static str] {
        self.colors
    }

    /// Returns the color for `bin` of a scale with `bin_count` bins.
    ///
    /// When the scale has fewer bins than the palette has colors, the bins
    /// are spread evenly from the lightest to the darkest color. A
    /// single-bin scale uses the middle color.
    #[must_use]
    pub fn color(&self, bin: usize, bin_count: usize) -> &'static str {
        let Some(last) = self.colors.len().checked_sub(1) else {
            return NO_DATA_COLOR;
        };
        let index = match bin_count {
            0 | 1 => last / 2,
            n if n > last => bin.min(last),
            n => bin.min(n - 1) * last / (n - 1),
        };
        self.colors[index]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::greens9()
    }
}

/// One state on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethEntry {
    pub state: String,
    /// Postal abbreviation, when the name is a known state.
    pub abbr: Option<&'static str>,
    pub value: Option<f64>,
    pub bin: usize,
    pub color: &'static str,
    pub tooltip: String,
    /// Highlighted because the filter has this state selected.
    pub selected: bool,
}

/// One swatch of the map legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendItem {
    pub color: &'static str,
    /// Smallest value that falls in this bin.
    pub lower: f64,
}

/// A fully classified map ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choropleth {
    pub metric: String,
    pub entries: Vec<ChoroplethEntry>,
    pub legend: Vec<LegendItem>,
    pub scale: QuantileScale,
}

impl Choropleth {
    /// Classifies `items` (state name, value) with a quantile scale of
    /// `bins` bins and colors them from `palette`.
    ///
    /// A null value gets [`NO_DATA_COLOR`]; a reported zero is real data
    /// and takes the color of its bin.
    ///
    /// # Errors
    ///
    /// Returns [`PresentationError::InvalidBinCount`] if `bins` is zero or
    /// exceeds the palette size.
    pub fn build<I, S>(
        items: I,
        metric: &str,
        bins: usize,
        palette: &Palette,
    ) -> Result<Self, PresentationError>
    where
        I: IntoIterator<Item = (S, Option<f64>)>,
        S: Into<String>,
    {
        if bins == 0 || bins > palette.len() {
            return Err(PresentationError::InvalidBinCount {
                requested: bins,
                max: palette.len(),
            });
        }

        let items: Vec<(String, Option<f64>)> =
            items.into_iter().map(|(s, v)| (s.into(), v)).collect();
        let scale = QuantileScale::fit(items.iter().map(|(_, v)| *v), bins)?;
        let bin_count = scale.bin_count();

        let entries = items
            .into_iter()
            .map(|(state, value)| {
                let bin = scale.classify(value);
                let color = if value.is_some() {
                    palette.color(bin, bin_count)
                } else {
                    NO_DATA_COLOR
                };
                let shown = value.map_or_else(
                    || TOOLTIP_UNAVAILABLE.to_string(),
                    |v| format_grouped(v, 1),
                );
                ChoroplethEntry {
                    abbr: state_abbr(&state),
                    tooltip: format!("{state}: {shown} {metric}"),
                    state,
                    value,
                    bin,
                    color,
                    selected: false,
                }
            })
            .collect::<Vec<_>>();

        let legend = (0..bin_count)
            .filter_map(|bin| {
                scale.bounds(bin).map(|(lower, _)| LegendItem {
                    color: palette.color(bin, bin_count),
                    lower,
                })
            })
            .collect();

        log::debug!(
            "Built choropleth for '{metric}': {} state(s), {bin_count} bin(s)",
            entries.len()
        );

        Ok(Self {
            metric: metric.to_string(),
            entries,
            legend,
            scale,
        })
    }

    /// Marks the entry named `state` as selected and clears the mark on
    /// every other entry. `None` clears the selection.
    #[must_use]
    pub fn with_selection(mut self, state: Option<&str>) -> Self {
        for entry in &mut self.entries {
            entry.selected = state.is_some_and(|s| entry.state == s);
        }
        if let Some(state) = state.filter(|s| self.entry(s).is_none()) {
            log::debug!("Selected state '{state}' is not on the '{}' map", self.metric);
        }
        self
    }

    /// Entry of the selected state, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&ChoroplethEntry> {
        self.entries.iter().find(|e| e.selected)
    }

    /// Looks up a state's entry by full name.
    #[must_use]
    pub fn entry(&self, state: &str) -> Option<&ChoroplethEntry> {
        self.entries.iter().find(|e| e.state == state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_scale_uses_every_color() {
        let palette = Palette::greens9();
        let colors: Vec<&str> = (0..9).map(|b| palette.color(b, 9)).collect();
        assert_eq!(colors, palette.colors());
    }

    #[test]
    fn collapsed_scale_spreads_across_palette() {
        let palette = Palette::greens9();
        assert_eq!(palette.color(0, 2), "#f7fcf5");
        assert_eq!(palette.color(1, 2), "#00441b");
        assert_eq!(palette.color(1, 3), "#74c476");
        assert_eq!(palette.color(0, 1), "#74c476");
    }

    #[test]
    fn rejects_more_bins_than_colors() {
        let err = Choropleth::build([("Ohio", Some(1.0))], "acres", 10, &Palette::greens9());
        assert_eq!(
            err,
            Err(PresentationError::InvalidBinCount {
                requested: 10,
                max: 9
            })
        );
    }

    #[test]
    fn null_states_get_no_data_color_and_na_tooltip() {
        let map = Choropleth::build(
            [
                ("Maine", Some(1000.0)),
                ("Georgia", Some(2000.0)),
                ("Kansas", None),
            ],
            "thousand acres",
            2,
            &Palette::greens9(),
        )
        .unwrap();

        let maine = map.entry("Maine").unwrap();
        let georgia = map.entry("Georgia").unwrap();
        let kansas = map.entry("Kansas").unwrap();
        assert_eq!((maine.bin, georgia.bin, kansas.bin), (0, 1, 0));
        assert_eq!(kansas.color, NO_DATA_COLOR);
        assert_eq!(kansas.tooltip, "Kansas: N/A thousand acres");
        assert_eq!(georgia.tooltip, "Georgia: 2,000 thousand acres");
        assert_eq!(georgia.abbr, Some("GA"));
        assert_ne!(maine.color, georgia.color);
    }

    #[test]
    fn selection_highlights_one_state() {
        let map = Choropleth::build(
            [("Maine", Some(1.0)), ("Texas", Some(2.0)), ("Ohio", None)],
            "acres",
            2,
            &Palette::greens9(),
        )
        .unwrap();
        assert_eq!(map.selected(), None);

        let map = map.with_selection(Some("Texas"));
        assert_eq!(map.selected().map(|e| e.state.as_str()), Some("Texas"));
        assert_eq!(map.entries.iter().filter(|e| e.selected).count(), 1);

        let map = map.with_selection(Some("Ohio"));
        assert_eq!(map.selected().map(|e| e.state.as_str()), Some("Ohio"));
        assert!(!map.entry("Texas").unwrap().selected);

        let map = map.with_selection(Some("Guam")).with_selection(None);
        assert_eq!(map.selected(), None);
    }

    #[test]
    fn reported_zero_is_colored_not_blank() {
        let map = Choropleth::build(
            [("Nevada", Some(0.0)), ("Oregon", Some(5.0))],
            "acres",
            9,
            &Palette::greens9(),
        )
        .unwrap();
        assert_ne!(map.entry("Nevada").unwrap().color, NO_DATA_COLOR);
    }

    #[test]
    fn legend_has_one_swatch_per_effective_bin() {
        let map = Choropleth::build(
            (1..=20).map(|i| (format!("S{i}"), Some(f64::from(i)))),
            "acres",
            4,
            &Palette::greens9(),
        )
        .unwrap();
        assert_eq!(map.legend.len(), 4);
        assert!(map.legend.windows(2).all(|w| w[0].lower < w[1].lower));
        assert!((map.legend[0].lower - 1.0).abs() < f64::EPSILON);
    }
}
