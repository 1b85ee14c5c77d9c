//! Scalar cell values, display formatting, and the total sort order.

use std::cmp::Ordering;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Glyph rendered for a value that was not reported.
///
/// Distinct from the empty string so a rendered cell can always tell
/// "unavailable" apart from "reported as blank".
pub const UNAVAILABLE: &str = "—";

/// A single scalar field of a record.
///
/// `Null` means "not reported". It is never coerced to zero: it does not
/// take part in arithmetic, sorts after every reported value, and renders
/// as [`UNAVAILABLE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// A finite number.
    Number(f64),
    /// A string, passed through unchanged on display.
    Text(String),
    /// Not reported.
    #[default]
    Null,
}

impl Value {
    /// Builds a number, mapping `NaN` and infinities to [`Value::Null`].
    #[must_use]
    pub const fn number(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(value)
        } else {
            Self::Null
        }
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the numeric payload, or `None` for text and null.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) | Self::Null => None,
        }
    }

    /// Returns the text payload, or `None` for numbers and null.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Null => None,
        }
    }

    /// Formats the value for a table cell: numbers with at most one
    /// fractional digit and thousands separators, text unchanged, null as
    /// [`UNAVAILABLE`].
    #[must_use]
    pub fn display(&self) -> String {
        match self {
            Self::Number(n) => format_grouped(*n, 1),
            Self::Text(s) => s.clone(),
            Self::Null => UNAVAILABLE.to_string(),
        }
    }

    /// The string used when two values are compared lexicographically.
    fn sort_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Null => String::new(),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Null, Self::number)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Header arrow for this direction.
    #[must_use]
    pub const fn indicator(self) -> char {
        match self {
            Self::Ascending => '↑',
            Self::Descending => '↓',
        }
    }
}

/// How the reported values of one column compare with each other.
///
/// Picked once per column so every pair in a sort uses the same rule.
/// Comparing pair by pair would order `9 < 10`, `10 < "5"` and `"5" < 9`,
/// which is not an order at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareMode {
    /// Every reported value is a number.
    Numeric,
    /// At least one reported value is text; all compare by string form.
    Text,
}

impl CompareMode {
    /// Picks the mode for a column holding `values`. Nulls do not count.
    #[must_use]
    pub fn for_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        if values.into_iter().any(|v| matches!(v, Value::Text(_))) {
            Self::Text
        } else {
            Self::Numeric
        }
    }

    /// Compares two reported values under this mode.
    #[must_use]
    pub fn compare(self, a: &Value, b: &Value) -> Ordering {
        match (self, a, b) {
            (Self::Numeric, Value::Number(x), Value::Number(y)) => x.total_cmp(y),
            _ => a.sort_text().cmp(&b.sort_text()),
        }
    }
}

/// Compares two reported values: numerically when both are numbers,
/// otherwise lexicographically on their string representation.
///
/// Only a pairwise rule. Sorting a column goes through [`sort_order`] with
/// a [`CompareMode`] chosen for the whole column.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    CompareMode::for_values([a, b]).compare(a, b)
}

/// Total sort order used by tables and top-N selection.
///
/// Null values sort after every reported value in both directions. Ties
/// compare `Equal` so a stable sort keeps their original relative order.
#[must_use]
pub fn sort_order(a: &Value, b: &Value, mode: CompareMode, direction: SortDirection) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let cmp = mode.compare(a, b);
            match direction {
                SortDirection::Ascending => cmp,
                SortDirection::Descending => cmp.reverse(),
            }
        }
    }
}

/// Formats a number with thousands separators and at most
/// `max_fraction_digits` fractional digits, dropping trailing zeros.
///
/// Halves round away from zero. A value that rounds to zero renders as
/// `"0"` without a sign.
#[must_use]
pub fn format_grouped(value: f64, max_fraction_digits: u32) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }

    let scale = 10f64.powi(i32::try_from(max_fraction_digits).unwrap_or(i32::MAX));
    let scaled = (value.abs() * scale).round();
    if scaled < 1.0 {
        return "0".to_string();
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = scaled as u128;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let divisor = scale as u128;
    let whole = scaled / divisor;
    let fraction = scaled % divisor;

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if fraction > 0 {
        let width = max_fraction_digits as usize;
        let digits = format!("{fraction:0width$}");
        let _ = write!(out, ".{}", digits.trim_end_matches('0'));
    }
    out
}

/// Formats a number with exactly `decimals` fractional digits and no
/// grouping (the metric-card style).
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }
    format!("{value:.decimals$}")
}

fn group_thousands(mut n: u128) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut groups = Vec::new();
    while n > 0 {
        groups.push(n % 1000);
        n /= 1000;
    }
    let mut out = String::new();
    for (i, group) in groups.iter().rev().enumerate() {
        if i == 0 {
            let _ = write!(out, "{group}");
        } else {
            let _ = write!(out, ",{group:03}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_numbers_become_null() {
        assert_eq!(Value::number(f64::NAN), Value::Null);
        assert_eq!(Value::from(f64::INFINITY), Value::Null);
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::from(Some(2.5)), Value::Number(2.5));
    }

    #[test]
    fn display_distinguishes_null_from_empty_text() {
        assert_eq!(Value::Null.display(), UNAVAILABLE);
        assert_eq!(Value::Text(String::new()).display(), "");
        assert_ne!(Value::Null.display(), Value::Text(String::new()).display());
    }

    #[test]
    fn formats_with_one_fraction_digit_and_grouping() {
        assert_eq!(format_grouped(1_234_567.891, 1), "1,234,567.9");
        assert_eq!(format_grouped(1000.0, 1), "1,000");
        assert_eq!(format_grouped(12.04, 1), "12");
        assert_eq!(format_grouped(0.25, 1), "0.3");
        assert_eq!(format_grouped(-4321.06, 1), "-4,321.1");
        assert_eq!(format_grouped(-0.01, 1), "0");
        assert_eq!(format_grouped(0.0, 1), "0");
        assert_eq!(format_grouped(999.96, 1), "1,000");
    }

    #[test]
    fn formats_fixed_decimals() {
        assert_eq!(format_fixed(1.714_285, 2), "1.71");
        assert_eq!(format_fixed(766.0, 0), "766");
        assert_eq!(format_fixed(f64::NAN, 1), UNAVAILABLE);
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            compare_values(&Value::Number(9.0), &Value::Number(10.0)),
            Ordering::Less
        );
    }

    #[test]
    fn mixed_types_compare_as_strings() {
        // "10" < "9" lexicographically
        assert_eq!(
            compare_values(&Value::Number(10.0), &Value::Text("9".to_string())),
            Ordering::Less
        );
        assert_eq!(
            compare_values(&Value::from("Oregon"), &Value::from("Alaska")),
            Ordering::Greater
        );
    }

    #[test]
    fn null_sorts_last_in_both_directions() {
        for mode in [CompareMode::Numeric, CompareMode::Text] {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                assert_eq!(
                    sort_order(&Value::Null, &Value::Number(-1e9), mode, direction),
                    Ordering::Greater
                );
                assert_eq!(
                    sort_order(&Value::from("a"), &Value::Null, mode, direction),
                    Ordering::Less
                );
            }
        }
    }

    #[test]
    fn column_with_any_text_compares_everything_as_text() {
        let column = [Value::Number(9.0), Value::Null, Value::from("5"), Value::Number(10.0)];
        let mode = CompareMode::for_values(&column);
        assert_eq!(mode, CompareMode::Text);
        // "10" < "5" < "9": one consistent order instead of a cycle
        assert_eq!(mode.compare(&column[3], &column[2]), Ordering::Less);
        assert_eq!(mode.compare(&column[2], &column[0]), Ordering::Less);
        assert_eq!(mode.compare(&column[3], &column[0]), Ordering::Less);
    }

    #[test]
    fn all_number_column_compares_numerically() {
        let column = [Value::Number(9.0), Value::Null, Value::Number(10.0)];
        let mode = CompareMode::for_values(&column);
        assert_eq!(mode, CompareMode::Numeric);
        assert_eq!(mode.compare(&column[0], &column[2]), Ordering::Less);
        assert_eq!(CompareMode::for_values(&[Value::Null]), CompareMode::Numeric);
    }

    #[test]
    fn untagged_deserialization_maps_json_scalars() {
        let values: Vec<Value> = serde_json::from_str(r#"[1, 2.5, "x", null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::Number(1.0),
                Value::Number(2.5),
                Value::from("x"),
                Value::Null
            ]
        );
    }
}
