//! Derived-metric pipeline.
//!
//! Pure functions that turn raw record values into display values: unit
//! scaling, percentages, ratios, aggregation, and top-N selection. Every
//! function takes and returns `Option<f64>` so that "not reported" flows
//! through unchanged. A zero or missing denominator produces `None`, never
//! `NaN`, infinity, or a silent zero.
//!
//! Declared derivations ([`DerivedMetric`]) are validated against the
//! record set before any row is computed: a derivation naming a field that
//! no record carries is a configuration error, not a column of nulls.

use std::collections::BTreeSet;
use std::fmt;

use forest_dash_forest_models::RegionalTrend;
use serde::{Deserialize, Serialize};

use crate::PresentationError;
use crate::record::{Record, Row, validate_fields};
use crate::value::{CompareMode, SortDirection, Value, sort_order};

/// Scale factor from the published unit to the displayed unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UnitScale {
    /// Display in the published unit.
    Identity,
    /// Thousand acres (or cubic feet) to millions.
    ThousandsToMillions,
    /// Thousand cubic feet to billions.
    ThousandsToBillions,
    /// Any other divisor.
    Custom(f64),
}

impl UnitScale {
    /// The divisor applied to raw values.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Identity => 1.0,
            Self::ThousandsToMillions => 1_000.0,
            Self::ThousandsToBillions => 1_000_000.0,
            Self::Custom(factor) => factor,
        }
    }

    /// Converts a raw value, propagating `None`.
    #[must_use]
    pub fn apply(self, raw: Option<f64>) -> Option<f64> {
        scale(raw, self.factor())
    }
}

/// Returns `raw / factor`, or `None` when `raw` is missing or the result
/// is not finite.
#[must_use]
pub fn scale(raw: Option<f64>, factor: f64) -> Option<f64> {
    finite(raw? / factor)
}

/// Returns `part / total * 100`.
///
/// `None` when either side is missing or `total` is zero.
#[must_use]
pub fn percentage_of(part: Option<f64>, total: Option<f64>) -> Option<f64> {
    ratio(part, total).map(|r| r * 100.0)
}

/// Returns `numerator / denominator` with the same null and zero policy as
/// [`percentage_of`].
#[must_use]
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let denominator = denominator?;
    if denominator == 0.0 {
        return None;
    }
    finite(numerator? / denominator)
}

/// Growth relative to everything that leaves the stock:
/// `growth / (mortality + removals)`.
///
/// A value of at least 1.0 means growth keeps up with losses.
#[must_use]
pub fn sustainability_ratio(
    growth: Option<f64>,
    mortality: Option<f64>,
    removals: Option<f64>,
) -> Option<f64> {
    ratio(growth, sum_all([mortality, removals]))
}

/// Percent change from `from` to `to`: `(to - from) / from * 100`.
#[must_use]
pub fn percent_change(from: Option<f64>, to: Option<f64>) -> Option<f64> {
    let from = from?;
    percentage_of(Some(to? - from), Some(from))
}

/// Sums values that must all be reported; any `None` makes the sum `None`.
#[must_use]
pub fn sum_all<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    values.into_iter().try_fold(0.0, |acc, v| v.map(|v| acc + v))
}

/// Sums the reported values, skipping nulls. `None` when nothing was
/// reported.
#[must_use]
pub fn sum_reported<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// Sums `field` across `records`, skipping nulls.
///
/// # Errors
///
/// Returns [`PresentationError::UnknownField`] if no record carries
/// `field`.
pub fn sum_field<R: Record>(
    records: &[R],
    field: &R::Field,
) -> Result<Option<f64>, PresentationError> {
    validate_fields(records, std::slice::from_ref(field))?;
    Ok(sum_reported(records.iter().map(|r| r.number(field))))
}

/// A group produced by [`group_sum`].
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    /// Display form of the grouping value.
    pub key: String,
    /// Sum of the reported values in the group.
    pub total: Option<f64>,
    /// Number of records in the group.
    pub count: usize,
}

/// Aggregates `value_field` across the distinct values of `key_field`,
/// keeping groups in first-seen order.
///
/// # Errors
///
/// Returns [`PresentationError::UnknownField`] if no record carries either
/// field.
pub fn group_sum<R: Record>(
    records: &[R],
    key_field: &R::Field,
    value_field: &R::Field,
) -> Result<Vec<GroupTotal>, PresentationError> {
    validate_fields(records, &[key_field.clone(), value_field.clone()])?;

    let mut groups: Vec<GroupTotal> = Vec::new();
    for record in records {
        let key = record.value(key_field).display();
        let value = record.number(value_field);
        if let Some(group) = groups.iter_mut().find(|g| g.key == key) {
            group.total = sum_reported([group.total, value]);
            group.count += 1;
        } else {
            groups.push(GroupTotal {
                key,
                total: value,
                count: 1,
            });
        }
    }
    Ok(groups)
}

/// Returns the first `n` records ordered by `field` descending.
///
/// The sort is stable and nulls come last, so records with an unreported
/// value are only selected when fewer than `n` records report one.
///
/// # Errors
///
/// Returns [`PresentationError::UnknownField`] if no record carries
/// `field`.
pub fn top_n<'a, R: Record>(
    records: &'a [R],
    field: &R::Field,
    n: usize,
) -> Result<Vec<&'a R>, PresentationError> {
    validate_fields(records, std::slice::from_ref(field))?;

    let mut keyed: Vec<(Value, &R)> = records.iter().map(|r| (r.value(field), r)).collect();
    let mode = CompareMode::for_values(keyed.iter().map(|(v, _)| v));
    keyed.sort_by(|a, b| sort_order(&a.0, &b.0, mode, SortDirection::Descending));
    Ok(keyed.into_iter().take(n).map(|(_, r)| r).collect())
}

/// A category's value and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub category: String,
    pub value: Option<f64>,
    pub percentage: Option<f64>,
}

/// Computes each category's share of the sum of reported values.
#[must_use]
pub fn share_breakdown<I, S>(items: I) -> Vec<Share>
where
    I: IntoIterator<Item = (S, Option<f64>)>,
    S: Into<String>,
{
    let items: Vec<(String, Option<f64>)> =
        items.into_iter().map(|(c, v)| (c.into(), v)).collect();
    let total = sum_reported(items.iter().map(|(_, v)| *v));
    items
        .into_iter()
        .map(|(category, value)| Share {
            percentage: percentage_of(value, total),
            category,
            value,
        })
        .collect()
}

/// Field name of the year column produced by [`pivot_series`].
pub const YEAR_FIELD: &str = "year";

/// Pivots named yearly series into one [`Row`] per year.
///
/// Years are the union across all series, ascending. Each row carries the
/// year plus one field per series name; a series without a point for that
/// year contributes a null, never a zero.
#[must_use]
pub fn pivot_series(series: &[RegionalTrend]) -> Vec<Row> {
    let years: BTreeSet<i32> = series
        .iter()
        .flat_map(|s| s.data.iter().map(|p| p.year))
        .collect();

    years
        .into_iter()
        .map(|year| {
            series.iter().fold(Row::new().with(YEAR_FIELD, year), |row, s| {
                row.with(s.name.clone(), s.value_at(year))
            })
        })
        .collect()
}

/// How a derived value is computed from a record's fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Derivation<F> {
    /// `field / scale.factor()`.
    Scale { field: F, scale: UnitScale },
    /// `part / total * 100`.
    PercentOf { part: F, total: F },
    /// `numerator / (denominators summed)`; every denominator must be
    /// reported.
    Ratio { numerator: F, denominators: Vec<F> },
}

impl<F: Clone> Derivation<F> {
    fn fields(&self) -> Vec<F> {
        match self {
            Self::Scale { field, .. } => vec![field.clone()],
            Self::PercentOf { part, total } => vec![part.clone(), total.clone()],
            Self::Ratio {
                numerator,
                denominators,
            } => std::iter::once(numerator.clone())
                .chain(denominators.iter().cloned())
                .collect(),
        }
    }

    fn compute<R: Record<Field = F>>(&self, record: &R) -> Option<f64> {
        match self {
            Self::Scale { field, scale } => scale.apply(record.number(field)),
            Self::PercentOf { part, total } => {
                percentage_of(record.number(part), record.number(total))
            }
            Self::Ratio {
                numerator,
                denominators,
            } => ratio(
                record.number(numerator),
                sum_all(denominators.iter().map(|d| record.number(d))),
            ),
        }
    }
}

/// A named derivation, producing one extra field per record.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetric<F> {
    /// Name of the derived field.
    pub name: &'static str,
    pub derivation: Derivation<F>,
}

impl<F> DerivedMetric<F> {
    #[must_use]
    pub const fn new(name: &'static str, derivation: Derivation<F>) -> Self {
        Self { name, derivation }
    }
}

/// Field of an [`Enriched`] record: either a raw field of the wrapped
/// record or a derived field by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EnrichedField<F> {
    Raw(F),
    Derived(&'static str),
}

impl<F: fmt::Display> fmt::Display for EnrichedField<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(field) => write!(f, "{field}"),
            Self::Derived(name) => f.write_str(name),
        }
    }
}

/// A record plus the values derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Enriched<R> {
    pub record: R,
    derived: Vec<(&'static str, Option<f64>)>,
}

impl<R> Enriched<R> {
    /// Returns a derived value by name. `None` covers both an unknown name
    /// and an unavailable value; use [`Record::get`] to tell them apart.
    #[must_use]
    pub fn derived(&self, name: &str) -> Option<f64> {
        self.derived
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| *v)
    }
}

impl<R: Record> Record for Enriched<R> {
    type Field = EnrichedField<R::Field>;

    fn get(&self, field: &Self::Field) -> Option<Value> {
        match field {
            EnrichedField::Raw(raw) => self.record.get(raw),
            EnrichedField::Derived(name) => self
                .derived
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| Value::from(*v)),
        }
    }
}

/// Applies `metrics` to every record.
///
/// # Errors
///
/// Returns [`PresentationError::UnknownField`] if any derivation references
/// a field that no record carries. Nothing is computed in that case.
pub fn derive<R: Record + Clone>(
    records: &[R],
    metrics: &[DerivedMetric<R::Field>],
) -> Result<Vec<Enriched<R>>, PresentationError> {
    let fields: Vec<R::Field> = metrics.iter().flat_map(|m| m.derivation.fields()).collect();
    validate_fields(records, &fields)?;

    log::debug!(
        "Deriving {} metric(s) over {} record(s)",
        metrics.len(),
        records.len()
    );

    Ok(records
        .iter()
        .map(|record| Enriched {
            derived: metrics
                .iter()
                .map(|m| (m.name, m.derivation.compute(record)))
                .collect(),
            record: record.clone(),
        })
        .collect())
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use forest_dash_forest_models::TimeSeriesPoint;

    use super::*;

    fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn percentage_of_null_part_is_null() {
        assert_eq!(percentage_of(None, Some(100.0)), None);
    }

    #[test]
    fn percentage_of_zero_total_is_null() {
        assert_eq!(percentage_of(Some(50.0), Some(0.0)), None);
        assert_eq!(percentage_of(Some(50.0), None), None);
        approx(percentage_of(Some(50.0), Some(200.0)), 25.0);
    }

    #[test]
    fn sustainability_ratio_divides_by_total_losses() {
        approx(
            sustainability_ratio(Some(120.0), Some(40.0), Some(30.0)),
            120.0 / 70.0,
        );
        assert_eq!(sustainability_ratio(Some(120.0), None, Some(30.0)), None);
        assert_eq!(sustainability_ratio(Some(120.0), Some(0.0), Some(0.0)), None);
    }

    #[test]
    fn scaling_propagates_null_and_rejects_zero_factor() {
        approx(UnitScale::ThousandsToMillions.apply(Some(766_000.0)), 766.0);
        assert_eq!(UnitScale::ThousandsToBillions.apply(None), None);
        assert_eq!(scale(Some(1.0), 0.0), None);
    }

    #[test]
    fn percent_change_needs_nonzero_base() {
        approx(percent_change(Some(100.0), Some(150.0)), 50.0);
        assert_eq!(percent_change(Some(0.0), Some(10.0)), None);
        assert_eq!(percent_change(None, Some(10.0)), None);
    }

    #[test]
    fn sum_reported_skips_nulls_but_keeps_zero() {
        assert_eq!(sum_reported([Some(1.0), None, Some(2.0)]), Some(3.0));
        assert_eq!(sum_reported([None, None]), None);
        assert_eq!(sum_reported([Some(0.0), None]), Some(0.0));
        assert_eq!(sum_all([Some(1.0), None]), None);
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("state", "A").with("region", "North").with("v", 5.0),
            Row::new().with("state", "B").with("region", "South").with("v", None::<f64>),
            Row::new().with("state", "C").with("region", "North").with("v", 9.0),
            Row::new().with("state", "D").with("region", "South").with("v", 5.0),
        ]
    }

    #[test]
    fn top_n_is_descending_stable_and_nulls_last() {
        let rows = rows();
        let top = top_n(&rows, &"v".to_string(), 4).unwrap();
        let states: Vec<String> = top
            .iter()
            .map(|r| r.value(&"state".to_string()).display())
            .collect();
        assert_eq!(states, vec!["C", "A", "D", "B"]);
        assert_eq!(top_n(&rows, &"v".to_string(), 1).unwrap().len(), 1);
    }

    #[test]
    fn top_n_over_mixed_values_uses_one_order() {
        let rows: Vec<Row> = (0..60)
            .map(|i| {
                let v = match i % 4 {
                    0 => Value::Number(f64::from(i)),
                    1 => Value::Text((i * 7 % 13).to_string()),
                    2 => Value::Null,
                    _ => Value::Number(f64::from(i % 11)),
                };
                Row::new().with("state", i).with("v", v)
            })
            .collect();
        let top = top_n(&rows, &"v".to_string(), 60).unwrap();
        assert_eq!(top.len(), 60);
        assert!(top[45..].iter().all(|r| r.value(&"v".to_string()).is_null()));
        // by string form "9" beats "56"; equal keys keep input order
        let leaders: Vec<Value> = top[..3].iter().map(|r| r.value(&"v".to_string())).collect();
        assert_eq!(
            leaders,
            vec![Value::from("9"), Value::Number(9.0), Value::from("9")]
        );
    }

    #[test]
    fn top_n_on_unknown_field_fails_loudly() {
        assert!(matches!(
            top_n(&rows(), &"nope".to_string(), 3),
            Err(PresentationError::UnknownField { .. })
        ));
    }

    #[test]
    fn group_sum_keeps_first_seen_order() {
        let groups = group_sum(&rows(), &"region".to_string(), &"v".to_string()).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "North");
        assert_eq!(groups[0].total, Some(14.0));
        assert_eq!(groups[1].key, "South");
        assert_eq!(groups[1].total, Some(5.0));
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn share_breakdown_uses_reported_total() {
        let shares = share_breakdown([("a", Some(30.0)), ("b", Some(10.0)), ("c", None)]);
        approx(shares[0].percentage, 75.0);
        approx(shares[1].percentage, 25.0);
        assert_eq!(shares[2].percentage, None);
    }

    #[test]
    fn pivot_series_fills_missing_years_with_null() {
        let series = vec![
            RegionalTrend {
                name: "North".to_string(),
                data: vec![
                    TimeSeriesPoint { year: 1907, value: Some(1.0) },
                    TimeSeriesPoint { year: 2022, value: Some(2.0) },
                ],
            },
            RegionalTrend {
                name: "South".to_string(),
                data: vec![TimeSeriesPoint { year: 2022, value: Some(3.0) }],
            },
        ];
        let rows = pivot_series(&series);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].number(&YEAR_FIELD.to_string()), Some(1907.0));
        assert_eq!(rows[0].get(&"South".to_string()), Some(Value::Null));
        assert_eq!(rows[1].number(&"South".to_string()), Some(3.0));
    }

    #[test]
    fn derive_adds_named_fields() {
        let rows = vec![
            Row::new().with("g", 120.0).with("m", 40.0).with("r", 30.0),
            Row::new().with("g", 10.0).with("m", None::<f64>).with("r", 5.0),
        ];
        let metrics = vec![
            DerivedMetric::new(
                "ratio",
                Derivation::Ratio {
                    numerator: "g".to_string(),
                    denominators: vec!["m".to_string(), "r".to_string()],
                },
            ),
            DerivedMetric::new(
                "g_millions",
                Derivation::Scale {
                    field: "g".to_string(),
                    scale: UnitScale::ThousandsToMillions,
                },
            ),
        ];
        let enriched = derive(&rows, &metrics).unwrap();
        approx(enriched[0].derived("ratio"), 120.0 / 70.0);
        assert_eq!(enriched[1].derived("ratio"), None);
        assert_eq!(
            enriched[1].get(&EnrichedField::Derived("ratio")),
            Some(Value::Null)
        );
        assert_eq!(enriched[1].get(&EnrichedField::Derived("unknown")), None);
        approx(enriched[0].derived("g_millions"), 0.12);
    }

    #[test]
    fn derive_rejects_unknown_field_before_computing() {
        let rows = vec![Row::new().with("g", 1.0)];
        let metrics = vec![DerivedMetric::new(
            "pct",
            Derivation::PercentOf {
                part: "g".to_string(),
                total: "typo".to_string(),
            },
        )];
        assert_eq!(
            derive(&rows, &metrics),
            Err(PresentationError::UnknownField {
                field: "typo".to_string()
            })
        );
    }
}
