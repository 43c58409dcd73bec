use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::formatter::Formatter;
use crate::core::legend::Key;
use crate::error::{ChartError, ChartResult};

/// Headroom added above the tallest scatter point.
pub const SCATTER_HEADROOM: f64 = 1.1;

/// Which measure drives the y axis maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    /// Bars sized by entry total (plain or stacked).
    Bar,
    /// Bars split into one sub-bar per value.
    SideBySideBar,
    Line,
    Scatter,
}

/// One entry of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotableData {
    pub name: String,
    pub values: Vec<f64>,
    /// Horizontal value; only scatter entries carry one.
    pub x: Option<f64>,
}

impl PlotableData {
    #[must_use]
    pub fn single(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            values: vec![value],
            x: None,
        }
    }

    #[must_use]
    pub fn multi(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            x: None,
        }
    }

    #[must_use]
    pub fn scatter(x: f64, y: f64) -> Self {
        Self {
            name: x.to_string(),
            values: vec![y],
            x: Some(x),
        }
    }

    /// Sum of the values; the value itself for single entries, 0 when empty.
    #[must_use]
    pub fn total(&self) -> f64 {
        match self.values.as_slice() {
            [] => 0.0,
            [single] => *single,
            values => values.iter().sum(),
        }
    }

    #[must_use]
    pub fn max_value(&self) -> f64 {
        match self.values.as_slice() {
            [] => 0.0,
            [single] => *single,
            values => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Vertical value of a scatter entry.
    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.x.and(self.values.first().copied())
    }
}

/// Checks that every entry carries as many values as the first one.
pub fn ensure_homogeneous(entries: &[PlotableData]) -> ChartResult<()> {
    let Some(first) = entries.first() else {
        return Ok(());
    };
    let expected = first.values.len();
    match entries
        .iter()
        .enumerate()
        .find(|(_, entry)| entry.values.len() != expected)
    {
        Some((index, entry)) => Err(ChartError::NonHomogeneousValues {
            index,
            expected,
            found: entry.values.len(),
        }),
        None => Ok(()),
    }
}

/// Dataset plus the presentation metadata that travels with it.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub title: String,
    pub entries: Vec<PlotableData>,
    /// On multi-value bars the first key colours the lowest segment.
    pub legend_keys: Vec<Key>,
    pub y_unit: String,
    pub x_unit: Option<String>,
    pub y_formatter: Formatter,
    /// Only used by scatter charts; other charts label with entry names.
    pub x_formatter: Option<Formatter>,
}

impl ChartData {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        entries: Vec<PlotableData>,
        legend_keys: Vec<Key>,
        y_unit: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            entries,
            legend_keys,
            y_unit: y_unit.into(),
            x_unit: None,
            y_formatter: Formatter::default(),
            x_formatter: None,
        }
    }

    /// Single-value entries named "1", "2", ...
    #[must_use]
    pub fn from_values(
        title: impl Into<String>,
        values: &[f64],
        legend_keys: Vec<Key>,
        y_unit: impl Into<String>,
    ) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .map(|(index, value)| PlotableData::single((index + 1).to_string(), *value))
            .collect();
        Self::new(title, entries, legend_keys, y_unit)
    }

    /// Multi-value entries named "1", "2", ...
    #[must_use]
    pub fn from_value_rows(
        title: impl Into<String>,
        rows: Vec<Vec<f64>>,
        legend_keys: Vec<Key>,
        y_unit: impl Into<String>,
    ) -> Self {
        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(index, values)| PlotableData::multi((index + 1).to_string(), values))
            .collect();
        Self::new(title, entries, legend_keys, y_unit)
    }

    /// Single-value entries named after the map keys, in insertion order.
    #[must_use]
    pub fn from_named_values(
        title: impl Into<String>,
        values: &IndexMap<String, f64>,
        legend_keys: Vec<Key>,
        y_unit: impl Into<String>,
    ) -> Self {
        let entries = values
            .iter()
            .map(|(name, value)| PlotableData::single(name.clone(), *value))
            .collect();
        Self::new(title, entries, legend_keys, y_unit)
    }

    #[must_use]
    pub fn with_x_unit(mut self, x_unit: impl Into<String>) -> Self {
        self.x_unit = Some(x_unit.into());
        self
    }

    #[must_use]
    pub fn with_y_formatter(mut self, formatter: Formatter) -> Self {
        self.y_formatter = formatter;
        self
    }

    #[must_use]
    pub fn with_x_formatter(mut self, formatter: Formatter) -> Self {
        self.x_formatter = Some(formatter);
        self
    }

    /// Replaces every entry. Legend keys and units are kept.
    pub fn update_entries(&mut self, entries: Vec<PlotableData>) {
        self.entries = entries;
    }

    /// Mean of the entry totals, 0 when there are no entries.
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let total: f64 = self.entries.iter().map(PlotableData::total).sum();
        total / self.entries.len() as f64
    }

    #[must_use]
    pub fn formatted_average(&self) -> String {
        self.y_formatter.format(self.average())
    }

    /// Value count of the first entry.
    #[must_use]
    pub fn number_of_values(&self) -> usize {
        self.entries.first().map_or(0, |entry| entry.values.len())
    }

    #[must_use]
    pub fn max_individual_value(&self) -> Option<f64> {
        self.entries
            .iter()
            .flat_map(|entry| entry.values.iter().copied())
            .reduce(f64::max)
    }

    #[must_use]
    pub fn max_x_value(&self) -> Option<f64> {
        self.entries.iter().filter_map(|entry| entry.x).reduce(f64::max)
    }

    /// Top of the y axis for `kind`, before any caller override.
    #[must_use]
    pub fn max_y_value(&self, kind: ChartKind) -> Option<f64> {
        match kind {
            ChartKind::Bar => {
                if self.entries.len() < 2 {
                    return self.entries.first().map(PlotableData::total);
                }
                self.entries.iter().map(PlotableData::total).reduce(f64::max)
            }
            ChartKind::SideBySideBar => self.max_individual_value(),
            ChartKind::Line => {
                if self.entries.len() < 2 {
                    return self.entries.first().map(PlotableData::total);
                }
                self.max_individual_value()
            }
            ChartKind::Scatter => self
                .entries
                .iter()
                .map(PlotableData::y)
                .collect::<Option<Vec<_>>>()
                .and_then(|ys| ys.into_iter().reduce(f64::max))
                .map(|max| max * SCATTER_HEADROOM),
        }
    }

    /// Y step used when the caller leaves the granularity at 0.
    #[must_use]
    pub fn default_y_granularity(&self, kind: ChartKind) -> f64 {
        (self.max_y_value(kind).unwrap_or(100.0) / 3.0).floor()
    }

    /// Checks homogeneity and that every value slot has a legend key.
    pub fn validate_for_plot(&self) -> ChartResult<()> {
        ensure_homogeneous(&self.entries)?;
        let required = self.number_of_values();
        if self.legend_keys.len() < required {
            return Err(ChartError::MissingLegendKeys {
                required,
                available: self.legend_keys.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartData, ChartKind, PlotableData, ensure_homogeneous};
    use crate::error::ChartError;

    #[test]
    fn total_and_max_follow_value_count() {
        assert_eq!(PlotableData::multi("a", vec![]).total(), 0.0);
        assert_eq!(PlotableData::single("a", 7.0).total(), 7.0);
        let entry = PlotableData::multi("a", vec![2.0, 5.0, 3.0]);
        assert_eq!(entry.total(), 10.0);
        assert_eq!(entry.max_value(), 5.0);
    }

    #[test]
    fn granularity_is_a_third_of_the_largest_total() {
        let data = ChartData::from_values("t", &[12.0, 99.0, 40.0], Vec::new(), "u");
        assert_eq!(data.default_y_granularity(ChartKind::Bar), 33.0);
        assert_eq!(data.average(), 151.0 / 3.0);
    }

    #[test]
    fn scatter_max_requires_scatter_entries() {
        let data = ChartData::from_values("t", &[1.0, 2.0], Vec::new(), "u");
        assert_eq!(data.max_y_value(ChartKind::Scatter), None);
        assert_eq!(data.default_y_granularity(ChartKind::Scatter), 33.0);
    }

    #[test]
    fn mismatched_entry_is_reported_with_its_index() {
        let entries = vec![
            PlotableData::multi("a", vec![1.0, 2.0]),
            PlotableData::multi("b", vec![1.0, 2.0]),
            PlotableData::multi("c", vec![1.0]),
        ];
        let err = ensure_homogeneous(&entries).expect_err("must fail");
        assert!(matches!(
            err,
            ChartError::NonHomogeneousValues {
                index: 2,
                expected: 2,
                found: 1
            }
        ));
    }
}
