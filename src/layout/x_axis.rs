use tracing::trace;

use crate::api::config::{ChartConfig, YPosition};
use crate::core::data::SCATTER_HEADROOM;
use crate::core::{ChartData, Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::layout::labels::{Label, LabelRole};
use crate::layout::text::TextMeasurer;

/// Vertical offset of freshly placed x labels below the chart bottom.
pub const X_LABEL_OFFSET: f64 = 10.0;

const STRIDE_EPSILON: f64 = 1e-9;

/// Inputs shared by every x-axis provider.
#[derive(Clone, Copy)]
pub struct XAxisContext<'a> {
    pub data: &'a ChartData,
    pub config: &'a ChartConfig,
    /// Rectangle framed by the axis lines.
    pub chart_rect: Rect,
    pub y_axis_position: YPosition,
    /// Width kept free for the average badge; 0 when the badge is hidden.
    pub average_reserve: f64,
    pub show_average_line: bool,
    pub measurer: &'a dyn TextMeasurer,
}

impl std::fmt::Debug for XAxisContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XAxisContext")
            .field("chart_rect", &self.chart_rect)
            .field("y_axis_position", &self.y_axis_position)
            .field("average_reserve", &self.average_reserve)
            .field("show_average_line", &self.show_average_line)
            .finish_non_exhaustive()
    }
}

impl XAxisContext<'_> {
    fn label(&self, text: String, x: f64) -> Label {
        let size = self
            .measurer
            .measure(&text, self.config.axes_labels.font);
        Label::new(
            text,
            size,
            Point::new(x - size.width / 2.0, self.chart_rect.max_y() + X_LABEL_OFFSET),
            LabelRole::XLabel,
        )
    }
}

/// Tick positions and labels of one x axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XAxisTicks {
    /// Absolute x of every tick and dashed vertical.
    pub positions: Vec<f64>,
    pub labels: Vec<Label>,
}

/// Computes the x ticks and labels for one chart kind.
pub trait XAxisProvider {
    fn ticks(&self, context: &XAxisContext<'_>) -> ChartResult<XAxisTicks>;

    fn x_positions(&self, context: &XAxisContext<'_>) -> ChartResult<Vec<f64>> {
        self.ticks(context).map(|ticks| ticks.positions)
    }

    fn labels(&self, context: &XAxisContext<'_>) -> ChartResult<Vec<Label>> {
        self.ticks(context).map(|ticks| ticks.labels)
    }
}

/// Bar cells draw their own labels and ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BarXAxis;

impl XAxisProvider for BarXAxis {
    fn ticks(&self, _context: &XAxisContext<'_>) -> ChartResult<XAxisTicks> {
        Ok(XAxisTicks::default())
    }
}

/// One tick per entry, spread over the width left by the average badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineXAxis;

impl XAxisProvider for LineXAxis {
    fn ticks(&self, context: &XAxisContext<'_>) -> ChartResult<XAxisTicks> {
        let entries = &context.data.entries;
        let mut ticks = XAxisTicks::default();
        if entries.is_empty() {
            return Ok(ticks);
        }

        let chart_width = context.chart_rect.width;
        let chart_left = context.chart_rect.min_x();
        let (start, useful_width) = if context.show_average_line {
            let start = match context.y_axis_position {
                YPosition::Left => 0.0,
                YPosition::Right => context.average_reserve,
            };
            (start, chart_width - context.average_reserve)
        } else {
            (0.0, chart_width)
        };

        // A lone entry sits on the axis: the left axis drops it as the last
        // label, the right axis as the one at x = 0.
        if entries.len() < 2 {
            if context.y_axis_position == YPosition::Right && start != 0.0 {
                ticks
                    .labels
                    .push(context.label(entries[0].name.clone(), chart_left + start));
                ticks.positions.push(chart_left + start);
            }
            return Ok(ticks);
        }

        let count = entries.len() - 1;
        let step = useful_width / count as f64;
        let granularity = context.config.granularity_x;
        for index in 0..entries.len() {
            let x = start + step * index as f64;
            if x > chart_width + STRIDE_EPSILON {
                break;
            }
            if index >= count && context.y_axis_position == YPosition::Left {
                continue;
            }
            if x == 0.0 && context.y_axis_position == YPosition::Right {
                continue;
            }
            let keep = if granularity == 0 {
                index == 0
            } else {
                index % granularity == 0
            };
            if !keep {
                continue;
            }

            let position = chart_left + x;
            trace!(index, position, "line x tick");
            ticks
                .labels
                .push(context.label(entries[index].name.clone(), position));
            if x != 0.0 {
                ticks.positions.push(position);
            }
        }
        Ok(ticks)
    }
}

/// Evenly spaced numeric ticks over `[0, max_x * 1.1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScatterXAxis;

impl XAxisProvider for ScatterXAxis {
    fn ticks(&self, context: &XAxisContext<'_>) -> ChartResult<XAxisTicks> {
        let entries = &context.data.entries;
        if entries.iter().any(|entry| entry.x.is_none()) {
            return Err(ChartError::InvalidPlotData(
                "scatter axis needs an x value on every entry".to_owned(),
            ));
        }
        let Some(max_x) = context.data.max_x_value() else {
            return Ok(XAxisTicks::default());
        };
        let mut ticks = XAxisTicks::default();
        let granularity = context.config.granularity_x;
        let domain = max_x * SCATTER_HEADROOM;
        if granularity == 0 || !(domain.is_finite() && domain > 0.0) {
            return Ok(ticks);
        }

        let chart_width = context.chart_rect.width;
        let chart_left = context.chart_rect.min_x();
        let tick_count = domain / granularity as f64;
        let step = chart_width / tick_count;
        if !(step.is_finite() && step > 0.0) {
            return Ok(ticks);
        }

        let mut index = 0_usize;
        loop {
            let x = step * index as f64;
            if x > chart_width + STRIDE_EPSILON {
                break;
            }
            let value = granularity * index;
            index += 1;
            if value == 0 && context.y_axis_position == YPosition::Right {
                continue;
            }
            let text = match &context.data.x_formatter {
                Some(formatter) => formatter.format(value as f64),
                None => value.to_string(),
            };
            let position = chart_left + x;
            ticks.labels.push(context.label(text, position));
            ticks.positions.push(position);
        }
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::{LineXAxis, ScatterXAxis, XAxisContext, XAxisProvider};
    use crate::api::config::{ChartConfig, YPosition};
    use crate::core::{ChartData, PlotableData, Rect};
    use crate::layout::text::HeuristicTextMeasurer;

    fn context<'a>(
        data: &'a ChartData,
        config: &'a ChartConfig,
        y_axis_position: YPosition,
    ) -> XAxisContext<'a> {
        XAxisContext {
            data,
            config,
            chart_rect: Rect::new(40.0, 10.0, 300.0, 200.0),
            y_axis_position,
            average_reserve: 0.0,
            show_average_line: false,
            measurer: &HeuristicTextMeasurer,
        }
    }

    #[test]
    fn line_axis_drops_last_label_with_left_axis() {
        let data = ChartData::from_values("t", &[1.0, 2.0, 3.0, 4.0], Vec::new(), "u");
        let config = ChartConfig::default().with_granularity_x(1);
        let ticks = LineXAxis
            .ticks(&context(&data, &config, YPosition::Left))
            .expect("line ticks");
        let names: Vec<_> = ticks.labels.iter().map(|label| label.text.as_str()).collect();
        assert_eq!(names, ["1", "2", "3"]);
        assert_eq!(ticks.positions, vec![140.0, 240.0]);
    }

    #[test]
    fn line_axis_drops_first_label_with_right_axis() {
        let data = ChartData::from_values("t", &[1.0, 2.0, 3.0, 4.0], Vec::new(), "u");
        let config = ChartConfig::default().with_granularity_x(1);
        let ticks = LineXAxis
            .ticks(&context(&data, &config, YPosition::Right))
            .expect("line ticks");
        let names: Vec<_> = ticks.labels.iter().map(|label| label.text.as_str()).collect();
        assert_eq!(names, ["2", "3", "4"]);
        assert_eq!(ticks.positions, vec![140.0, 240.0, 340.0]);
    }

    #[test]
    fn zero_granularity_keeps_first_index_only() {
        let data = ChartData::from_values("t", &[1.0, 2.0, 3.0], Vec::new(), "u");
        let config = ChartConfig::default().with_granularity_x(0);
        let ticks = LineXAxis
            .ticks(&context(&data, &config, YPosition::Left))
            .expect("line ticks");
        assert_eq!(ticks.labels.len(), 1);
        assert!(ticks.positions.is_empty());
    }

    #[test]
    fn single_line_entry_is_unlabelled_beside_the_axis() {
        let data = ChartData::from_values("t", &[5.0], Vec::new(), "u");
        let config = ChartConfig::default().with_granularity_x(1);
        for position in [YPosition::Left, YPosition::Right] {
            let ticks = LineXAxis
                .ticks(&context(&data, &config, position))
                .expect("line ticks");
            assert!(ticks.labels.is_empty());
            assert!(ticks.positions.is_empty());
        }

        let mut shifted = context(&data, &config, YPosition::Right);
        shifted.show_average_line = true;
        shifted.average_reserve = 30.0;
        let ticks = LineXAxis.ticks(&shifted).expect("line ticks");
        assert_eq!(ticks.labels.len(), 1);
        assert_eq!(ticks.positions, vec![70.0]);
    }

    #[test]
    fn scatter_axis_spreads_multiples_of_granularity() {
        let entries = vec![
            PlotableData::scatter(10.0, 1.0),
            PlotableData::scatter(20.0, 2.0),
        ];
        let data = ChartData::new("s", entries, Vec::new(), "u");
        let config = ChartConfig::default().with_granularity_x(5);
        let ticks = ScatterXAxis
            .ticks(&context(&data, &config, YPosition::Left))
            .expect("scatter ticks");
        let names: Vec<_> = ticks.labels.iter().map(|label| label.text.as_str()).collect();
        assert_eq!(names, ["0", "5", "10", "15", "20"]);
    }

    #[test]
    fn scatter_axis_without_x_values_is_rejected() {
        let data = ChartData::from_values("t", &[1.0, 2.0], Vec::new(), "u");
        let config = ChartConfig::default();
        assert!(
            ScatterXAxis
                .ticks(&context(&data, &config, YPosition::Left))
                .is_err()
        );
    }
}
