// Typed chart specs handed to the rendering layer
use crate::domain::series::{NormalizedPoint, NormalizedSeries};
use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta};

/// Tick label format for the time axis, chosen once per chart from the full
/// plotted range. Hovers always carry the full date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    HourOnly,
    DateHour,
}

impl TickFormat {
    pub const HOVER_PATTERN: &'static str = "%d %b %Y %H:%M";

    /// Multi-day ranges need the date on the ticks; a single day does not.
    pub fn for_span(min: DateTime<FixedOffset>, max: DateTime<FixedOffset>) -> Self {
        if max - min > TimeDelta::days(1) {
            TickFormat::DateHour
        } else {
            TickFormat::HourOnly
        }
    }

    pub fn tick_pattern(&self) -> &'static str {
        match self {
            TickFormat::HourOnly => "%H:%M",
            TickFormat::DateHour => "%d/%m %H:%M",
        }
    }
}

/// Time-axis extent: first plotted day at 00:00 through last plotted day at
/// 23:59, in the target timezone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl AxisRange {
    pub fn spanning(min: DateTime<FixedOffset>, max: DateTime<FixedOffset>) -> Self {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);
        Self {
            start: min.with_time(NaiveTime::MIN).single().unwrap_or(min),
            end: max.with_time(end_of_day).single().unwrap_or(max),
        }
    }
}

/// One named bar trace. Negative-direction traces (grid export, energy to
/// battery) arrive with their values already negated so the renderer only
/// stacks bars.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: String,
    pub negated: bool,
    pub points: Vec<NormalizedPoint>,
}

impl ChartSeries {
    pub fn positive(name: impl Into<String>, series: &NormalizedSeries) -> Self {
        Self {
            name: name.into(),
            negated: false,
            points: series.points.clone(),
        }
    }

    pub fn negated(name: impl Into<String>, series: &NormalizedSeries) -> Self {
        Self {
            name: name.into(),
            negated: true,
            points: series
                .points
                .iter()
                .map(|p| NormalizedPoint::new(p.bucket, -p.delta))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub series: Vec<ChartSeries>,
    pub range: Option<AxisRange>,
    pub tick_format: TickFormat,
}

impl ChartSpec {
    /// Assemble a chart from its traces, deriving the axis range and tick
    /// format from the union of all plotted buckets. Range is `None` when
    /// no trace carries data.
    pub fn new(id: impl Into<String>, title: impl Into<String>, series: Vec<ChartSeries>) -> Self {
        let buckets = series.iter().flat_map(|s| s.points.iter().map(|p| p.bucket));
        let min = buckets.clone().min();
        let max = buckets.max();

        let (range, tick_format) = match (min, max) {
            (Some(min), Some(max)) => (
                Some(AxisRange::spanning(min, max)),
                TickFormat::for_span(min, max),
            ),
            _ => (None, TickFormat::HourOnly),
        };

        Self {
            id: id.into(),
            title: title.into(),
            unit: "kWh".to_string(),
            series,
            range,
            tick_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, d, h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_single_day_uses_hour_only_ticks() {
        assert_eq!(TickFormat::for_span(at(1, 8), at(1, 20)), TickFormat::HourOnly);
    }

    #[test]
    fn test_multi_day_uses_date_hour_ticks() {
        assert_eq!(TickFormat::for_span(at(1, 8), at(3, 20)), TickFormat::DateHour);
    }

    #[test]
    fn test_axis_range_snaps_to_whole_days() {
        let range = AxisRange::spanning(at(1, 11), at(2, 15));
        assert_eq!(range.start, at(1, 0));
        assert_eq!(
            range.end,
            FixedOffset::east_opt(7 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 3, 2, 23, 59, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_empty_chart_has_no_range() {
        let spec = ChartSpec::new("solar", "Solar Production", vec![]);
        assert!(spec.range.is_none());
    }

    #[test]
    fn test_negated_series_flips_values() {
        let source = NormalizedSeries::new(vec![NormalizedPoint::new(at(1, 11), 2.5)]);
        let trace = ChartSeries::negated("Export", &source);
        assert!(trace.negated);
        assert_eq!(trace.points[0].delta, -2.5);
    }
}
