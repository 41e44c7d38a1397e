// JSON views of domain dashboards for the rendering front end
use crate::domain::chart::{AxisRange, ChartSeries, ChartSpec, TickFormat};
use crate::domain::dashboard::Dashboard;
use crate::domain::series::NormalizedPoint;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub installation_id: String,
    pub title: String,
    pub charts: Vec<ChartView>,
    pub notices: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub tick_format: &'static str,
    pub hover_format: &'static str,
    pub range: Option<RangeView>,
    pub series: Vec<SeriesView>,
}

#[derive(Debug, Serialize)]
pub struct RangeView {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

#[derive(Debug, Serialize)]
pub struct SeriesView {
    pub name: String,
    pub negated: bool,
    pub points: Vec<PointView>,
}

#[derive(Debug, Serialize)]
pub struct PointView {
    pub time: DateTime<FixedOffset>,
    pub value: f64,
}

impl From<Dashboard> for DashboardView {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            installation_id: dashboard.installation_id,
            title: dashboard.title,
            charts: dashboard.charts.into_iter().map(ChartView::from).collect(),
            notices: dashboard.notices,
        }
    }
}

impl From<ChartSpec> for ChartView {
    fn from(spec: ChartSpec) -> Self {
        Self {
            id: spec.id,
            title: spec.title,
            unit: spec.unit,
            tick_format: spec.tick_format.tick_pattern(),
            hover_format: TickFormat::HOVER_PATTERN,
            range: spec.range.map(RangeView::from),
            series: spec.series.into_iter().map(SeriesView::from).collect(),
        }
    }
}

impl From<AxisRange> for RangeView {
    fn from(range: AxisRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

impl From<ChartSeries> for SeriesView {
    fn from(series: ChartSeries) -> Self {
        Self {
            name: series.name,
            negated: series.negated,
            points: series.points.into_iter().map(PointView::from).collect(),
        }
    }
}

impl From<NormalizedPoint> for PointView {
    fn from(point: NormalizedPoint) -> Self {
        Self {
            time: point.bucket,
            value: point.delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::NormalizedSeries;
    use chrono::TimeZone;

    #[test]
    fn test_chart_view_carries_formats_and_rfc3339_times() {
        let tz = FixedOffset::east_opt(7 * 3600).unwrap();
        let bucket = tz.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
        let spec = ChartSpec::new(
            "solar_production",
            "PV Production",
            vec![ChartSeries::positive(
                "Solar Production",
                &NormalizedSeries::new(vec![NormalizedPoint::new(bucket, 2.0)]),
            )],
        );

        let view = ChartView::from(spec);
        assert_eq!(view.tick_format, "%H:%M");
        assert_eq!(view.hover_format, "%d %b %Y %H:%M");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json["series"][0]["points"][0]["time"],
            "2025-03-01T11:00:00+07:00"
        );
        assert_eq!(json["range"]["start"], "2025-03-01T00:00:00+07:00");
    }
}
