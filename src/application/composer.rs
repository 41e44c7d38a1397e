// Derived-metric composer - Assembles chart specs from normalized series
use crate::domain::chart::{ChartSeries, ChartSpec};
use crate::domain::series::NormalizedSeries;

/// One installation's normalized series, ready for composition. Battery
/// series are carried only when the installation has battery entities
/// configured; an unconfigured battery is `None`, never an empty trace.
#[derive(Debug, Clone, Default)]
pub struct EnergySeries {
    pub production: NormalizedSeries,
    pub grid_import: NormalizedSeries,
    pub grid_export: NormalizedSeries,
    pub battery_out: Option<NormalizedSeries>,
    pub battery_in: Option<NormalizedSeries>,
}

#[derive(Debug, Clone, Default)]
pub struct ComposedCharts {
    pub charts: Vec<ChartSpec>,
    pub notices: Vec<String>,
}

/// Solar energy actually consumed on site: production minus grid export,
/// aligned by bucket. With no export data the whole production is assumed
/// consumed and passed through untouched. Present-but-empty export behaves
/// exactly like absent export.
pub fn consumed_solar(
    production: &NormalizedSeries,
    grid_export: &NormalizedSeries,
) -> NormalizedSeries {
    if grid_export.is_empty() {
        production.clone()
    } else {
        production.subtract(grid_export)
    }
}

/// Build the two charts for one installation: solar production on its own,
/// and the combined energy-usage chart with export and battery-charge
/// traces pre-negated for stacked rendering.
pub fn compose(bundle: &EnergySeries) -> ComposedCharts {
    let mut composed = ComposedCharts::default();

    if bundle.production.is_empty() {
        composed
            .notices
            .push("No solar production data for the selected period".to_string());
    } else {
        composed.charts.push(ChartSpec::new(
            "solar_production",
            "PV Production",
            vec![ChartSeries::positive("Solar Production", &bundle.production)],
        ));
    }

    // The usage chart needs both production and grid import to be meaningful.
    if bundle.production.is_empty() || bundle.grid_import.is_empty() {
        composed
            .notices
            .push("No energy usage data for the selected period".to_string());
        return composed;
    }

    let mut series = vec![
        ChartSeries::positive(
            "Consumed Solar",
            &consumed_solar(&bundle.production, &bundle.grid_export),
        ),
        ChartSeries::positive("Grid Import", &bundle.grid_import),
    ];

    if !bundle.grid_export.is_empty() {
        series.push(ChartSeries::negated("Grid Export", &bundle.grid_export));
    }

    if let (Some(out), Some(into)) = (&bundle.battery_out, &bundle.battery_in) {
        if !out.is_empty() && !into.is_empty() {
            series.push(ChartSeries::positive("Energy from Battery", out));
            series.push(ChartSeries::negated("Energy to Battery", into));
        }
    }

    composed
        .charts
        .push(ChartSpec::new("energy_usage", "Energy Usage", series));

    composed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::TickFormat;
    use crate::domain::series::NormalizedPoint;
    use chrono::{DateTime, FixedOffset, TimeZone};

    fn at(d: u32, h: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, d, h, 0, 0)
            .unwrap()
    }

    fn points(values: &[(u32, u32, f64)]) -> NormalizedSeries {
        NormalizedSeries::new(
            values
                .iter()
                .map(|(d, h, v)| NormalizedPoint::new(at(*d, *h), *v))
                .collect(),
        )
    }

    #[test]
    fn test_consumed_solar_without_export_is_production() {
        let production = points(&[(1, 11, 2.0), (1, 12, 3.0)]);
        let result = consumed_solar(&production, &NormalizedSeries::default());
        assert_eq!(result, production);
    }

    #[test]
    fn test_consumed_solar_subtracts_on_shared_buckets_only() {
        let production = points(&[(1, 11, 2.0), (1, 12, 3.0), (1, 13, 4.0)]);
        let export = points(&[(1, 12, 1.0), (1, 13, 4.0)]);

        let result = consumed_solar(&production, &export);
        assert_eq!(result, points(&[(1, 12, 2.0), (1, 13, 0.0)]));
    }

    #[test]
    fn test_compose_without_battery_omits_battery_traces() {
        let bundle = EnergySeries {
            production: points(&[(1, 11, 2.0)]),
            grid_import: points(&[(1, 11, 1.0)]),
            grid_export: points(&[(1, 11, 0.5)]),
            battery_out: None,
            battery_in: None,
        };

        let composed = compose(&bundle);
        assert_eq!(composed.charts.len(), 2);

        let usage = &composed.charts[1];
        let names: Vec<&str> = usage.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Consumed Solar", "Grid Import", "Grid Export"]);
    }

    #[test]
    fn test_compose_with_battery_negates_charge_trace() {
        let bundle = EnergySeries {
            production: points(&[(1, 11, 2.0)]),
            grid_import: points(&[(1, 11, 1.0)]),
            grid_export: points(&[(1, 11, 0.5)]),
            battery_out: Some(points(&[(1, 11, 0.3)])),
            battery_in: Some(points(&[(1, 11, 0.4)])),
        };

        let composed = compose(&bundle);
        let usage = &composed.charts[1];

        let to_battery = usage
            .series
            .iter()
            .find(|s| s.name == "Energy to Battery")
            .unwrap();
        assert!(to_battery.negated);
        assert_eq!(to_battery.points[0].delta, -0.4);

        let from_battery = usage
            .series
            .iter()
            .find(|s| s.name == "Energy from Battery")
            .unwrap();
        assert!(!from_battery.negated);
        assert_eq!(from_battery.points[0].delta, 0.3);
    }

    #[test]
    fn test_compose_without_production_yields_notices_only() {
        let bundle = EnergySeries {
            grid_import: points(&[(1, 11, 1.0)]),
            ..EnergySeries::default()
        };

        let composed = compose(&bundle);
        assert!(composed.charts.is_empty());
        assert_eq!(composed.notices.len(), 2);
    }

    #[test]
    fn test_compose_multi_day_range_picks_date_ticks() {
        let bundle = EnergySeries {
            production: points(&[(1, 11, 2.0), (3, 12, 3.0)]),
            grid_import: points(&[(1, 11, 1.0), (3, 12, 1.0)]),
            ..EnergySeries::default()
        };

        let composed = compose(&bundle);
        for chart in &composed.charts {
            assert_eq!(chart.tick_format, TickFormat::DateHour);
            let range = chart.range.unwrap();
            assert_eq!(range.start, at(1, 0));
        }
    }
}
