// Dashboard service - Use case for building per-installation dashboards
use crate::application::composer::{compose, EnergySeries};
use crate::application::history_repository::HistoryRepository;
use crate::domain::dashboard::Dashboard;
use crate::domain::series::{normalize, NormalizedSeries};
use crate::infrastructure::config::EntityMapping;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::sync::Arc;

/// Civil timezone of the monitored installations (WIB, UTC+7). All sample
/// timestamps and window bounds are compared in this offset.
pub fn target_timezone() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

/// Inclusive whole-day window in the target timezone: first day at 00:00
/// through last day at 23:59.
pub fn day_window(
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let tz = target_timezone();
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN);

    let start = start_date
        .and_time(NaiveTime::MIN)
        .and_local_timezone(tz)
        .single()
        .unwrap_or_else(|| DateTime::UNIX_EPOCH.with_timezone(&tz));
    let end = end_date
        .and_time(end_of_day)
        .and_local_timezone(tz)
        .single()
        .unwrap_or(start);

    (start, end)
}

/// One wired installation: its entity mapping plus the repository that
/// reaches its history API.
#[derive(Clone)]
pub struct Installation {
    pub entities: EntityMapping,
    pub repository: Arc<dyn HistoryRepository>,
}

#[derive(Clone)]
pub struct DashboardService {
    /// Insertion order drives display order on the overview.
    order: Vec<String>,
    installations: HashMap<String, Installation>,
}

impl DashboardService {
    pub fn new(installations: Vec<(String, Installation)>) -> Self {
        let order = installations.iter().map(|(id, _)| id.clone()).collect();
        Self {
            order,
            installations: installations.into_iter().collect(),
        }
    }

    pub fn installation_ids(&self) -> &[String] {
        &self.order
    }

    /// Build one installation's dashboard for the window. Only an unknown
    /// installation id is an error; fetch failures degrade to per-chart
    /// notices.
    pub async fn get_dashboard(
        &self,
        installation_id: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> anyhow::Result<Dashboard> {
        let installation = self
            .installations
            .get(installation_id)
            .ok_or_else(|| anyhow::anyhow!("unknown installation: {}", installation_id))?;

        let entities = &installation.entities;
        let repo = &installation.repository;

        let (production, grid_import, grid_export) = futures::join!(
            self.fetch_normalized(repo, &entities.production, start, end),
            self.fetch_normalized(repo, &entities.grid_import, start, end),
            self.fetch_normalized(repo, &entities.grid_export, start, end),
        );

        let (battery_out, battery_in) = match entities.battery_entities() {
            Some((out_entity, in_entity)) => {
                let (out, into) = futures::join!(
                    self.fetch_normalized(repo, out_entity, start, end),
                    self.fetch_normalized(repo, in_entity, start, end),
                );
                (Some(out), Some(into))
            }
            None => (None, None),
        };

        let composed = compose(&EnergySeries {
            production,
            grid_import,
            grid_export,
            battery_out,
            battery_in,
        });

        let title = format!(
            "{} Energy Recap {} - {}",
            installation_id,
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        );

        Ok(Dashboard::new(
            installation_id.to_string(),
            title,
            composed.charts,
            composed.notices,
        ))
    }

    /// All installations for the window, in configured order. One failing
    /// installation yields a notices-only dashboard; the others render.
    pub async fn get_all_dashboards(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Vec<Dashboard> {
        let mut dashboards = Vec::with_capacity(self.order.len());
        for id in &self.order {
            match self.get_dashboard(id, start, end).await {
                Ok(dashboard) => dashboards.push(dashboard),
                Err(e) => {
                    tracing::error!("Error building dashboard for {}: {}", id, e);
                }
            }
        }
        dashboards
    }

    /// Fetch one entity's history and resample it to hourly deltas. Any
    /// fetch failure is logged and degrades to an empty series so the rest
    /// of the dashboard still renders.
    async fn fetch_normalized(
        &self,
        repository: &Arc<dyn HistoryRepository>,
        entity_id: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> NormalizedSeries {
        match repository.fetch_history(entity_id, start, end).await {
            Ok(raw) => normalize(&raw, start, end),
            Err(e) => {
                tracing::warn!("Error fetching history for {}: {}", entity_id, e);
                NormalizedSeries::default()
            }
        }
    }
}
