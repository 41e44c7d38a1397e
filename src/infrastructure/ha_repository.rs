// Home Assistant history API repository implementation
use crate::application::history_repository::{HistoryError, HistoryRepository};
use crate::domain::sample::{RawSample, RawSeries};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::time::Duration;

/// One state-change record as the `/api/history/period` endpoint reports
/// it. Timestamps prefer `last_updated` and fall back to `last_changed`;
/// entries with neither are skipped.
#[derive(Debug, Deserialize)]
struct HistoryEntry {
    state: String,
    #[serde(default)]
    last_updated: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    last_changed: Option<DateTime<FixedOffset>>,
}

impl HistoryEntry {
    fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        self.last_updated.or(self.last_changed)
    }
}

/// The endpoint wraps each requested entity's records in its own array.
type HistoryPayload = Vec<Vec<HistoryEntry>>;

fn to_raw_series(payload: HistoryPayload) -> RawSeries {
    let samples = payload
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| entry.timestamp().map(|t| RawSample::new(t, entry.state)))
        .collect();
    RawSeries::new(samples)
}

#[derive(Debug, Clone)]
pub struct HomeAssistantRepository {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl HomeAssistantRepository {
    pub fn new(base_url: &str, token: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            base_url: normalize_base_url(base_url),
            token: token.to_string(),
            client,
        })
    }

    fn history_url(&self, start: DateTime<FixedOffset>) -> String {
        // The start instant lives in the path, so it is encoded by hand;
        // the remaining parameters go through the query builder.
        format!(
            "{}/api/history/period/{}",
            self.base_url,
            urlencoding::encode(&start.to_rfc3339())
        )
    }
}

/// Accept config values with or without a trailing `/api` suffix.
fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/')
        .trim_end_matches("/api")
        .trim_end_matches('/')
        .to_string()
}

#[async_trait]
impl HistoryRepository for HomeAssistantRepository {
    async fn fetch_history(
        &self,
        entity_id: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<RawSeries, HistoryError> {
        let url = self.history_url(start);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[
                ("filter_entity_id", entity_id),
                ("end_time", &end.to_rfc3339()),
                ("minimal_response", "false"),
                ("significant_changes_only", "false"),
            ])
            .send()
            .await
            .map_err(|e| HistoryError::Transport(e.into()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HistoryError::NotFound(entity_id.to_string()));
        }
        if !status.is_success() {
            return Err(HistoryError::Status(status.as_u16()));
        }

        let payload = response
            .json::<HistoryPayload>()
            .await
            .map_err(|e| HistoryError::Transport(e.into()))?;

        tracing::debug!(
            "Fetched {} history entries for {}",
            payload.first().map(|e| e.len()).unwrap_or(0),
            entity_id
        );

        Ok(to_raw_series(payload))
    }
}
