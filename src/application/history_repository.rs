// Repository trait for sensor history access
use crate::domain::sample::RawSeries;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

/// Failure modes of a history fetch. Every variant is recoverable at the
/// per-entity level: callers degrade the affected series to "no data" and
/// keep going.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("entity {0} not found in history source")]
    NotFound(String),

    #[error("history source answered with status {0}")]
    Status(u16),

    #[error("transport failure: {0}")]
    Transport(anyhow::Error),
}

/// Access to one installation's history API.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Raw state-change samples for an entity over `[start, end]`. An entity
    /// with no recorded changes yields an empty series, not an error.
    async fn fetch_history(
        &self,
        entity_id: &str,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<RawSeries, HistoryError>;
}
