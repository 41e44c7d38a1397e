// Raw sensor sample domain models
use chrono::{DateTime, FixedOffset};

/// One reported state change of a cumulative energy counter, as delivered
/// by a history source. The state is kept as the raw string; sensors report
/// placeholders like "unknown" or "unavailable" which must not poison the
/// rest of the series.
#[derive(Debug, Clone)]
pub struct RawSample {
    pub timestamp: DateTime<FixedOffset>,
    pub state: String,
}

impl RawSample {
    pub fn new(timestamp: DateTime<FixedOffset>, state: impl Into<String>) -> Self {
        Self {
            timestamp,
            state: state.into(),
        }
    }

    /// Numeric counter reading, `None` when the state is not a number.
    pub fn value(&self) -> Option<f64> {
        self.state.trim().parse::<f64>().ok()
    }
}

/// Ordered samples for a single entity over one requested window.
#[derive(Debug, Clone, Default)]
pub struct RawSeries {
    pub samples: Vec<RawSample>,
}

impl RawSeries {
    pub fn new(samples: Vec<RawSample>) -> Self {
        Self { samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
