// Hourly resampling of cumulative counter series
use crate::domain::sample::RawSeries;
use chrono::{DateTime, DurationRound, FixedOffset, TimeDelta};
use std::collections::HashMap;

/// One hourly bucket: the bucket's start instant (exact hour mark in the
/// target timezone) and the counter delta accumulated over the hour ending
/// at that mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub bucket: DateTime<FixedOffset>,
    pub delta: f64,
}

impl NormalizedPoint {
    pub fn new(bucket: DateTime<FixedOffset>, delta: f64) -> Self {
        Self { bucket, delta }
    }
}

/// Hourly deltas derived from one raw series, sorted ascending by bucket.
/// Empty when the source had no usable samples in the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedSeries {
    pub points: Vec<NormalizedPoint>,
}

impl NormalizedSeries {
    pub fn new(points: Vec<NormalizedPoint>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_bucket(&self) -> Option<DateTime<FixedOffset>> {
        self.points.first().map(|p| p.bucket)
    }

    pub fn last_bucket(&self) -> Option<DateTime<FixedOffset>> {
        self.points.last().map(|p| p.bucket)
    }

    /// Subtract `other` bucket-for-bucket, keeping only buckets present in
    /// both operands. Buckets missing on either side are excluded rather
    /// than treated as zero.
    pub fn subtract(&self, other: &NormalizedSeries) -> NormalizedSeries {
        let by_bucket: HashMap<DateTime<FixedOffset>, f64> = other
            .points
            .iter()
            .map(|p| (p.bucket, p.delta))
            .collect();

        let points = self
            .points
            .iter()
            .filter_map(|p| {
                by_bucket
                    .get(&p.bucket)
                    .map(|sub| NormalizedPoint::new(p.bucket, p.delta - sub))
            })
            .collect();

        NormalizedSeries::new(points)
    }
}

fn floor_to_hour(t: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    t.duration_trunc(TimeDelta::hours(1)).unwrap_or(t)
}

/// Turn irregular cumulative counter samples into hourly deltas.
///
/// Sample timestamps and comparisons all happen in the timezone carried by
/// `window_start`. The value at each hourly boundary is the last observed
/// sample at or before that boundary (forward-fill of a meter reading);
/// consecutive boundary values are differenced, so the output has one point
/// fewer than the boundaries that carry a value. A counter reset shows up
/// as a negative delta and is deliberately left as-is.
pub fn normalize(
    raw: &RawSeries,
    window_start: DateTime<FixedOffset>,
    window_end: DateTime<FixedOffset>,
) -> NormalizedSeries {
    let tz = window_start.timezone();

    // Parse failures drop the sample, never the series.
    let mut samples: Vec<(DateTime<FixedOffset>, f64)> = raw
        .samples
        .iter()
        .filter_map(|s| s.value().map(|v| (s.timestamp.with_timezone(&tz), v)))
        .collect();

    if samples.is_empty() {
        return NormalizedSeries::default();
    }

    // Stable sort, then keep the first sample of any duplicated timestamp.
    samples.sort_by_key(|(t, _)| *t);
    samples.dedup_by_key(|(t, _)| *t);

    samples.retain(|(t, _)| *t >= window_start && *t <= window_end);

    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return NormalizedSeries::default();
    };

    let first_boundary = floor_to_hour(first.0);
    let last_boundary = floor_to_hour(last.0);

    let mut points = Vec::new();
    let mut cursor = 0usize;
    let mut previous: Option<f64> = None;
    let mut boundary = first_boundary;

    while boundary <= last_boundary {
        // Last sample at or before the boundary; the leading boundary may
        // precede every sample and then carries no value.
        while cursor < samples.len() && samples[cursor].0 <= boundary {
            cursor += 1;
        }
        let current = cursor.checked_sub(1).map(|i| samples[i].1);

        if let (Some(prev), Some(cur)) = (previous, current) {
            points.push(NormalizedPoint::new(boundary, cur - prev));
        }

        previous = current;
        boundary += TimeDelta::hours(1);
    }

    NormalizedSeries::new(points)
}
