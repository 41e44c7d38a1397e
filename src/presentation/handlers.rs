// HTTP request handlers
use crate::application::dashboard_service::{day_window, target_timezone};
use crate::presentation::app_state::AppState;
use crate::presentation::views::DashboardView;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Inclusive date range in the installations' timezone; either bound
/// defaults to today when omitted.
#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn resolve_window(
    query: &DateRangeQuery,
    today: NaiveDate,
) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), StatusCode> {
    let start_date = query.start_date.unwrap_or(today);
    let end_date = query.end_date.unwrap_or(today);

    if end_date < start_date {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(day_window(start_date, end_date))
}

fn today() -> NaiveDate {
    Utc::now().with_timezone(&target_timezone()).date_naive()
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List configured installation ids
pub async fn list_installations(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dashboard_service.installation_ids().to_vec())
}

/// Dashboard for one installation over the requested date range
pub async fn get_dashboard(
    Path(id): Path<String>,
    Query(query): Query<DateRangeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (start, end) = match resolve_window(&query, today()) {
        Ok(window) => window,
        Err(status) => return status.into_response(),
    };

    match state.dashboard_service.get_dashboard(&id, start, end).await {
        Ok(dashboard) => Json(DashboardView::from(dashboard)).into_response(),
        Err(e) => {
            tracing::warn!("Dashboard request for {} rejected: {}", id, e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Dashboards for every configured installation. A broken installation
/// contributes a notices-only entry instead of failing the response.
pub async fn list_dashboards(
    Query(query): Query<DateRangeQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let (start, end) = match resolve_window(&query, today()) {
        Ok(window) => window,
        Err(status) => return status.into_response(),
    };

    let dashboards: Vec<DashboardView> = state
        .dashboard_service
        .get_all_dashboards(start, end)
        .await
        .into_iter()
        .map(DashboardView::from)
        .collect();

    Json(dashboards).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_explicit_range_resolves_to_whole_days() {
        let query = DateRangeQuery {
            start_date: Some(date(2025, 3, 1)),
            end_date: Some(date(2025, 3, 2)),
        };

        let (start, end) = resolve_window(&query, date(2025, 3, 10)).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-03-01T00:00:00+07:00");
        assert_eq!(end.to_rfc3339(), "2025-03-02T23:59:00+07:00");
    }

    #[test]
    fn test_missing_dates_default_to_today() {
        let query = DateRangeQuery {
            start_date: None,
            end_date: None,
        };

        let (start, end) = resolve_window(&query, date(2025, 3, 10)).unwrap();
        assert_eq!(start.to_rfc3339(), "2025-03-10T00:00:00+07:00");
        assert_eq!(end.to_rfc3339(), "2025-03-10T23:59:00+07:00");
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let query = DateRangeQuery {
            start_date: Some(date(2025, 3, 5)),
            end_date: Some(date(2025, 3, 1)),
        };

        assert_eq!(
            resolve_window(&query, date(2025, 3, 10)),
            Err(StatusCode::BAD_REQUEST)
        );
    }
}
