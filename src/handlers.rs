use crate::errors::{AppError, StoreError, ValidationError};
use crate::models::{
    ActivityRecord, ActivityRequest, DeleteResponse, HealthResponse, OverviewResponse,
    RangeQuery, YearQuery, parse_date_key, parse_year,
};
use crate::state::AppState;
use crate::stats::{YearView, build_overview, build_year_view};
use crate::store::ActivityStore;
use crate::ui::render_index;
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    response::Html,
};
use chrono::{Datelike, Local, NaiveDate};
use std::sync::Arc;
use tracing::info;

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Html<String>, AppError> {
    let year = resolve_year(query.year.as_deref())?;
    let records = year_records(&state, year).await?;
    let view = build_year_view(year, &records);
    let overview = build_overview(year, &records);
    Ok(Html(render_index(&view, &overview, current_year())))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_activities(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<ActivityRecord>>, AppError> {
    let start = range.start.as_deref().map(parse_date_key).transpose()?;
    let end = range.end.as_deref().map(parse_date_key).transpose()?;
    let records = with_store(&state, move |store| store.list(start, end)).await?;
    Ok(Json(records))
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<ActivityRecord>, AppError> {
    let date = parse_date_key(&date)?;
    with_store(&state, move |store| store.get(date))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Activity not found"))
}

pub async fn put_activity(
    State(state): State<AppState>,
    Path(date): Path<String>,
    body: Bytes,
) -> Result<Json<ActivityRecord>, AppError> {
    let date = parse_date_key(&date)?;
    let request: ActivityRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ActivityRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|err| ValidationError::Body(err.to_string()))?
    };
    let input = request.validate()?;

    let record = with_store(&state, move |store| store.upsert(date, &input)).await?;
    info!(
        "saved {date}: training_type={} diet={}",
        record.training_type,
        record.diet.map_or("absent", |diet| diet.as_str())
    );
    Ok(Json(record))
}

pub async fn delete_activity(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let date = parse_date_key(&date)?;
    if !with_store(&state, move |store| store.delete(date)).await? {
        return Err(AppError::not_found("Activity not found"));
    }
    info!("cleared {date}");
    Ok(Json(DeleteResponse { success: true }))
}

pub async fn get_grid(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<YearView>, AppError> {
    let year = resolve_year(query.year.as_deref())?;
    let records = year_records(&state, year).await?;
    Ok(Json(build_year_view(year, &records)))
}

pub async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<OverviewResponse>, AppError> {
    let year = resolve_year(query.year.as_deref())?;
    let records = year_records(&state, year).await?;
    Ok(Json(build_overview(year, &records)))
}

/// Runs a store call on the blocking pool so SQLite I/O stays off the runtime workers.
async fn with_store<T, F>(state: &AppState, call: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&ActivityStore) -> Result<T, StoreError> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || call(&store))
        .await
        .map_err(|err| StoreError::Task(err.to_string()))?;
    Ok(result?)
}

async fn year_records(state: &AppState, year: i32) -> Result<Vec<ActivityRecord>, AppError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ValidationError::Year)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(ValidationError::Year)?;
    with_store(state, move |store| store.list(Some(start), Some(end))).await
}

fn resolve_year(raw: Option<&str>) -> Result<i32, AppError> {
    match raw {
        Some(raw) if !raw.is_empty() => Ok(parse_year(raw)?),
        _ => Ok(current_year()),
    }
}

fn current_year() -> i32 {
    Local::now().date_naive().year()
}
