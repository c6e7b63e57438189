//! JSON handlers for the counter, catalog and summary routes.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use tally_core::error::{Result, TallyError};
use tally_core::{MonthSummary, Period};

use crate::api::ApiError;
use crate::app_state::AppState;

/// Body of increment/reset. Any date fields sent by the client are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterReq {
    pub department: String,
    pub issue_type: String,
}

fn respond<T: Serialize>(app: &AppState, route: &'static str, res: Result<T>) -> Response {
    let resp = match res {
        Ok(v) => Json(v).into_response(),
        Err(e) => ApiError(e).into_response(),
    };
    app.metrics()
        .http_requests
        .inc(&[("route", route), ("status", resp.status().as_str())]);
    resp
}

fn period_from_path(path: std::result::Result<Path<(i64, i64)>, PathRejection>) -> Result<Period> {
    let Path((year, month)) =
        path.map_err(|e| TallyError::BadRequest(format!("invalid year/month: {}", e.body_text())))?;
    let out_of_range = || TallyError::InvalidPeriod(format!("no such month: {year}-{month}"));
    let year = i32::try_from(year).map_err(|_| out_of_range())?;
    let month = u32::try_from(month).map_err(|_| out_of_range())?;
    Period::new(year, month)
}

fn counter_req(body: std::result::Result<Json<CounterReq>, JsonRejection>) -> Result<CounterReq> {
    body.map(|Json(req)| req)
        .map_err(|e| TallyError::BadRequest(e.body_text()))
}

pub async fn month_handler(
    State(app): State<AppState>,
    path: std::result::Result<Path<(i64, i64)>, PathRejection>,
) -> Response {
    let res = async {
        let period = period_from_path(path)?;
        app.month(period).await
    }
    .await;
    respond(&app, "data", res)
}

pub async fn increment_handler(
    State(app): State<AppState>,
    body: std::result::Result<Json<CounterReq>, JsonRejection>,
) -> Response {
    let res = async {
        let req = counter_req(body)?;
        let key = app.current_key(&req.department, &req.issue_type)?;
        app.increment(key).await
    }
    .await;
    respond(&app, "increment", res)
}

pub async fn reset_handler(
    State(app): State<AppState>,
    body: std::result::Result<Json<CounterReq>, JsonRejection>,
) -> Response {
    let res = async {
        let req = counter_req(body)?;
        let key = app.current_key(&req.department, &req.issue_type)?;
        app.reset(key).await
    }
    .await;
    respond(&app, "reset", res)
}

pub async fn catalog_handler(State(app): State<AppState>) -> Response {
    let catalog = app.catalog().clone();
    respond(&app, "catalog", Ok(catalog))
}

pub async fn summary_handler(
    State(app): State<AppState>,
    path: std::result::Result<Path<(i64, i64)>, PathRejection>,
) -> Response {
    let res = async {
        let period = period_from_path(path)?;
        let counts = app.month(period).await?;
        Ok::<_, TallyError>(MonthSummary::build(app.catalog(), period, &counts))
    }
    .await;
    respond(&app, "summary", res)
}

/// Non-API paths when no client bundle is configured.
pub async fn not_found(State(app): State<AppState>) -> Response {
    let res: Result<()> = Err(TallyError::NotFound("no such route".into()));
    respond(&app, "fallback", res)
}
