//! HTTP mapping of [`TallyError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use tally_core::error::{ClientCode, TallyError};

/// Error returned by API handlers; renders as `{"error": CODE, "message": text}`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub TallyError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest
            | ClientCode::InvalidPeriod
            | ClientCode::UnknownDepartment
            | ClientCode::UnknownIssueType => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Store | ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
