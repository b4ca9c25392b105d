use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::shared::data_source::FetchError;
use crate::shared::dates::current_year;

/// Oldest year the sales API holds data for
pub const FIRST_YEAR: i32 = 2000;

/// Errors returned by the dashboard handlers, rendered as `{"error": "..."}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("data source unavailable: {0}")]
    Upstream(#[from] FetchError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Reject months outside 1..=12
pub fn check_month(month: u32) -> Result<(), ApiError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("invalid month: {}", month)))
    }
}

/// Reject years before [`FIRST_YEAR`] or after next year
pub fn check_year(year: i32) -> Result<(), ApiError> {
    if (FIRST_YEAR..=current_year() + 1).contains(&year) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("invalid year: {}", year)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let upstream = ApiError::from(FetchError::Http {
            status: 500,
            body: "down".into(),
        });
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(check_month(13).unwrap_err().status(), StatusCode::BAD_REQUEST);
        assert!(check_month(12).is_ok());
    }

    #[test]
    fn test_year_window() {
        assert!(check_year(FIRST_YEAR).is_ok());
        assert!(check_year(current_year()).is_ok());
        assert!(check_year(current_year() + 1).is_ok());
        assert_eq!(check_year(1999).unwrap_err().to_string(), "invalid year: 1999");
        assert!(check_year(current_year() + 2).is_err());
        assert_eq!(check_year(i32::MIN).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
