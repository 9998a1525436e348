//! HTTP error mapping
//!
//! Every rejected request answers with an `ErrorResponse` body and the
//! status of its error code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::connector::ErrorResponse;
use crate::delegation::QueryError;

/// A query error on its way to the client
#[derive(Debug)]
pub struct HttpError(pub QueryError);

impl From<QueryError> for HttpError {
    fn from(err: QueryError) -> Self {
        Self(err)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from(&self.0);
        let status =
            StatusCode::from_u16(body.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_code() {
        let response = HttpError(QueryError::not_found("table 'X'")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = HttpError(QueryError::unsupported_feature("joins")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
