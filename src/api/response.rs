// API response utility functions module

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::error::ApiError;
use crate::http;
use crate::logger;

/// Build JSON response, surfacing encoding failures as `ApiError::Encode`
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
) -> Result<Response<Full<Bytes>>, ApiError> {
    let json = serde_json::to_vec(body).map_err(ApiError::Encode)?;
    Ok(http::build_json_response(status, json))
}

/// Map an `ApiError` to its response, logging it on the way out
pub fn error_response(error: &ApiError) -> Response<Full<Bytes>> {
    if error.is_client_error() {
        logger::log_warning(&error.to_string());
    } else {
        logger::log_error(&error.to_string());
    }

    let body = serde_json::json!({ "error": error.to_string() });
    http::build_json_response(error.status(), body.to_string().into_bytes())
}
