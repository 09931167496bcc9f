use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::parallel::WorkerPool;
use crate::server::api::{self, PayloadError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body,
        }
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// Dispatch one request. Query strings are ignored.
pub fn route_request(method: &str, path: &str, body: &str, pool: &WorkerPool) -> HttpResponse {
    let route = path.split('?').next().unwrap_or(path);
    match (method, route) {
        ("GET", "/api/health") => static_payload(api::health_payload()),
        ("GET", "/api/coefficients") => static_payload(api::coefficients_payload()),
        ("GET", "/api/context") => static_payload(api::context_payload()),
        ("GET", "/api/baseline") => static_payload(api::baseline_payload()),
        ("POST", "/api/evaluate") => request_payload(api::evaluate_payload(body)),
        ("POST", "/api/assess") => request_payload(api::assess_payload(body)),
        ("POST", "/api/grid-impact") => request_payload(api::grid_impact_payload(body)),
        ("POST", "/api/compare") => request_payload(api::compare_payload(body)),
        ("POST", "/api/roadmap") => request_payload(api::roadmap_payload(body)),
        ("POST", "/api/incentives") => request_payload(api::incentives_payload(body)),
        ("POST", "/api/ppp") => request_payload(api::ppp_payload(body)),
        ("POST", "/api/sweep") => request_payload(api::sweep_payload(body, pool)),
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn static_payload(result: Result<String, serde_json::Error>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok(payload),
        Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
    }
}

fn request_payload(result: Result<String, PayloadError>) -> HttpResponse {
    match result {
        Ok(payload) => HttpResponse::ok(payload),
        Err(PayloadError::Parse(err)) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        Err(PayloadError::Validation(validation)) => {
            validation_error_response(400, "Bad Request", validation)
        }
        Err(err @ PayloadError::Encode(_)) => {
            warn!(error = %err, "response encoding failed");
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

pub(crate) fn error_response(
    status_code: u16,
    status_text: &'static str,
    message: &str,
) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}
