// The terse healthcheck consumed by load balancers

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::http::{compute_status_code, hostname, HealthState};

const INFO_BAD: &str = r#"{"condition":"info healthcheck error"}"#;

#[derive(Debug, serde::Serialize)]
struct InfoBody {
    condition: String,
    hostname: String,
    duration: i64,
}

pub(crate) async fn background(state: State<HealthState>) -> Response {
    respond(state, false).await
}

pub(crate) async fn live(state: State<HealthState>) -> Response {
    respond(state, true).await
}

async fn respond(State(state): State<HealthState>, live: bool) -> Response {
    let summary = if live {
        state.deps.live().await
    } else {
        state.deps.background()
    };

    let body = InfoBody {
        condition: summary.overall().to_string(),
        hostname: hostname(),
        duration: summary.duration().as_millis() as i64,
    };

    let (code, json) = match serde_json::to_string_pretty(&body) {
        Ok(json) => (compute_status_code(false, &summary), json),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, INFO_BAD.to_string()),
    };

    (code, [(header::CONTENT_TYPE, "text/plain")], json).into_response()
}
