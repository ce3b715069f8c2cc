// The detailed healthcheck for operators: full component breakdown plus
// process metadata

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Local, Utc};

use crate::core::status::Status;
use crate::core::summary::Summary;
use crate::http::{compute_status_code, hostname, HealthState, TIME_FORMAT};

const PRIVATE_BAD: &str = r#"{"condition":"private healthcheck error"}"#;

// Environment variables safe to report; everything else stays private.
const ALLOWLIST_ENV: [&str; 7] = ["HOME", "LANG", "PATH", "PWD", "TMPDIR", "SHELL", "USER"];

/// Healthcheck status of one component. Field order is the serialization
/// order.
#[derive(Debug, serde::Serialize)]
struct Component {
    timestamp: i64,
    #[serde(rename = "documentationUrl")]
    doc_url: String,
    urgency: String,
    description: String,
    status: String,
    #[serde(rename = "errorMessage")]
    message: String,
    duration: i64,
    #[serde(rename = "lastKnownGoodTimestamp")]
    last_good: i64,
    period: i64,
    id: String,
    date: String,
}

/// Components grouped by status. Listed explicitly so the JSON encoding is
/// ordered worst first; empty groups are omitted.
#[derive(Debug, Default, serde::Serialize)]
struct Components {
    #[serde(rename = "OUTAGE", skip_serializing_if = "Vec::is_empty")]
    outage: Vec<Component>,
    #[serde(rename = "MAJOR", skip_serializing_if = "Vec::is_empty")]
    major: Vec<Component>,
    #[serde(rename = "MINOR", skip_serializing_if = "Vec::is_empty")]
    minor: Vec<Component>,
    #[serde(rename = "OK", skip_serializing_if = "Vec::is_empty")]
    ok: Vec<Component>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PrivateBody {
    app_name: String,
    condition: String,
    duration: i64,
    hostname: String,
    environment: BTreeMap<String, String>,
    cwd: String,
    app_start_date_system: String,
    #[serde(rename = "appStartDateUTC")]
    app_start_date_utc: String,
    app_start_unix_timestamp: String,
    app_up_time_readable: String,
    app_up_time_seconds: String,
    least_recently_executed_date: String,
    #[serde(rename = "leastRecentlyExecutedTimestamp")]
    least_recently_executed_time: i64,
    results: Components,
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

    let body = build_body(&state, &summary);
    let (code, json) = match serde_json::to_string_pretty(&body) {
        Ok(json) => (compute_status_code(true, &summary), json),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, PRIVATE_BAD.to_string()),
    };

    (code, [(header::CONTENT_TYPE, "application/json")], json).into_response()
}

fn build_body(state: &HealthState, summary: &Summary) -> PrivateBody {
    let now = Utc::now();
    let cwd = std::env::current_dir()
        .map(|path| path.display().to_string())
        .unwrap_or_default();

    let mut environment = BTreeMap::new();
    for name in ALLOWLIST_ENV {
        if let Ok(value) = std::env::var(name) {
            environment.insert(name.to_string(), value);
        }
    }

    PrivateBody {
        app_name: state.app_name.clone(),
        condition: summary.overall().to_string(),
        duration: summary.duration().as_millis() as i64,
        hostname: hostname(),
        environment,
        cwd,
        app_start_date_system: now.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        app_start_date_utc: now.format(TIME_FORMAT).to_string(),
        app_start_unix_timestamp: state.started.timestamp_millis().to_string(),
        app_up_time_readable: readable_uptime(now, state.started),
        app_up_time_seconds: (now - state.started).num_seconds().max(0).to_string(),
        least_recently_executed_date: summary
            .executed()
            .with_timezone(&Local)
            .format(TIME_FORMAT)
            .to_string(),
        least_recently_executed_time: summary.executed().timestamp_millis(),
        results: categorize(summary),
    }
}

fn categorize(summary: &Summary) -> Components {
    let mut components = Components::default();
    for result in summary.results() {
        let entry = Component {
            timestamp: result.health.time.timestamp_millis(),
            doc_url: result.doc_url.clone(),
            urgency: result.health.urgency.detail().to_string(),
            description: result.description.clone(),
            status: result.health.status.to_string(),
            message: result.health.message.clone(),
            duration: result.health.duration.as_micros() as i64,
            last_good: result.last_ok.timestamp_millis(),
            period: result.period.as_secs() as i64,
            id: result.name.clone(),
            date: result
                .health
                .time
                .with_timezone(&Local)
                .format(TIME_FORMAT)
                .to_string(),
        };
        match result.health.status {
            Status::Outage => components.outage.push(entry),
            Status::Major => components.major.push(entry),
            Status::Minor => components.minor.push(entry),
            Status::Ok => components.ok.push(entry),
        }
    }
    components
}

/// Uptime in the compact hours/minutes/seconds form, e.g. "345h48m29s".
/// Leading zero units collapse: "48m29s", "29s"; a fresh start is "0s".
fn readable_uptime(now: DateTime<Utc>, started: DateTime<Utc>) -> String {
    let total = (now - started).num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
