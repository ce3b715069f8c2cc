// Monitors for dependencies that expose their own healthcheck over HTTP

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::mpsc;

use crate::core::health::Health;
use crate::core::monitor::{check_fn, HealthStatus, Monitor, MonitorOptions};
use crate::core::status::Status;
use crate::core::urgency::Urgency;

// One shared client for every transitive monitor in the process.
fn shared_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("transitive healthcheck client")
    })
}

/// A monitor whose probe is a GET against another service's healthcheck.
///
/// HTTP 200 reports `Ok` with the status line as message; any other code
/// reports `Outage`, as does a transport failure. The monitor's own timeout
/// still bounds the probe end to end.
pub fn transitive_monitor(
    url: impl Into<String>,
    name: impl Into<String>,
    description: impl Into<String>,
    doc_url: impl Into<String>,
    urgency: Urgency,
    status_tx: Option<mpsc::Sender<HealthStatus>>,
) -> Arc<Monitor> {
    let url = url.into();

    Monitor::with_options(
        name,
        description,
        doc_url,
        urgency,
        check_fn(move |_ctx| {
            let url = url.clone();
            async move {
                let started = Utc::now();
                let clock = Instant::now();

                let mut health = match shared_client().get(&url).send().await {
                    Ok(response) => {
                        let line = format!(
                            "{} {}",
                            response.status().as_u16(),
                            response.status().canonical_reason().unwrap_or("")
                        );
                        let status = if response.status() == reqwest::StatusCode::OK {
                            Status::Ok
                        } else {
                            Status::Outage
                        };
                        Health::new(status, line)
                    }
                    Err(err) => Health::new(
                        Status::Outage,
                        format!("error checking transitive monitor: {err}"),
                    ),
                };
                health.time = started;
                health.duration = clock.elapsed();
                health
            }
        }),
        MonitorOptions {
            status_tx,
            ..MonitorOptions::default()
        },
    )
}
