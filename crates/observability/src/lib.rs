use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    requests_total: AtomicU64,
    candidates_total: AtomicU64,
    validation_rejections_total: AtomicU64,
    store_failures_total: AtomicU64,
    completion_failures_total: AtomicU64,
    malformed_replies_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub candidates_total: u64,
    pub validation_rejections_total: u64,
    pub store_failures_total: u64,
    pub completion_failures_total: u64,
    pub malformed_replies_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_candidates(&self, count: usize) {
        self.candidates_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn inc_validation_rejection(&self) {
        self.validation_rejections_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_store_failure(&self) {
        self.store_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_completion_failure(&self) {
        self.completion_failures_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_malformed_reply(&self) {
        self.malformed_replies_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let requests = self.requests_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            requests_total: requests,
            candidates_total: self.candidates_total.load(Ordering::Relaxed),
            validation_rejections_total: self.validation_rejections_total.load(Ordering::Relaxed),
            store_failures_total: self.store_failures_total.load(Ordering::Relaxed),
            completion_failures_total: self.completion_failures_total.load(Ordering::Relaxed),
            malformed_replies_total: self.malformed_replies_total.load(Ordering::Relaxed),
            avg_latency_millis: if requests == 0 {
                0.0
            } else {
                latency as f64 / requests as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,venture_api=info,venture_planner=info,venture_storage=info,tower_http=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
