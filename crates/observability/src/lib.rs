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
    remote_turns_total: AtomicU64,
    local_fallback_total: AtomicU64,
    classifications_total: AtomicU64,
    training_runs_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub remote_turns_total: u64,
    pub local_fallback_total: u64,
    pub classifications_total: u64,
    pub training_runs_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_remote_turn(&self) {
        self.remote_turns_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_local_fallback(&self) {
        self.local_fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_classification(&self) {
        self.classifications_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_training_run(&self) {
        self.training_runs_total.fetch_add(1, Ordering::Relaxed);
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
            remote_turns_total: self.remote_turns_total.load(Ordering::Relaxed),
            local_fallback_total: self.local_fallback_total.load(Ordering::Relaxed),
            classifications_total: self.classifications_total.load(Ordering::Relaxed),
            training_runs_total: self.training_runs_total.load(Ordering::Relaxed),
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
            EnvFilter::new(format!("{}=info,agro_api=info,agro_agents=info", service_name))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
