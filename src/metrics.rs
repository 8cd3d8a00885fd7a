//! Per-prediction instrumentation.
//!
//! The predictor reports every result, sentinels included, to one
//! [`MetricsSink`]. [`PredictionStats`] keeps process-lifetime counters in
//! memory; [`RecorderMetrics`] forwards to whatever `metrics` recorder the
//! host installed.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use preprocess::Language;
use scoring::SeverityCategory;
use serde::{Deserialize, Serialize};

/// Observer for completed predictions.
pub trait MetricsSink: Send + Sync {
    fn record(&self, category: SeverityCategory, language: Language, latency: Duration);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn record(&self, _category: SeverityCategory, _language: Language, _latency: Duration) {}
}

/// One entry of the recent-activity ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentPrediction {
    pub at: DateTime<Utc>,
    pub category: SeverityCategory,
    pub language: Language,
    pub latency_ms: f64,
}

/// Point-in-time copy of [`PredictionStats`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub total_predictions: u64,
    pub by_category: BTreeMap<SeverityCategory, u64>,
    pub by_language: BTreeMap<Language, u64>,
    pub average_latency_ms: f64,
    pub uptime_secs: i64,
    pub started_at: DateTime<Utc>,
    /// Oldest first.
    pub recent: Vec<RecentPrediction>,
}

/// In-memory counters for the lifetime of the process.
#[derive(Debug)]
pub struct PredictionStats {
    total: AtomicU64,
    latency_micros: AtomicU64,
    by_category: DashMap<SeverityCategory, u64>,
    by_language: DashMap<Language, u64>,
    recent: Mutex<VecDeque<RecentPrediction>>,
    recent_capacity: usize,
    started_at: Mutex<DateTime<Utc>>,
}

impl Default for PredictionStats {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PredictionStats {
    /// `recent_capacity` bounds the recent-activity ring; zero disables it.
    pub fn new(recent_capacity: usize) -> Self {
        Self {
            total: AtomicU64::new(0),
            latency_micros: AtomicU64::new(0),
            by_category: DashMap::new(),
            by_language: DashMap::new(),
            recent: Mutex::new(VecDeque::with_capacity(recent_capacity)),
            recent_capacity,
            started_at: Mutex::new(Utc::now()),
        }
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total();
        let latency = self.latency_micros.load(Ordering::Relaxed);
        let started_at = *self
            .started_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let recent = self
            .recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .cloned()
            .collect();

        StatsSnapshot {
            total_predictions: total,
            by_category: self.by_category.iter().map(|e| (*e.key(), *e.value())).collect(),
            by_language: self.by_language.iter().map(|e| (*e.key(), *e.value())).collect(),
            average_latency_ms: if total == 0 {
                0.0
            } else {
                latency as f64 / total as f64 / 1000.0
            },
            uptime_secs: (Utc::now() - started_at).num_seconds(),
            started_at,
            recent,
        }
    }

    /// Clears every counter and restarts the uptime clock.
    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.latency_micros.store(0, Ordering::Relaxed);
        self.by_category.clear();
        self.by_language.clear();
        self.recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
        *self
            .started_at
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Utc::now();
    }
}

impl MetricsSink for PredictionStats {
    fn record(&self, category: SeverityCategory, language: Language, latency: Duration) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.latency_micros.fetch_add(micros, Ordering::Relaxed);
        *self.by_category.entry(category).or_insert(0) += 1;
        *self.by_language.entry(language).or_insert(0) += 1;

        if self.recent_capacity == 0 {
            return;
        }
        let mut recent = self
            .recent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if recent.len() == self.recent_capacity {
            recent.pop_front();
        }
        recent.push_back(RecentPrediction {
            at: Utc::now(),
            category,
            language,
            latency_ms: latency.as_secs_f64() * 1000.0,
        });
    }
}

/// Forwards to the global `metrics` recorder.
///
/// Emits `ticket_predictions_total{category, language}` and
/// `ticket_prediction_latency_seconds`.
#[cfg(feature = "metrics")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RecorderMetrics;

#[cfg(feature = "metrics")]
impl MetricsSink for RecorderMetrics {
    fn record(&self, category: SeverityCategory, language: Language, latency: Duration) {
        metrics::counter!(
            "ticket_predictions_total",
            "category" => category.as_str(),
            "language" => language.as_str()
        )
        .increment(1);
        metrics::histogram!("ticket_prediction_latency_seconds").record(latency.as_secs_f64());
    }
}

/// Sends each record to several sinks in order.
#[derive(Default, Clone)]
pub struct MetricsFanout {
    sinks: Vec<Arc<dyn MetricsSink>>,
}

impl MetricsFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn MetricsSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl MetricsSink for MetricsFanout {
    fn record(&self, category: SeverityCategory, language: Language, latency: Duration) {
        for sink in &self.sinks {
            sink.record(category, language, latency);
        }
    }
}
