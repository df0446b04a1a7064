//! Performance tracking
//!
//! This module provides:
//! - Custom metrics (timers, API calls, renders, navigations, long tasks)
//! - Core Web Vitals rating and collection
//! - Point-in-time snapshots for debugging
//!
//! The tracker is an ordinary value: the application constructs one, shares
//! it through an `Arc` and ties `start`/`stop` to its own lifecycle.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use telescope_search::KeyValueStorage;
use tokio::time::Instant;
use uuid::Uuid;

/// Storage key web vitals are mirrored under
pub const WEB_VITALS_STORAGE_KEY: &str = "webVitals";

/// Metadata value attached to a metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        MetricValue::Number(value as f64)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

pub type MetricMetadata = BTreeMap<String, MetricValue>;

/// Build metadata from key/value pairs
pub fn metadata<I, K, V>(pairs: I) -> MetricMetadata
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<MetricValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A recorded custom metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub id: Uuid,
    pub name: String,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: MetricMetadata,
}

/// Core Web Vitals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebVitalName {
    Cls,
    Fcp,
    Fid,
    Lcp,
    Ttfb,
    Inp,
}

impl WebVitalName {
    /// Upper bounds of the good and needs-improvement bands
    pub fn thresholds(self) -> (f64, f64) {
        match self {
            WebVitalName::Lcp => (2500.0, 4000.0),
            WebVitalName::Fid => (100.0, 300.0),
            WebVitalName::Cls => (0.1, 0.25),
            WebVitalName::Fcp => (1800.0, 3000.0),
            WebVitalName::Ttfb => (800.0, 1800.0),
            WebVitalName::Inp => (200.0, 500.0),
        }
    }
}

/// Rating bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    #[default]
    Good,
    NeedsImprovement,
    Poor,
}

/// Rate a web vital value; both bounds are inclusive
pub fn rate_metric(name: WebVitalName, value: f64) -> Rating {
    let (good, poor) = name.thresholds();
    if value <= good {
        Rating::Good
    } else if value <= poor {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

/// A web vital as reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebVitalMetric {
    pub id: String,
    pub name: WebVitalName,
    pub value: f64,
    pub delta: f64,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation_type: Option<String>,
}

/// Process memory usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub resident_bytes: u64,
}

/// Everything the tracker knows at one point in time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    pub web_vitals: Vec<WebVitalMetric>,
    pub custom_metrics: Vec<PerformanceMetric>,
    pub memory_usage: Option<MemoryUsage>,
    /// RFC 3339 time the snapshot was taken
    pub timestamp: String,
}

/// Tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Oldest metrics and web vitals are dropped beyond this count
    pub max_metrics: usize,
    /// Tasks at or below this duration are not long tasks
    pub long_task_threshold_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_metrics: 1000,
            long_task_threshold_ms: 50,
        }
    }
}

/// Performance tracker service
pub struct PerformanceTracker {
    config: TrackerConfig,
    metrics: RwLock<VecDeque<PerformanceMetric>>,
    web_vitals: RwLock<VecDeque<WebVitalMetric>>,
    /// Where web vitals are mirrored, if anywhere
    storage: Option<Arc<dyn KeyValueStorage>>,
    is_running: AtomicBool,
}

impl PerformanceTracker {
    /// Create a stopped tracker
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            metrics: RwLock::new(VecDeque::with_capacity(config.max_metrics.min(1000))),
            config,
            web_vitals: RwLock::new(VecDeque::new()),
            storage: None,
            is_running: AtomicBool::new(false),
        }
    }

    /// Mirror web vitals to `storage`
    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Start accepting metrics
    pub fn start(&self) {
        tracing::info!("Starting performance tracking");
        self.is_running.store(true, Ordering::Relaxed);
    }

    /// Stop accepting metrics; recorded data is kept
    pub fn stop(&self) {
        tracing::info!("Stopping performance tracking");
        self.is_running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Record a custom metric
    pub fn record_metric(&self, name: &str, value: f64, metadata: MetricMetadata) {
        if !self.is_running() {
            tracing::trace!("Tracker stopped, dropping metric {}", name);
            return;
        }

        let metric = PerformanceMetric {
            id: Uuid::new_v4(),
            name: name.to_string(),
            value,
            timestamp: Utc::now(),
            metadata,
        };
        tracing::debug!(metric = %metric.name, value = metric.value, "Performance metric");

        let mut metrics = self.metrics.write();
        if metrics.len() >= self.config.max_metrics {
            metrics.pop_front();
        }
        metrics.push_back(metric);
    }

    /// Time an operation; the duration in milliseconds is recorded when the
    /// returned timer is stopped or dropped
    pub fn start_timer(&self, name: impl Into<String>) -> MetricTimer<'_> {
        MetricTimer {
            tracker: self,
            name: name.into(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Await an API call, recording its duration and outcome
    pub async fn track_api_call<F, T, E>(&self, endpoint: &str, call: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let timer = self.start_timer(format!("api_{endpoint}"));
        let result = call.await;
        timer.stop();

        match &result {
            Ok(_) => self.record_metric(
                &format!("api_{endpoint}_success"),
                1.0,
                metadata([("status", "success")]),
            ),
            Err(_) => self.record_metric(
                &format!("api_{endpoint}_error"),
                1.0,
                metadata([("status", "error"), ("errorType", short_type_name::<E>())]),
            ),
        }

        result
    }

    /// Time a component render
    pub fn track_render(&self, component: &str) -> MetricTimer<'_> {
        self.start_timer(format!("render_{component}"))
    }

    /// Record a route change
    pub fn track_navigation(&self, from: &str, to: &str) {
        self.record_metric("navigation", 1.0, metadata([("from", from), ("to", to)]));
    }

    /// Record a task that blocked for `duration`, ignoring short ones
    pub fn record_long_task(&self, duration: Duration, start_time_ms: f64) -> bool {
        if duration <= Duration::from_millis(self.config.long_task_threshold_ms) {
            return false;
        }

        self.record_metric(
            "long_task",
            as_millis_f64(duration),
            metadata([
                ("type", MetricValue::from("long_task")),
                ("startTime", MetricValue::from(start_time_ms)),
            ]),
        );
        true
    }

    /// Rate and keep a web vital reported by the host
    pub fn report_web_vital(&self, metric: WebVitalMetric) -> WebVitalMetric {
        let enriched = WebVitalMetric {
            rating: rate_metric(metric.name, metric.value),
            ..metric
        };

        if !self.is_running() {
            return enriched;
        }

        tracing::debug!(name = ?enriched.name, value = enriched.value, rating = ?enriched.rating, "Web vital");

        let mut vitals = self.web_vitals.write();
        if vitals.len() >= self.config.max_metrics {
            vitals.pop_front();
        }
        vitals.push_back(enriched.clone());
        self.mirror_web_vitals(&vitals);

        enriched
    }

    fn mirror_web_vitals(&self, vitals: &VecDeque<WebVitalMetric>) {
        let Some(storage) = &self.storage else {
            return;
        };

        let result = serde_json::to_string(vitals)
            .map_err(|e| e.to_string())
            .and_then(|raw| {
                storage
                    .set_item(WEB_VITALS_STORAGE_KEY, &raw)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            tracing::warn!("Failed to store web vitals: {}", e);
        }
    }

    /// All custom metrics, oldest first
    pub fn metrics(&self) -> Vec<PerformanceMetric> {
        self.metrics.read().iter().cloned().collect()
    }

    /// Custom metrics with the given name
    pub fn metrics_named(&self, name: &str) -> Vec<PerformanceMetric> {
        self.metrics
            .read()
            .iter()
            .filter(|m| m.name == name)
            .cloned()
            .collect()
    }

    pub fn web_vitals(&self) -> Vec<WebVitalMetric> {
        self.web_vitals.read().iter().cloned().collect()
    }

    pub fn clear_metrics(&self) {
        self.metrics.write().clear();
        tracing::info!("Performance metrics cleared");
    }

    pub fn snapshot(&self) -> PerformanceSnapshot {
        PerformanceSnapshot {
            web_vitals: self.web_vitals(),
            custom_metrics: self.metrics(),
            memory_usage: memory_usage(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PerformanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceTracker")
            .field("config", &self.config)
            .field("metrics", &self.metrics.read().len())
            .field("web_vitals", &self.web_vitals.read().len())
            .field("is_running", &self.is_running())
            .finish()
    }
}

/// Running timer created by [`PerformanceTracker::start_timer`]
#[must_use = "a timer records when stopped or dropped"]
pub struct MetricTimer<'a> {
    tracker: &'a PerformanceTracker,
    name: String,
    started: Instant,
    finished: bool,
}

impl MetricTimer<'_> {
    /// Record the elapsed time and return it
    pub fn stop(mut self) -> Duration {
        self.finish()
    }

    fn finish(&mut self) -> Duration {
        let elapsed = self.started.elapsed();
        if !self.finished {
            self.finished = true;
            self.tracker.record_metric(
                &self.name,
                as_millis_f64(elapsed),
                metadata([("type", "timer")]),
            );
        }
        elapsed
    }
}

impl Drop for MetricTimer<'_> {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Resident memory of this process, where the platform exposes it
pub fn memory_usage() -> Option<MemoryUsage> {
    #[cfg(target_os = "linux")]
    {
        let content = std::fs::read_to_string("/proc/self/statm").ok()?;
        let pages = content.split_whitespace().nth(1)?.parse::<u64>().ok()?;
        Some(MemoryUsage {
            resident_bytes: pages * 4096, // Page size is typically 4KB
        })
    }

    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn as_millis_f64(duration: Duration) -> f64 {
    duration.as_micros() as f64 / 1000.0
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use telescope_search::MemoryStorage;

    fn running_tracker() -> PerformanceTracker {
        let tracker = PerformanceTracker::new();
        tracker.start();
        tracker
    }

    fn vital(name: WebVitalName, value: f64) -> WebVitalMetric {
        WebVitalMetric {
            id: "v1-123".to_string(),
            name,
            value,
            delta: value,
            rating: Rating::Good,
            navigation_type: Some("navigate".to_string()),
        }
    }

    #[test]
    fn test_tracker_start_stop() {
        let tracker = PerformanceTracker::new();
        assert!(!tracker.is_running());

        tracker.start();
        assert!(tracker.is_running());

        tracker.stop();
        assert!(!tracker.is_running());
    }

    #[test]
    fn test_stopped_tracker_drops_metrics() {
        let tracker = PerformanceTracker::new();
        tracker.record_metric("ignored", 1.0, MetricMetadata::new());
        tracker.track_navigation("/", "/users/octocat");
        assert!(tracker.metrics().is_empty());
    }

    #[test]
    fn test_record_metric_with_metadata() {
        let tracker = running_tracker();
        tracker.record_metric("bundle_size", 2048.0, metadata([("unit", "bytes")]));

        let metrics = tracker.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "bundle_size");
        assert_eq!(metrics[0].value, 2048.0);
        assert_eq!(
            metrics[0].metadata.get("unit"),
            Some(&MetricValue::Text("bytes".to_string()))
        );
    }

    #[test]
    fn test_metrics_are_bounded() {
        let tracker = PerformanceTracker::with_config(TrackerConfig {
            max_metrics: 3,
            ..Default::default()
        });
        tracker.start();

        for i in 0..5 {
            tracker.record_metric(&format!("m{i}"), i as f64, MetricMetadata::new());
        }

        let names: Vec<String> = tracker.metrics().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["m2", "m3", "m4"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_records_elapsed() {
        let tracker = running_tracker();

        let timer = tracker.start_timer("load");
        tokio::time::sleep(Duration::from_millis(120)).await;
        let elapsed = timer.stop();

        assert!(elapsed >= Duration::from_millis(120));
        let metrics = tracker.metrics_named("load");
        assert_eq!(metrics.len(), 1);
        assert!(metrics[0].value >= 120.0);
        assert_eq!(
            metrics[0].metadata.get("type"),
            Some(&MetricValue::Text("timer".to_string()))
        );
    }

    #[test]
    fn test_render_timer_records_on_drop() {
        let tracker = running_tracker();
        {
            let _render = tracker.track_render("StarList");
        }
        assert_eq!(tracker.metrics_named("render_StarList").len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_track_api_call_success() {
        let tracker = running_tracker();

        let result: Result<u32, std::io::Error> = tracker
            .track_api_call("stars", async {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok(12)
            })
            .await;

        assert_eq!(result.unwrap(), 12);
        assert_eq!(tracker.metrics_named("api_stars").len(), 1);
        assert_eq!(tracker.metrics_named("api_stars_success").len(), 1);
        assert!(tracker.metrics_named("api_stars_error").is_empty());
    }

    #[tokio::test]
    async fn test_track_api_call_error() {
        let tracker = running_tracker();

        let result: Result<(), std::io::Error> = tracker
            .track_api_call("repository", async {
                Err(std::io::Error::other("offline"))
            })
            .await;

        assert!(result.is_err());
        let errors = tracker.metrics_named("api_repository_error");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].metadata.get("errorType"),
            Some(&MetricValue::Text("Error".to_string()))
        );
        assert_eq!(
            errors[0].metadata.get("status"),
            Some(&MetricValue::Text("error".to_string()))
        );
    }

    #[test]
    fn test_track_navigation() {
        let tracker = running_tracker();
        tracker.track_navigation("/", "/users/octocat");

        let navigations = tracker.metrics_named("navigation");
        assert_eq!(navigations.len(), 1);
        assert_eq!(
            navigations[0].metadata.get("to"),
            Some(&MetricValue::Text("/users/octocat".to_string()))
        );
    }

    #[test]
    fn test_long_task_threshold() {
        let tracker = running_tracker();
        assert!(!tracker.record_long_task(Duration::from_millis(50), 0.0));
        assert!(tracker.record_long_task(Duration::from_millis(75), 10.0));

        let tasks = tracker.metrics_named("long_task");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].value, 75.0);
    }

    #[test]
    fn test_rate_metric_bands() {
        assert_eq!(rate_metric(WebVitalName::Lcp, 2500.0), Rating::Good);
        assert_eq!(rate_metric(WebVitalName::Lcp, 3000.0), Rating::NeedsImprovement);
        assert_eq!(rate_metric(WebVitalName::Lcp, 4001.0), Rating::Poor);
        assert_eq!(rate_metric(WebVitalName::Cls, 0.05), Rating::Good);
        assert_eq!(rate_metric(WebVitalName::Cls, 0.3), Rating::Poor);
        assert_eq!(rate_metric(WebVitalName::Inp, 500.0), Rating::NeedsImprovement);
    }

    #[test]
    fn test_report_web_vital_rates_and_mirrors() {
        let storage = Arc::new(MemoryStorage::new());
        let tracker = PerformanceTracker::new().with_storage(storage.clone());
        tracker.start();

        let reported = tracker.report_web_vital(vital(WebVitalName::Ttfb, 1200.0));
        assert_eq!(reported.rating, Rating::NeedsImprovement);
        tracker.report_web_vital(vital(WebVitalName::Fid, 20.0));

        assert_eq!(tracker.web_vitals().len(), 2);
        let raw = storage.get_item(WEB_VITALS_STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<WebVitalMetric> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, tracker.web_vitals());
        assert!(raw.contains("\"needs-improvement\""));
        assert!(raw.contains("\"TTFB\""));
    }

    #[test]
    fn test_web_vitals_are_bounded() {
        let storage = Arc::new(MemoryStorage::new());
        let tracker = PerformanceTracker::with_config(TrackerConfig {
            max_metrics: 3,
            ..Default::default()
        })
        .with_storage(storage.clone());
        tracker.start();

        for i in 0..5 {
            tracker.report_web_vital(WebVitalMetric {
                id: format!("v{i}"),
                ..vital(WebVitalName::Lcp, 1000.0)
            });
        }

        let ids: Vec<String> = tracker.web_vitals().into_iter().map(|v| v.id).collect();
        assert_eq!(ids, vec!["v2", "v3", "v4"]);

        let raw = storage.get_item(WEB_VITALS_STORAGE_KEY).unwrap().unwrap();
        let stored: Vec<WebVitalMetric> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 3);
    }

    #[test]
    fn test_snapshot_and_clear() {
        let tracker = running_tracker();
        tracker.record_metric("custom", 1.0, MetricMetadata::new());
        tracker.report_web_vital(vital(WebVitalName::Lcp, 1000.0));

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.custom_metrics.len(), 1);
        assert_eq!(snapshot.web_vitals.len(), 1);
        assert!(DateTime::parse_from_rfc3339(&snapshot.timestamp).is_ok());

        tracker.clear_metrics();
        assert!(tracker.metrics().is_empty());
        assert_eq!(tracker.web_vitals().len(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_memory_usage_on_linux() {
        let usage = memory_usage().unwrap();
        assert!(usage.resident_bytes > 0);
    }
}
