/*!
 * # Metrics Module
 *
 * In-process metrics for the calculation endpoints.
 *
 * ## Features
 *
 * - HTTP request/response metrics (count, latency, status classes)
 * - Calculation metrics (forecasts, pricing recommendations, restock checks,
 *   anomaly screening, validation failures)
 *
 * ## Metrics Formats
 *
 * - Prometheus text format at `/metrics`
 * - JSON format at `/metrics/json`
 */

use axum::{http::header, response::IntoResponse, Json};
use dashmap::DashMap;
use serde_json::json;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, value: u64) {
        self.value.fetch_add(value, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Gauge {
    value: Arc<AtomicI64>,
}

impl Gauge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Count and running sum of observations. The sum is kept in microunits so
/// sub-second latencies are not truncated away.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    sum_micros: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, value: f64) {
        let micros = (value.max(0.0) * 1_000_000.0).round() as u64;
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn get_sum(&self) -> f64 {
        self.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }
}

#[derive(Debug, Default)]
pub struct MetricsRegistry {
    counters: DashMap<String, Counter>,
    gauges: DashMap<String, Gauge>,
    histograms: DashMap<String, Histogram>,
}

fn sorted<V: Clone>(map: &DashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<(String, V)> = map
        .iter()
        .map(|entry| (entry.key().clone(), entry.value().clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create_counter(&self, name: &str) -> Counter {
        self.counters
            .entry(name.to_string())
            .or_insert_with(Counter::new)
            .clone()
    }

    pub fn get_or_create_gauge(&self, name: &str) -> Gauge {
        self.gauges
            .entry(name.to_string())
            .or_insert_with(Gauge::new)
            .clone()
    }

    pub fn get_or_create_histogram(&self, name: &str) -> Histogram {
        self.histograms
            .entry(name.to_string())
            .or_insert_with(Histogram::new)
            .clone()
    }

    /// Prometheus text exposition, metrics sorted by name.
    pub fn export_metrics(&self) -> String {
        let mut output = String::new();

        for (name, counter) in sorted(&self.counters) {
            output.push_str(&format!("# TYPE {} counter\n", name));
            output.push_str(&format!("{} {}\n", name, counter.get()));
        }

        for (name, gauge) in sorted(&self.gauges) {
            output.push_str(&format!("# TYPE {} gauge\n", name));
            output.push_str(&format!("{} {}\n", name, gauge.get()));
        }

        for (name, histogram) in sorted(&self.histograms) {
            output.push_str(&format!("# TYPE {} summary\n", name));
            output.push_str(&format!("{}_count {}\n", name, histogram.get_count()));
            output.push_str(&format!("{}_sum {}\n", name, histogram.get_sum()));
        }

        output
    }

    pub fn export_metrics_json(&self) -> serde_json::Value {
        let counters: serde_json::Map<String, serde_json::Value> = sorted(&self.counters)
            .into_iter()
            .map(|(name, counter)| (name, json!(counter.get())))
            .collect();

        let gauges: serde_json::Map<String, serde_json::Value> = sorted(&self.gauges)
            .into_iter()
            .map(|(name, gauge)| (name, json!(gauge.get())))
            .collect();

        let histograms: serde_json::Map<String, serde_json::Value> = sorted(&self.histograms)
            .into_iter()
            .map(|(name, histogram)| {
                (
                    name,
                    json!({
                        "count": histogram.get_count(),
                        "sum": histogram.get_sum(),
                    }),
                )
            })
            .collect();

        json!({
            "counters": counters,
            "gauges": gauges,
            "histograms": histograms,
        })
    }
}

// Global metrics registry
lazy_static::lazy_static! {
    pub static ref METRICS: MetricsRegistry = MetricsRegistry::new();
}

// HTTP endpoint-specific metrics
pub struct EndpointMetrics {
    pub requests_total: Counter,
    pub in_flight: Gauge,
    pub latency: Histogram,
    pub errors_total: Counter,
    pub status_2xx: Counter,
    pub status_4xx: Counter,
    pub status_5xx: Counter,
}

impl EndpointMetrics {
    pub fn new(registry: &MetricsRegistry) -> Self {
        Self {
            requests_total: registry.get_or_create_counter("http_requests_total"),
            in_flight: registry.get_or_create_gauge("http_requests_in_flight"),
            latency: registry.get_or_create_histogram("http_request_duration_seconds"),
            errors_total: registry.get_or_create_counter("http_errors_total"),
            status_2xx: registry.get_or_create_counter("http_status_2xx_total"),
            status_4xx: registry.get_or_create_counter("http_status_4xx_total"),
            status_5xx: registry.get_or_create_counter("http_status_5xx_total"),
        }
    }

    pub fn record_request(&self, duration: Duration, status_code: u16) {
        self.requests_total.inc();
        self.latency.observe(duration.as_secs_f64());

        match status_code {
            200..=299 => self.status_2xx.inc(),
            400..=499 => {
                self.status_4xx.inc();
                self.errors_total.inc();
            }
            500..=599 => {
                self.status_5xx.inc();
                self.errors_total.inc();
            }
            _ => {}
        }
    }
}

/// Counters for the calculation endpoints
pub struct CalculationMetrics {
    pub forecasts_total: Counter,
    pub forecast_series_total: Counter,
    pub pricing_requests_total: Counter,
    pub pricing_recommendations_total: Counter,
    pub price_increases_total: Counter,
    pub price_decreases_total: Counter,
    pub replenishment_products_total: Counter,
    pub products_at_risk_total: Counter,
    pub anomaly_checks_total: Counter,
    pub anomalies_flagged_total: Counter,
    pub validation_failures_total: Counter,
    pub calculation_duration: Histogram,
}

impl CalculationMetrics {
    pub fn new(registry: &MetricsRegistry) -> Self {
        Self {
            forecasts_total: registry.get_or_create_counter("forecasts_total"),
            forecast_series_total: registry.get_or_create_counter("forecast_series_total"),
            pricing_requests_total: registry.get_or_create_counter("pricing_requests_total"),
            pricing_recommendations_total: registry
                .get_or_create_counter("pricing_recommendations_total"),
            price_increases_total: registry.get_or_create_counter("price_increases_total"),
            price_decreases_total: registry.get_or_create_counter("price_decreases_total"),
            replenishment_products_total: registry
                .get_or_create_counter("replenishment_products_total"),
            products_at_risk_total: registry.get_or_create_counter("products_at_risk_total"),
            anomaly_checks_total: registry.get_or_create_counter("anomaly_checks_total"),
            anomalies_flagged_total: registry.get_or_create_counter("anomalies_flagged_total"),
            validation_failures_total: registry.get_or_create_counter("validation_failures_total"),
            calculation_duration: registry
                .get_or_create_histogram("calculation_duration_seconds"),
        }
    }

    pub fn record_forecast(&self, series: usize, elapsed: Duration) {
        self.forecasts_total.inc();
        self.forecast_series_total.inc_by(series as u64);
        self.calculation_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_pricing(
        &self,
        recommendations: usize,
        increases: usize,
        decreases: usize,
        elapsed: Duration,
    ) {
        self.pricing_requests_total.inc();
        self.pricing_recommendations_total.inc_by(recommendations as u64);
        self.price_increases_total.inc_by(increases as u64);
        self.price_decreases_total.inc_by(decreases as u64);
        self.calculation_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_replenishment(&self, products: usize, at_risk: usize, elapsed: Duration) {
        self.replenishment_products_total.inc_by(products as u64);
        self.products_at_risk_total.inc_by(at_risk as u64);
        self.calculation_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_anomaly_check(&self, flagged: usize, elapsed: Duration) {
        self.anomaly_checks_total.inc();
        self.anomalies_flagged_total.inc_by(flagged as u64);
        self.calculation_duration.observe(elapsed.as_secs_f64());
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures_total.inc();
    }
}

// Global instances
lazy_static::lazy_static! {
    pub static ref ENDPOINT_METRICS: EndpointMetrics = EndpointMetrics::new(&METRICS);
    pub static ref CALCULATION_METRICS: CalculationMetrics = CalculationMetrics::new(&METRICS);
}

// HTTP endpoint handler for metrics
pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        METRICS.export_metrics(),
    )
}

pub async fn metrics_json_handler() -> Json<serde_json::Value> {
    Json(METRICS.export_metrics_json())
}
