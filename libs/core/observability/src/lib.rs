//! Observability utilities for price-list processing.
//!
//! This crate provides:
//! - Prometheus metrics recording and rendering
//! - Catalog metrics: sizes, stage timings, rows written, soft diagnostics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, render_metrics, CatalogMetrics, StageTimer};
//!
//! init_metrics()?;
//!
//! let timer = StageTimer::new("decode");
//! // ... decode ...
//! timer.stop();
//! CatalogMetrics::record_catalog_loaded("AmazonEC2", 1200, 5400);
//!
//! eprintln!("{}", render_metrics());
//! ```

pub mod catalog;

pub use catalog::{CatalogMetrics, StageTimer};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Installs the global recorder on the first call; later calls return the
/// same handle.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Prometheus text exposition of everything recorded so far
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    describe_gauge!(
        "pricelist_catalog_products",
        "Products in the last loaded price list"
    );
    describe_gauge!(
        "pricelist_catalog_terms",
        "Pricing terms in the last loaded price list"
    );
    describe_histogram!(
        "pricelist_stage_duration_seconds",
        "Duration of a pipeline stage in seconds"
    );
    describe_counter!(
        "pricelist_rows_written_total",
        "Rows written per output table"
    );
    describe_counter!(
        "pricelist_diagnostics_total",
        "Soft diagnostics by kind and stage"
    );
    describe_gauge!(
        "pricelist_families_analyzed",
        "Families in the last price analysis"
    );
    describe_counter!(
        "pricelist_fetched_bytes_total",
        "Bytes downloaded from the pricing API"
    );
}
