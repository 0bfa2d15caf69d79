//! Price-list processing metrics.

use metrics::{counter, gauge, histogram};
use std::time::Instant;

/// Catalog metrics recorder
pub struct CatalogMetrics;

impl CatalogMetrics {
    /// Record the size of a freshly loaded price list
    pub fn record_catalog_loaded(offer_code: &str, products: usize, terms: usize) {
        gauge!("pricelist_catalog_products", "offer_code" => offer_code.to_string())
            .set(products as f64);
        gauge!("pricelist_catalog_terms", "offer_code" => offer_code.to_string())
            .set(terms as f64);

        tracing::debug!(
            offer_code = offer_code,
            products = products,
            terms = terms,
            "Recorded catalog size"
        );
    }

    /// Record rows written to one output table
    pub fn record_rows_written(table: &str, rows: usize) {
        counter!("pricelist_rows_written_total", "table" => table.to_string())
            .increment(rows as u64);
    }

    /// Record soft diagnostics of one kind raised during `stage`
    pub fn record_diagnostics(stage: &str, kind: &str, count: usize) {
        counter!(
            "pricelist_diagnostics_total",
            "stage" => stage.to_string(),
            "kind" => kind.to_string()
        )
        .increment(count as u64);
    }

    /// Set the number of families in the last analysis
    pub fn set_families_analyzed(group_by: &str, families: usize) {
        gauge!("pricelist_families_analyzed", "group_by" => group_by.to_string())
            .set(families as f64);
    }

    /// Record bytes downloaded for one document
    pub fn record_fetched_bytes(document: &str, bytes: usize) {
        counter!("pricelist_fetched_bytes_total", "document" => document.to_string())
            .increment(bytes as u64);
    }
}

/// Timer guard for pipeline stage durations.
///
/// Records the duration when `stop()` is called or when dropped.
pub struct StageTimer {
    start: Instant,
    stage: String,
    stopped: bool,
}

impl StageTimer {
    /// Start a new timer for a stage
    pub fn new(stage: &str) -> Self {
        Self {
            start: Instant::now(),
            stage: stage.to_string(),
            stopped: false,
        }
    }

    /// Stop the timer and record the duration. Returns duration in milliseconds.
    pub fn stop(&mut self) -> u64 {
        if self.stopped {
            return 0;
        }
        self.stopped = true;

        let duration = self.start.elapsed();

        histogram!(
            "pricelist_stage_duration_seconds",
            "stage" => self.stage.clone()
        )
        .record(duration.as_secs_f64());

        tracing::debug!(
            stage = %self.stage,
            duration_ms = duration.as_millis() as u64,
            "Stage finished"
        );

        duration.as_millis() as u64
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        // Record on drop if not explicitly stopped
        if !self.stopped {
            self.stop();
        }
    }
}
