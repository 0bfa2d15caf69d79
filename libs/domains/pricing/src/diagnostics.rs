//! Non-fatal findings collected while walking a price list.
//!
//! Catalogs routinely contain SKUs without on-demand pricing and dimensions
//! priced in other currencies. These reduce the data considered but never
//! abort a run; callers get them back next to the result and decide how to
//! surface them.

use serde::Serialize;
use std::collections::BTreeMap;
use strum::{Display, IntoStaticStr};
use tracing::warn;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MissingOnDemandTerm,
    MissingReportingCurrency,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// SKU has no on-demand term
    MissingOnDemandTerm { sku: String },
    /// Price dimension has no price in the reporting currency
    MissingReportingCurrency {
        sku: String,
        offer_term_code: String,
        rate_code: String,
        currency: String,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::MissingOnDemandTerm { .. } => DiagnosticKind::MissingOnDemandTerm,
            Diagnostic::MissingReportingCurrency { .. } => DiagnosticKind::MissingReportingCurrency,
        }
    }

    pub fn sku(&self) -> &str {
        match self {
            Diagnostic::MissingOnDemandTerm { sku } => sku,
            Diagnostic::MissingReportingCurrency { sku, .. } => sku,
        }
    }
}

/// Ordered collection of diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind() == kind).count()
    }

    /// Number of diagnostics per kind
    pub fn summary(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut summary = BTreeMap::new();
        for diagnostic in &self.entries {
            *summary.entry(diagnostic.kind()).or_insert(0) += 1;
        }
        summary
    }

    /// Log one warning per diagnostic kind with its count
    pub fn log_summary(&self, stage: &str) {
        for (kind, count) in self.summary() {
            warn!(stage = stage, kind = %kind, count = count, "Soft diagnostics reported");
        }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_currency(sku: &str) -> Diagnostic {
        Diagnostic::MissingReportingCurrency {
            sku: sku.to_string(),
            offer_term_code: "JRTCKXETXF".to_string(),
            rate_code: "6YS6EN2CT7".to_string(),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_summary_counts_per_kind() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Diagnostic::MissingOnDemandTerm {
            sku: "A".to_string(),
        });
        diagnostics.push(missing_currency("B"));
        diagnostics.push(missing_currency("C"));

        let summary = diagnostics.summary();
        assert_eq!(summary[&DiagnosticKind::MissingOnDemandTerm], 1);
        assert_eq!(summary[&DiagnosticKind::MissingReportingCurrency], 2);
        assert_eq!(diagnostics.count(DiagnosticKind::MissingReportingCurrency), 2);
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_order_is_preserved() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(missing_currency("B"));
        diagnostics.push(missing_currency("A"));

        let skus: Vec<_> = diagnostics.iter().map(Diagnostic::sku).collect();
        assert_eq!(skus, vec!["B", "A"]);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            DiagnosticKind::MissingOnDemandTerm.to_string(),
            "missing_on_demand_term"
        );
        let name: &'static str = DiagnosticKind::MissingReportingCurrency.into();
        assert_eq!(name, "missing_reporting_currency");
    }

    #[test]
    fn test_serializes_with_kind_tag() {
        let value = serde_json::to_value(Diagnostic::MissingOnDemandTerm {
            sku: "A".to_string(),
        })
        .unwrap();
        assert_eq!(value["kind"], "missing_on_demand_term");
        assert_eq!(value["sku"], "A");
    }
}
