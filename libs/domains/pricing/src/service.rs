use std::io::Read;
use std::path::Path;
use tracing::{info, instrument};

use crate::analyzer::{self, AnalysisOptions, PriceAnalysis};
use crate::decoder;
use crate::error::PricingResult;
use crate::extractor::{self, TermsBySku};
use crate::models::{Catalog, FamilyKey, ON_DEMAND_OFFER_TERM_CODE, REPORTING_CURRENCY};
use crate::projector::{self, PriceProjection, ProductRow};
use crate::validator::{self, ValidationReport};

/// Settings shared by every pass over a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingOptions {
    pub on_demand_term_code: String,
    pub reporting_currency: String,
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            on_demand_term_code: ON_DEMAND_OFFER_TERM_CODE.to_string(),
            reporting_currency: REPORTING_CURRENCY.to_string(),
        }
    }
}

/// Validated catalog together with its validation report
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub report: ValidationReport,
}

/// Runs the decode, validate, extract, analyze and project passes
#[derive(Debug, Clone, Default)]
pub struct PriceListService {
    options: PricingOptions,
}

impl PriceListService {
    pub fn new(options: PricingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PricingOptions {
        &self.options
    }

    /// Decode a document and validate it; an invalid catalog is never returned
    #[instrument(skip_all)]
    pub fn load<R: Read>(&self, reader: R) -> PricingResult<LoadedCatalog> {
        let catalog = decoder::decode_catalog(reader)?;
        self.checked(catalog)
    }

    /// Same as [`load`](Self::load) for a file on disk
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> PricingResult<LoadedCatalog> {
        let catalog = decoder::decode_catalog_file(path)?;
        self.checked(catalog)
    }

    fn checked(&self, catalog: Catalog) -> PricingResult<LoadedCatalog> {
        let report = validator::validate(&catalog)?;
        info!(
            offer_code = %catalog.metadata().offer_code,
            version = %catalog.metadata().version,
            products = catalog.products().len(),
            terms = report.terms_checked,
            term_codes = report.term_codes.len(),
            "Price list loaded and validated"
        );
        Ok(LoadedCatalog { catalog, report })
    }

    /// On-demand term per SKU
    pub fn on_demand_terms<'a>(&self, catalog: &'a Catalog) -> PricingResult<TermsBySku<'a>> {
        extractor::extract_terms(catalog, &self.options.on_demand_term_code)
    }

    /// Per-family price extremes over on-demand terms
    #[instrument(skip(self, catalog, families))]
    pub fn analyze(
        &self,
        catalog: &Catalog,
        group_by: FamilyKey,
        families: impl IntoIterator<Item = String>,
    ) -> PricingResult<PriceAnalysis> {
        let terms = self.on_demand_terms(catalog)?;
        let options = AnalysisOptions {
            group_by,
            families: families.into_iter().collect(),
            reporting_currency: self.options.reporting_currency.clone(),
        };
        let analysis = analyzer::analyze(catalog, &terms, &options)?;
        analysis.diagnostics.log_summary("analyze");
        Ok(analysis)
    }

    pub fn product_rows(&self, catalog: &Catalog) -> Vec<ProductRow> {
        projector::product_rows(catalog)
    }

    pub fn price_rows(&self, catalog: &Catalog) -> PriceProjection {
        let projection = projector::price_rows(catalog, &self.options.reporting_currency);
        projection.diagnostics.log_summary("project");
        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PricingError;

    const DOCUMENT: &str = r#"{
        "offerCode": "AmazonEC2",
        "products": {
            "A": { "attributes": { "instanceType": "m5.large", "location": "EU (Ireland)" } },
            "B": { "attributes": { "instanceType": "m5.large", "location": "US East (Ohio)" } }
        },
        "terms": { "OnDemand": {
            "A": { "A.JRTCKXETXF": { "offerTermCode": "JRTCKXETXF", "priceDimensions": {
                "A.JRTCKXETXF.6YS6EN2CT7": {
                    "unit": "Hrs",
                    "pricePerUnit": { "USD": "0.107", "EUR": "0.1" }
                }
            }}},
            "B": { "B.JRTCKXETXF": { "offerTermCode": "JRTCKXETXF", "priceDimensions": {
                "B.JRTCKXETXF.6YS6EN2CT7": { "unit": "Hrs", "pricePerUnit": { "USD": "0.096" } }
            }}}
        }}
    }"#;

    #[test]
    fn test_load_and_analyze() {
        let service = PriceListService::default();
        let loaded = service.load(DOCUMENT.as_bytes()).unwrap();

        let analysis = service
            .analyze(&loaded.catalog, FamilyKey::InstanceType, Vec::new())
            .unwrap();
        let range = analysis.families[0].range.as_ref().unwrap();
        assert_eq!(range.lowest.sku, "B");
        assert_eq!(range.highest.sku, "A");
    }

    #[test]
    fn test_reporting_currency_is_configurable() {
        let service = PriceListService::new(PricingOptions {
            reporting_currency: "EUR".to_string(),
            ..Default::default()
        });
        assert_eq!(service.options().reporting_currency, "EUR");
        assert_eq!(service.options().on_demand_term_code, "JRTCKXETXF");
        let loaded = service.load(DOCUMENT.as_bytes()).unwrap();

        let projection = service.price_rows(&loaded.catalog);
        assert_eq!(projection.rows.len(), 1);
        assert_eq!(projection.rows[0].price, "0.1");
        assert_eq!(projection.diagnostics.len(), 1);
    }

    #[test]
    fn test_load_rejects_dangling_sku() {
        let service = PriceListService::default();
        let document = r#"{"products": {}, "terms": {"OnDemand": {"X": {"X.JRTCKXETXF": {}}}}}"#;

        assert!(matches!(
            service.load(document.as_bytes()),
            Err(PricingError::DanglingSku { .. })
        ));
    }
}
