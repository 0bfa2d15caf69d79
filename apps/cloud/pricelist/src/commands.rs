//! Command implementations

use domain_pricing::{Diagnostics, FamilyKey, LoadedCatalog, PriceListService};
use eyre::{Result, WrapErr};
use observability::{CatalogMetrics, StageTimer};
use std::path::Path;
use tracing::info;

use crate::export;
use crate::report::{self, OutputFormat};

/// Rows written by an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub products: usize,
    pub prices: usize,
}

fn load(service: &PriceListService, input: &Path) -> Result<LoadedCatalog> {
    let _timer = StageTimer::new("load");
    let loaded = service
        .load_file(input)
        .wrap_err_with(|| format!("Failed to load price list {}", input.display()))?;

    CatalogMetrics::record_catalog_loaded(
        &loaded.catalog.metadata().offer_code,
        loaded.catalog.products().len(),
        loaded.catalog.terms().len(),
    );
    Ok(loaded)
}

fn record_diagnostics(stage: &str, diagnostics: &Diagnostics) {
    for (kind, count) in diagnostics.summary() {
        CatalogMetrics::record_diagnostics(stage, kind.into(), count);
    }
}

/// Decode, validate and project a price list into the two CSV tables
pub fn export(
    service: &PriceListService,
    input: &Path,
    products_csv: &Path,
    prices_csv: &Path,
    headers: bool,
) -> Result<ExportSummary> {
    let loaded = load(service, input)?;

    let mut timer = StageTimer::new("project");
    let product_rows = service.product_rows(&loaded.catalog);
    let projection = service.price_rows(&loaded.catalog);
    timer.stop();
    record_diagnostics("project", &projection.diagnostics);

    let _timer = StageTimer::new("write");
    let products = export::write_rows(products_csv, &product_rows, headers)?;
    CatalogMetrics::record_rows_written("products", products);
    let prices = export::write_rows(prices_csv, &projection.rows, headers)?;
    CatalogMetrics::record_rows_written("prices", prices);

    info!(
        products = products,
        prices = prices,
        skipped_dimensions = projection.diagnostics.len(),
        currency = %service.options().reporting_currency,
        "Export complete"
    );
    Ok(ExportSummary { products, prices })
}

/// Per-family on-demand price extremes, rendered in `format`
pub fn analyze(
    service: &PriceListService,
    input: &Path,
    group_by: FamilyKey,
    families: Vec<String>,
    format: OutputFormat,
) -> Result<String> {
    let loaded = load(service, input)?;

    let mut timer = StageTimer::new("analyze");
    let analysis = service.analyze(&loaded.catalog, group_by, families)?;
    timer.stop();

    record_diagnostics("analyze", &analysis.diagnostics);
    CatalogMetrics::set_families_analyzed(&group_by.to_string(), analysis.families.len());
    info!(
        group_by = %group_by,
        families = analysis.families.len(),
        unclassified = analysis.unclassified,
        term_code = %service.options().on_demand_term_code,
        currency = %service.options().reporting_currency,
        "Analysis complete"
    );

    report::render_analysis(&analysis, format).wrap_err("Failed to render analysis")
}

/// Offer term codes of a valid price list
pub fn validate(service: &PriceListService, input: &Path) -> Result<String> {
    let loaded = load(service, input)?;
    Ok(report::render_term_codes(&loaded.report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::PricingOptions;
    use std::path::PathBuf;

    fn fixture() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../../libs/domains/pricing/tests/fixtures/ec2-current.json")
    }

    #[test]
    fn test_export_writes_both_tables() {
        let dir = tempfile::tempdir().unwrap();
        let products = dir.path().join("products.csv");
        let prices = dir.path().join("prices.csv");

        let summary = export(
            &PriceListService::default(),
            &fixture(),
            &products,
            &prices,
            false,
        )
        .unwrap();
        assert_eq!(summary, ExportSummary { products: 5, prices: 6 });

        let product_lines = std::fs::read_to_string(&products).unwrap();
        assert_eq!(product_lines.lines().count(), 5);
        assert!(product_lines.lines().next().unwrap().starts_with("7W6DMKN2UQ4RVGVT,m5.xlarge"));

        let price_lines = std::fs::read_to_string(&prices).unwrap();
        let first = price_lines.lines().next().unwrap();
        assert!(first.starts_with("0,7W6DMKN2UQ4RVGVT,JRTCKXETXF,"));
        assert!(!price_lines.contains("CHJ7GRGVE3M6QXJQ"));
    }

    #[test]
    fn test_export_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let products = dir.path().join("products.csv");
        let prices = dir.path().join("prices.csv");

        export(&PriceListService::default(), &fixture(), &products, &prices, true).unwrap();

        let product_lines = std::fs::read_to_string(&products).unwrap();
        assert!(product_lines.starts_with("sku,instance_type,"));
        assert_eq!(product_lines.lines().count(), 6);
    }

    #[test]
    fn test_export_missing_input_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let products = dir.path().join("products.csv");
        let prices = dir.path().join("prices.csv");

        let err = export(
            &PriceListService::default(),
            &dir.path().join("absent.json"),
            &products,
            &prices,
            false,
        )
        .unwrap_err();

        assert!(format!("{err:#}").contains("absent.json"));
        assert!(!products.exists());
        assert!(!prices.exists());
    }

    #[test]
    fn test_analyze_json() {
        let rendered = analyze(
            &PriceListService::default(),
            &fixture(),
            FamilyKey::InstanceType,
            Vec::new(),
            OutputFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let families = value["families"].as_array().unwrap();
        assert_eq!(families.len(), 2);
        assert_eq!(families[0]["family"], "m5.xlarge");
        assert_eq!(families[0]["range"]["lowest"]["sku"], "B3ZQ9G2HZCZMAYTC");
        assert_eq!(families[0]["range"]["highest"]["sku"], "7W6DMKN2UQ4RVGVT");
        assert!(families[1]["range"].is_null());
    }

    #[test]
    fn test_analyze_in_other_currency() {
        let service = PriceListService::new(PricingOptions {
            reporting_currency: "CNY".to_string(),
            ..Default::default()
        });
        let rendered = analyze(
            &service,
            &fixture(),
            FamilyKey::InstanceType,
            Vec::new(),
            OutputFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["families"][1]["family"], "t3.micro");
        assert_eq!(value["families"][1]["range"]["lowest"]["price"], "0.0832");
        assert_eq!(value["unclassified"], 1);
    }

    #[test]
    fn test_analyze_family_filter() {
        let rendered = analyze(
            &PriceListService::default(),
            &fixture(),
            FamilyKey::InstanceType,
            vec!["t3.micro".to_string()],
            OutputFormat::Table,
        )
        .unwrap();

        assert!(rendered.contains("t3.micro"));
        assert!(!rendered.contains("m5.xlarge"));
    }

    #[test]
    fn test_validate_lists_codes() {
        let rendered = validate(&PriceListService::default(), &fixture()).unwrap();
        for code in ["4NA7Y494T4", "6QCMYABX3D", "JRTCKXETXF"] {
            assert!(rendered.contains(code));
        }
        assert!(rendered.contains("All Upfront"));
    }
}
