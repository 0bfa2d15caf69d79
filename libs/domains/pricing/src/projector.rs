//! Flat row views of a catalog, ready for a tabular writer.

use serde::Serialize;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::models::{Catalog, Product};

/// One row of the product table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    pub sku: String,
    pub instance_type: String,
    pub instance_family: String,
    pub storage: String,
    pub tenancy: String,
    pub operating_system: String,
    pub license_model: String,
    pub capacity_status: String,
    pub pre_installed_sw: String,
    pub location: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        let attrs = &product.attributes;
        Self {
            sku: product.sku.clone(),
            instance_type: attrs.instance_type.clone(),
            instance_family: attrs.instance_family.clone(),
            storage: attrs.storage.clone(),
            tenancy: attrs.tenancy.clone(),
            operating_system: attrs.operating_system.clone(),
            license_model: attrs.license_model.clone(),
            capacity_status: attrs.capacity_status.clone(),
            pre_installed_sw: attrs.pre_installed_sw.clone(),
            location: attrs.location.clone(),
        }
    }
}

/// One row of the price table: a term dimension priced in the reporting currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRow {
    /// Zero-based emission counter; a synthetic row id only
    pub seq: usize,
    pub sku: String,
    pub offer_term_code: String,
    pub effective_date: String,
    pub rate_code: String,
    pub begin_range: String,
    pub end_range: String,
    pub unit: String,
    pub price: String,
    pub lease_contract_length: String,
    pub offering_class: String,
    pub purchase_option: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceProjection {
    pub rows: Vec<PriceRow>,
    /// Dimensions left out for lacking the reporting currency
    pub diagnostics: Diagnostics,
}

/// One row per product, in SKU order
pub fn product_rows(catalog: &Catalog) -> Vec<ProductRow> {
    catalog.products().values().map(ProductRow::from).collect()
}

/// One row per (term, dimension) priced in `currency`
pub fn price_rows(catalog: &Catalog, currency: &str) -> PriceProjection {
    let mut projection = PriceProjection::default();

    for term in catalog.terms() {
        let attrs = &term.term_attributes;
        for dimension in term.dimensions() {
            let Some(price) = dimension.price_in(currency) else {
                projection
                    .diagnostics
                    .push(Diagnostic::MissingReportingCurrency {
                        sku: term.sku.clone(),
                        offer_term_code: term.offer_term_code.clone(),
                        rate_code: dimension.rate_code.clone(),
                        currency: currency.to_string(),
                    });
                continue;
            };

            projection.rows.push(PriceRow {
                seq: projection.rows.len(),
                sku: term.sku.clone(),
                offer_term_code: term.offer_term_code.clone(),
                effective_date: term.effective_date.clone(),
                rate_code: dimension.rate_code.clone(),
                begin_range: dimension.begin_range.clone(),
                end_range: dimension.end_range.clone(),
                unit: dimension.unit.clone(),
                price: price.to_string(),
                lease_contract_length: attrs.lease_contract_length.clone(),
                offering_class: attrs.offering_class.clone(),
                purchase_option: attrs.purchase_option.clone(),
            });
        }
    }

    projection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode_catalog;
    use serde_json::json;

    fn catalog() -> Catalog {
        let document = json!({
            "products": {
                "B": { "attributes": {
                    "instanceType": "m5.large",
                    "instanceFamily": "General purpose",
                    "storage": "EBS only",
                    "tenancy": "Shared",
                    "operatingSystem": "Linux",
                    "licenseModel": "No License required",
                    "capacitystatus": "Used",
                    "preInstalledSw": "NA",
                    "location": "US East (N. Virginia)"
                }},
                "A": { "attributes": { "instanceType": "t3.micro" } }
            },
            "terms": {
                "OnDemand": {
                    "B": { "B.JRTCKXETXF": {
                        "offerTermCode": "JRTCKXETXF",
                        "effectiveDate": "2024-01-01T00:00:00Z",
                        "priceDimensions": {
                            "B.JRTCKXETXF.6YS6EN2CT7": {
                                "rateCode": "B.JRTCKXETXF.6YS6EN2CT7",
                                "unit": "Hrs", "beginRange": "0", "endRange": "Inf",
                                "pricePerUnit": { "USD": "0.096" }
                            },
                            "B.JRTCKXETXF.CNY": {
                                "rateCode": "B.JRTCKXETXF.CNY",
                                "unit": "Hrs",
                                "pricePerUnit": { "CNY": "0.65" }
                            }
                        }
                    }}
                },
                "Reserved": {
                    "B": { "B.4NA7Y494T4": {
                        "offerTermCode": "4NA7Y494T4",
                        "effectiveDate": "2024-02-01T00:00:00Z",
                        "priceDimensions": {
                            "B.4NA7Y494T4.2TG2D8R56U": {
                                "rateCode": "B.4NA7Y494T4.2TG2D8R56U",
                                "unit": "Quantity",
                                "pricePerUnit": { "USD": "0" }
                            },
                            "B.4NA7Y494T4.6YS6EN2CT7": {
                                "rateCode": "B.4NA7Y494T4.6YS6EN2CT7",
                                "unit": "Hrs",
                                "pricePerUnit": { "USD": "0.06" }
                            }
                        },
                        "termAttributes": {
                            "LeaseContractLength": "1yr",
                            "OfferingClass": "standard",
                            "PurchaseOption": "No Upfront"
                        }
                    }}
                }
            }
        });
        decode_catalog(serde_json::to_vec(&document).unwrap().as_slice()).unwrap()
    }

    #[test]
    fn test_product_rows_one_per_sku_sorted() {
        let rows = product_rows(&catalog());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "A");
        assert_eq!(rows[0].tenancy, "");
        assert_eq!(
            rows[1],
            ProductRow {
                sku: "B".to_string(),
                instance_type: "m5.large".to_string(),
                instance_family: "General purpose".to_string(),
                storage: "EBS only".to_string(),
                tenancy: "Shared".to_string(),
                operating_system: "Linux".to_string(),
                license_model: "No License required".to_string(),
                capacity_status: "Used".to_string(),
                pre_installed_sw: "NA".to_string(),
                location: "US East (N. Virginia)".to_string(),
            }
        );
    }

    #[test]
    fn test_price_rows_skip_other_currencies() {
        let projection = price_rows(&catalog(), "USD");

        assert_eq!(projection.rows.len(), 3);
        assert_eq!(projection.diagnostics.len(), 1);
        assert!(projection.rows.iter().all(|r| r.rate_code != "B.JRTCKXETXF.CNY"));

        let seqs: Vec<_> = projection.rows.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
    }

    #[test]
    fn test_price_row_columns() {
        let projection = price_rows(&catalog(), "USD");

        let on_demand = &projection.rows[0];
        assert_eq!(on_demand.offer_term_code, "JRTCKXETXF");
        assert_eq!(on_demand.begin_range, "0");
        assert_eq!(on_demand.end_range, "Inf");
        assert_eq!(on_demand.price, "0.096");
        assert_eq!(on_demand.lease_contract_length, "");

        let upfront = &projection.rows[1];
        assert_eq!(upfront.rate_code, "B.4NA7Y494T4.2TG2D8R56U");
        assert_eq!(upfront.unit, "Quantity");
        assert_eq!(upfront.effective_date, "2024-02-01T00:00:00Z");
        assert_eq!(upfront.lease_contract_length, "1yr");
        assert_eq!(upfront.offering_class, "standard");
        assert_eq!(upfront.purchase_option, "No Upfront");
    }

    #[test]
    fn test_projection_is_deterministic() {
        assert_eq!(price_rows(&catalog(), "USD"), price_rows(&catalog(), "USD"));
        assert_eq!(product_rows(&catalog()), product_rows(&catalog()));
    }
}
