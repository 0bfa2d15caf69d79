use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use strum::{Display, EnumString};

use crate::error::{PricingError, PricingResult};

/// Offer term code AWS assigns to on-demand pricing
pub const ON_DEMAND_OFFER_TERM_CODE: &str = "JRTCKXETXF";

/// Currency whose price is extracted for analysis and output
pub const REPORTING_CURRENCY: &str = "USD";

/// Header fields of a price-list document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub format_version: String,
    pub disclaimer: String,
    pub offer_code: String,
    pub version: String,
    pub publication_date: String,
}

/// Product attributes as published in the price list.
///
/// Every field is free-form; a field the provider omits is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductAttributes {
    #[serde(rename = "servicecode")]
    pub service_code: String,
    pub location: String,
    pub location_type: String,
    pub instance_type: String,
    pub current_generation: String,
    pub instance_family: String,
    pub vcpu: String,
    pub physical_processor: String,
    pub clock_speed: String,
    pub memory: String,
    pub storage: String,
    pub network_performance: String,
    pub processor_architecture: String,
    /// "Shared", "Host" or "Dedicated"
    pub tenancy: String,
    pub operating_system: String,
    pub license_model: String,
    #[serde(rename = "capacitystatus")]
    pub capacity_status: String,
    pub pre_installed_sw: String,
}

/// One priceable product configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Product {
    pub sku: String,
    /// Provider grouping such as "Compute Instance"
    pub product_family: String,
    pub attributes: ProductAttributes,
}

/// Attribute used to group products for price comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FamilyKey {
    #[default]
    InstanceType,
    InstanceFamily,
    ProductFamily,
}

impl Product {
    /// Value of the grouping attribute selected by `key`
    pub fn family(&self, key: FamilyKey) -> &str {
        match key {
            FamilyKey::InstanceType => &self.attributes.instance_type,
            FamilyKey::InstanceFamily => &self.attributes.instance_family,
            FamilyKey::ProductFamily => &self.product_family,
        }
    }

    pub fn location(&self) -> &str {
        &self.attributes.location
    }
}

/// Commercial terms of a reserved offer.
///
/// Empty for on-demand terms. Providers spell the same option several ways
/// ("3yr" / "3 yr", "No Upfront" / "NoUpfront"); values are compared verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct TermAttributes {
    pub lease_contract_length: String,
    /// "standard" or "convertible"
    pub offering_class: String,
    pub purchase_option: String,
}

impl TermAttributes {
    pub fn new(
        lease_contract_length: impl Into<String>,
        offering_class: impl Into<String>,
        purchase_option: impl Into<String>,
    ) -> Self {
        Self {
            lease_contract_length: lease_contract_length.into(),
            offering_class: offering_class.into(),
            purchase_option: purchase_option.into(),
        }
    }
}

impl fmt::Display for TermAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{LeaseContractLength:{} OfferingClass:{} PurchaseOption:{}}}",
            self.lease_contract_length, self.offering_class, self.purchase_option
        )
    }
}

/// One priceable unit or tier within a term
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PriceDimension {
    pub rate_code: String,
    pub description: String,
    pub begin_range: String,
    pub end_range: String,
    pub unit: String,
    /// Currency code -> decimal price string
    pub price_per_unit: BTreeMap<String, String>,
}

impl PriceDimension {
    /// Raw price string for `currency`, if the dimension carries one
    pub fn price_in(&self, currency: &str) -> Option<&str> {
        self.price_per_unit.get(currency).map(String::as_str)
    }
}

/// One pricing term of one SKU
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermRecord {
    /// "OnDemand" or "Reserved" in AWS catalogs
    pub term_type: String,
    pub sku: String,
    /// Key of the term inside its SKU mapping, usually "<sku>.<offer term code>"
    pub term_key: String,
    pub offer_term_code: String,
    pub effective_date: String,
    pub term_attributes: TermAttributes,
    /// Keyed by the dimension's key in the document, iterated in key order
    pub price_dimensions: BTreeMap<String, PriceDimension>,
}

impl TermRecord {
    pub fn dimensions(&self) -> impl Iterator<Item = &PriceDimension> {
        self.price_dimensions.values()
    }
}

/// Decoded price list.
///
/// Terms are kept flat, sorted by (term type, SKU, term key), so every pass
/// walks them in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    metadata: CatalogMetadata,
    products: BTreeMap<String, Product>,
    terms: Vec<TermRecord>,
}

impl Catalog {
    pub fn new(
        metadata: CatalogMetadata,
        products: BTreeMap<String, Product>,
        mut terms: Vec<TermRecord>,
    ) -> Self {
        terms.sort_by(|a, b| {
            (&a.term_type, &a.sku, &a.term_key).cmp(&(&b.term_type, &b.sku, &b.term_key))
        });
        Self {
            metadata,
            products,
            terms,
        }
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    pub fn products(&self) -> &BTreeMap<String, Product> {
        &self.products
    }

    pub fn product(&self, sku: &str) -> Option<&Product> {
        self.products.get(sku)
    }

    pub fn terms(&self) -> &[TermRecord] {
        &self.terms
    }

    pub fn terms_with_code<'a>(
        &'a self,
        offer_term_code: &str,
    ) -> impl Iterator<Item = &'a TermRecord> {
        self.terms
            .iter()
            .filter(move |t| t.offer_term_code == offer_term_code)
    }
}

/// Entry of the offer index pointing at one service's price lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Offer {
    pub offer_code: String,
    pub version_index_url: String,
    pub current_version_url: String,
    pub current_region_index_url: String,
}

/// Discovery document listing every service offer.
///
/// URLs inside are relative to the pricing API host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferIndex {
    pub format_version: String,
    pub disclaimer: String,
    pub publication_date: String,
    pub offers: BTreeMap<String, Offer>,
}

impl OfferIndex {
    pub fn resolve(&self, offer_code: &str) -> PricingResult<&Offer> {
        self.offers
            .get(offer_code)
            .ok_or_else(|| PricingError::UnknownOffer(offer_code.to_string()))
    }
}
