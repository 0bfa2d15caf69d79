//! Price-list document decoding
//!
//! AWS Price List API documents:
//! https://docs.aws.amazon.com/awsaccountbilling/latest/aboutv2/reading-an-offer.html

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

use crate::error::{DecodeError, PricingResult};
use crate::models::{
    Catalog, CatalogMetadata, OfferIndex, PriceDimension, Product, TermAttributes, TermRecord,
};

/// Term body as it appears under terms -> term type -> SKU -> term key
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTerm {
    offer_term_code: String,
    effective_date: String,
    price_dimensions: BTreeMap<String, PriceDimension>,
    term_attributes: TermAttributes,
}

type RawTerms = BTreeMap<String, BTreeMap<String, BTreeMap<String, RawTerm>>>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCatalog {
    format_version: String,
    disclaimer: String,
    offer_code: String,
    version: String,
    publication_date: String,
    products: BTreeMap<String, Product>,
    terms: RawTerms,
}

impl From<RawCatalog> for Catalog {
    fn from(raw: RawCatalog) -> Self {
        let metadata = CatalogMetadata {
            format_version: raw.format_version,
            disclaimer: raw.disclaimer,
            offer_code: raw.offer_code,
            version: raw.version,
            publication_date: raw.publication_date,
        };

        // Map keys are authoritative for SKUs
        let products = raw
            .products
            .into_iter()
            .map(|(sku, mut product)| {
                product.sku = sku.clone();
                (sku, product)
            })
            .collect();

        let mut terms = Vec::new();
        for (term_type, by_sku) in raw.terms {
            for (sku, by_key) in by_sku {
                for (term_key, raw_term) in by_key {
                    terms.push(flatten_term(&term_type, &sku, term_key, raw_term));
                }
            }
        }

        Catalog::new(metadata, products, terms)
    }
}

fn flatten_term(term_type: &str, sku: &str, term_key: String, raw: RawTerm) -> TermRecord {
    let offer_term_code = if raw.offer_term_code.is_empty() {
        term_key.clone()
    } else {
        raw.offer_term_code
    };

    let price_dimensions = raw
        .price_dimensions
        .into_iter()
        .map(|(key, mut dimension)| {
            if dimension.rate_code.is_empty() {
                dimension.rate_code = key.clone();
            }
            (key, dimension)
        })
        .collect();

    TermRecord {
        term_type: term_type.to_string(),
        sku: sku.to_string(),
        term_key,
        offer_term_code,
        effective_date: raw.effective_date,
        term_attributes: raw.term_attributes,
        price_dimensions,
    }
}

/// Decode exactly one top-level JSON document from `reader`.
///
/// The whole stream is consumed so concatenated documents are detected.
fn decode_single<T, R>(reader: R) -> Result<T, DecodeError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut documents = serde_json::Deserializer::from_reader(reader).into_iter::<T>();

    let first = match documents.next() {
        Some(document) => document?,
        None => return Err(DecodeError::EntryCount(0)),
    };

    let mut count = 1;
    for document in documents {
        document?;
        count += 1;
    }

    if count != 1 {
        return Err(DecodeError::EntryCount(count));
    }
    Ok(first)
}

/// Decode a price-list document
pub fn decode_catalog<R: Read>(reader: R) -> PricingResult<Catalog> {
    let raw: RawCatalog = decode_single(reader)?;
    let catalog = Catalog::from(raw);

    debug!(
        offer_code = %catalog.metadata().offer_code,
        version = %catalog.metadata().version,
        products = catalog.products().len(),
        terms = catalog.terms().len(),
        "Decoded price list"
    );

    Ok(catalog)
}

/// Open and decode a price-list file
pub fn decode_catalog_file(path: &Path) -> PricingResult<Catalog> {
    let file = File::open(path)?;
    decode_catalog(BufReader::new(file))
}

/// Decode the offer index discovery document
pub fn decode_offer_index<R: Read>(reader: R) -> PricingResult<OfferIndex> {
    let index: OfferIndex = decode_single(reader)?;
    debug!(offers = index.offers.len(), "Decoded offer index");
    Ok(index)
}
