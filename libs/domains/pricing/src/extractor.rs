use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::models::{Catalog, TermRecord};

/// SKU -> its single term carrying the designated offer term code.
///
/// A SKU missing from the map has no price under that term; it is never zero.
pub type TermsBySku<'a> = BTreeMap<&'a str, &'a TermRecord>;

/// Collect, for every SKU, the term whose offer term code is `offer_term_code`.
///
/// All term types are searched. A second matching term for one SKU aborts
/// with [`PricingError::DuplicatePricingTerm`] instead of overwriting.
pub fn extract_terms<'a>(
    catalog: &'a Catalog,
    offer_term_code: &str,
) -> PricingResult<TermsBySku<'a>> {
    let mut result = TermsBySku::new();

    for term in catalog.terms_with_code(offer_term_code) {
        if result.insert(term.sku.as_str(), term).is_some() {
            return Err(PricingError::DuplicatePricingTerm {
                sku: term.sku.clone(),
                offer_term_code: term.offer_term_code.clone(),
            });
        }
    }

    debug!(
        offer_term_code = offer_term_code,
        skus = result.len(),
        "Extracted pricing terms"
    );

    Ok(result)
}
