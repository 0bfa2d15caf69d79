//! Catalog consistency checks.
//!
//! Two invariants are enforced: every SKU referenced by a term exists in the
//! product table, and an offer term code always denotes the same attribute
//! triple.
//!
//! AWS has published codes that look like near-duplicates of each other, e.g.
//! `UDM74VY9CQ` ("3 yr", standard, "NoUpfront") next to `BPH4J8HBKS` ("3yr",
//! standard, "No Upfront"). Those are distinct codes and pass. A single code
//! carrying two spellings is rejected rather than reconciled.

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::debug;

use crate::error::{PricingError, PricingResult};
use crate::models::{Catalog, TermAttributes};

/// Outcome of a successful validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Every distinct offer term code with its attribute triple
    pub term_codes: BTreeMap<String, TermAttributes>,
    pub terms_checked: usize,
}

/// Check product-reference integrity and offer-term-code consistency.
///
/// Returns the first violation found in term order.
pub fn validate(catalog: &Catalog) -> PricingResult<ValidationReport> {
    let mut term_codes: BTreeMap<String, TermAttributes> = BTreeMap::new();

    for term in catalog.terms() {
        if catalog.product(&term.sku).is_none() {
            return Err(PricingError::DanglingSku {
                sku: term.sku.clone(),
                term_type: term.term_type.clone(),
                offer_term_code: term.offer_term_code.clone(),
            });
        }

        match term_codes.entry(term.offer_term_code.clone()) {
            Entry::Occupied(seen) => {
                if seen.get() != &term.term_attributes {
                    return Err(PricingError::TermAttributeConflict {
                        code: term.offer_term_code.clone(),
                        sku: term.sku.clone(),
                        first: seen.get().clone(),
                        second: term.term_attributes.clone(),
                    });
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(term.term_attributes.clone());
            }
        }
    }

    for (code, attributes) in &term_codes {
        debug!(code = %code, attributes = %attributes, "Offer term code");
    }

    Ok(ValidationReport {
        term_codes,
        terms_checked: catalog.terms().len(),
    })
}
