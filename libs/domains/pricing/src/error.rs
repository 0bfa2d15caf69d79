use thiserror::Error;

use crate::models::TermAttributes;

/// Result type for pricing operations
pub type PricingResult<T> = Result<T, PricingError>;

/// Failures while decoding a price-list document
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Syntax error or a field with the wrong type
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The stream held zero or several top-level documents
    #[error("expected exactly one entry, got {0}")]
    EntryCount(usize),
}

/// Errors that abort a price-list pipeline run
#[derive(Debug, Error)]
pub enum PricingError {
    /// Input document could not be decoded
    #[error("Failed to decode price list: {0}")]
    Decode(#[from] DecodeError),

    /// A term references a SKU absent from the product table
    #[error("Term references unknown SKU {sku} ({term_type} term {offer_term_code})")]
    DanglingSku {
        sku: String,
        term_type: String,
        offer_term_code: String,
    },

    /// One offer term code maps to two different attribute triples
    #[error("Offer term code {code} has conflicting attributes: {first} vs {second} (SKU {sku})")]
    TermAttributeConflict {
        code: String,
        sku: String,
        first: TermAttributes,
        second: TermAttributes,
    },

    /// More than one on-demand term for a single SKU
    #[error("Duplicate pricing term {offer_term_code} for SKU {sku}")]
    DuplicatePricingTerm { sku: String, offer_term_code: String },

    /// A reporting-currency price is not a decimal number
    #[error("Invalid {currency} price {value:?} for SKU {sku}, rate code {rate_code}: {source}")]
    NumericParse {
        sku: String,
        rate_code: String,
        currency: String,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    /// Difference between a family's extremes is outside the decimal range
    #[error("Price spread of family {family:?} overflows: {highest} - {lowest}")]
    SpreadOverflow {
        family: String,
        lowest: rust_decimal::Decimal,
        highest: rust_decimal::Decimal,
    },

    /// Offer code not listed in the offer index
    #[error("Offer {0} not found in the offer index")]
    UnknownOffer(String),

    /// Reading the input stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::Decode(DecodeError::Malformed(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_count_message() {
        let err = PricingError::from(DecodeError::EntryCount(2));
        assert_eq!(
            err.to_string(),
            "Failed to decode price list: expected exactly one entry, got 2"
        );
    }

    #[test]
    fn test_conflict_message_names_both_triples() {
        let err = PricingError::TermAttributeConflict {
            code: "BPH4J8HBKS".to_string(),
            sku: "SKU1".to_string(),
            first: TermAttributes::new("3yr", "standard", "No Upfront"),
            second: TermAttributes::new("3yr", "standard", "All Upfront"),
        };
        let msg = err.to_string();
        assert!(msg.contains("BPH4J8HBKS"));
        assert!(msg.contains("No Upfront"));
        assert!(msg.contains("All Upfront"));
    }
}
