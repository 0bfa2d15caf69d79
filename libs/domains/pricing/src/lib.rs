//! Pricing Domain
//!
//! Price-list catalog model and the passes run over it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Decoder   │  ← JSON document -> Catalog (exactly one document)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Validator  │  ← SKU references, offer-term-code consistency
//! └──────┬──────┘
//!        ├──────────────────┐
//! ┌──────▼──────┐    ┌──────▼──────┐
//! │  Extractor  │    │  Projector  │  ← product / price rows
//! └──────┬──────┘    └─────────────┘
//! ┌──────▼──────┐
//! │  Analyzer   │  ← per-family min / max / spread
//! └─────────────┘
//! ```
//!
//! [`PriceListService`] ties the passes together with configured options.

pub mod analyzer;
pub mod decoder;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod models;
pub mod projector;
pub mod service;
pub mod validator;

// Re-export commonly used types
pub use analyzer::{AnalysisOptions, FamilyPriceStats, PriceAnalysis, PricePoint, PriceRange};
pub use decoder::{decode_catalog, decode_catalog_file, decode_offer_index};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{DecodeError, PricingError, PricingResult};
pub use extractor::{TermsBySku, extract_terms};
pub use models::{
    Catalog, CatalogMetadata, FamilyKey, ON_DEMAND_OFFER_TERM_CODE, Offer, OfferIndex,
    PriceDimension, Product, ProductAttributes, REPORTING_CURRENCY, TermAttributes, TermRecord,
};
pub use projector::{PriceProjection, PriceRow, ProductRow, price_rows, product_rows};
pub use service::{LoadedCatalog, PriceListService, PricingOptions};
pub use validator::{ValidationReport, validate};

// Decimal type used for prices
pub use rust_decimal::Decimal;
