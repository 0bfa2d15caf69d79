//! Per-family price extremes.
//!
//! Products are grouped by a family attribute (instance type by default) and,
//! for each group, the cheapest and most expensive reporting-currency price
//! among the members' on-demand terms is found. Members are visited in SKU
//! order and dimensions in key order; the first member to reach an extreme
//! keeps it.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{PricingError, PricingResult};
use crate::extractor::TermsBySku;
use crate::models::{Catalog, FamilyKey, PriceDimension, Product, REPORTING_CURRENCY, TermRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub group_by: FamilyKey,
    /// Families to analyze; empty means all
    pub families: BTreeSet<String>,
    pub reporting_currency: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            group_by: FamilyKey::default(),
            families: BTreeSet::new(),
            reporting_currency: REPORTING_CURRENCY.to_string(),
        }
    }
}

/// A price and the member that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub price: Decimal,
    pub sku: String,
    pub location: String,
}

impl PricePoint {
    fn new(price: Decimal, product: &Product) -> Self {
        Self {
            price: price.normalize(),
            sku: product.sku.clone(),
            location: product.location().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub lowest: PricePoint,
    pub highest: PricePoint,
    /// highest - lowest
    pub spread: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyPriceStats {
    pub family: String,
    pub member_count: usize,
    /// Members with at least one reporting-currency price
    pub priced_count: usize,
    /// None when no member is priced
    pub range: Option<PriceRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceAnalysis {
    pub group_by: FamilyKey,
    pub families: Vec<FamilyPriceStats>,
    /// Products with an empty value for the grouping attribute
    pub unclassified: usize,
    pub diagnostics: Diagnostics,
}

impl PriceAnalysis {
    pub fn family(&self, name: &str) -> Option<&FamilyPriceStats> {
        self.families.iter().find(|f| f.family == name)
    }
}

/// Running minimum and maximum for one group
struct Extremes {
    lowest: PricePoint,
    highest: PricePoint,
}

impl Extremes {
    fn starting_at(price: Decimal, product: &Product) -> Self {
        let point = PricePoint::new(price, product);
        Self {
            lowest: point.clone(),
            highest: point,
        }
    }

    // Strict comparisons: ties keep the earlier member
    fn observe(&mut self, price: Decimal, product: &Product) {
        if price < self.lowest.price {
            self.lowest = PricePoint::new(price, product);
        }
        if price > self.highest.price {
            self.highest = PricePoint::new(price, product);
        }
    }

    fn into_range(self, family: &str) -> PricingResult<PriceRange> {
        let spread = self
            .highest
            .price
            .checked_sub(self.lowest.price)
            .ok_or_else(|| PricingError::SpreadOverflow {
                family: family.to_string(),
                lowest: self.lowest.price,
                highest: self.highest.price,
            })?;
        Ok(PriceRange {
            spread: spread.normalize(),
            lowest: self.lowest,
            highest: self.highest,
        })
    }
}

/// True for `-?digits[.digits]([eE][+-]?digits)?`
fn is_plain_number(raw: &str) -> bool {
    fn digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => digits(whole) && digits(fraction),
        None => digits(mantissa),
    };
    let exponent_ok = exponent.is_none_or(|e| digits(e.strip_prefix(['+', '-']).unwrap_or(e)));
    mantissa_ok && exponent_ok
}

/// Parse a provider price string as an exact decimal.
///
/// Only plain and scientific notation are accepted; separators such as `_`
/// that the decimal parser would otherwise skip are rejected.
pub fn parse_price(
    raw: &str,
    term: &TermRecord,
    dimension: &PriceDimension,
    currency: &str,
) -> PricingResult<Decimal> {
    let trimmed = raw.trim();
    let parsed = if is_plain_number(trimmed) {
        Decimal::from_str(trimmed)
            .or_else(|err| Decimal::from_scientific(trimmed).map_err(|_| err))
    } else {
        Err(rust_decimal::Error::ErrorString(
            "not a plain or scientific decimal number".to_string(),
        ))
    };
    parsed.map_err(|source| PricingError::NumericParse {
            sku: term.sku.clone(),
            rate_code: dimension.rate_code.clone(),
            currency: currency.to_string(),
            value: raw.to_string(),
            source,
        })
}

/// Members per family, plus the number of products without a family value
fn group_products<'a>(
    catalog: &'a Catalog,
    options: &AnalysisOptions,
) -> (BTreeMap<&'a str, Vec<&'a Product>>, usize) {
    let mut groups: BTreeMap<&str, Vec<&Product>> = BTreeMap::new();
    let mut unclassified = 0usize;

    for product in catalog.products().values() {
        let family = product.family(options.group_by);
        if family.is_empty() {
            unclassified += 1;
            continue;
        }
        if !options.families.is_empty() && !options.families.contains(family) {
            continue;
        }
        groups.entry(family).or_default().push(product);
    }

    if unclassified > 0 {
        debug!(
            group_by = %options.group_by,
            products = unclassified,
            "Products without a family value skipped"
        );
    }

    (groups, unclassified)
}

/// Compute lowest, highest and spread of on-demand prices per family.
///
/// `terms` is the extractor output. Members without a term and dimensions
/// without the reporting currency are reported as diagnostics; a price that
/// does not parse aborts the analysis.
pub fn analyze(
    catalog: &Catalog,
    terms: &TermsBySku<'_>,
    options: &AnalysisOptions,
) -> PricingResult<PriceAnalysis> {
    let currency = options.reporting_currency.as_str();
    let mut diagnostics = Diagnostics::new();
    let mut families = Vec::new();

    let (groups, unclassified) = group_products(catalog, options);
    for (family, members) in groups {
        let mut extremes: Option<Extremes> = None;
        let mut priced_count = 0;

        for product in &members {
            let Some(term) = terms.get(product.sku.as_str()) else {
                debug!(sku = %product.sku, "No on-demand term for SKU");
                diagnostics.push(Diagnostic::MissingOnDemandTerm {
                    sku: product.sku.clone(),
                });
                continue;
            };

            let mut priced = false;
            for dimension in term.dimensions() {
                let Some(raw) = dimension.price_in(currency) else {
                    debug!(
                        sku = %product.sku,
                        rate_code = %dimension.rate_code,
                        currency = currency,
                        "No price in reporting currency"
                    );
                    diagnostics.push(Diagnostic::MissingReportingCurrency {
                        sku: product.sku.clone(),
                        offer_term_code: term.offer_term_code.clone(),
                        rate_code: dimension.rate_code.clone(),
                        currency: currency.to_string(),
                    });
                    continue;
                };

                let price = parse_price(raw, term, dimension, currency)?;
                extremes
                    .get_or_insert_with(|| Extremes::starting_at(price, product))
                    .observe(price, product);
                priced = true;
            }

            if priced {
                priced_count += 1;
            }
        }

        let range = extremes.map(|e| e.into_range(family)).transpose()?;
        if let Some(range) = &range {
            debug!(
                family = family,
                members = members.len(),
                lowest = %range.lowest.price,
                highest = %range.highest.price,
                spread = %range.spread,
                "Family analyzed"
            );
        }

        families.push(FamilyPriceStats {
            family: family.to_string(),
            member_count: members.len(),
            priced_count,
            range,
        });
    }

    info!(
        families = families.len(),
        unclassified = unclassified,
        diagnostics = diagnostics.len(),
        "Price analysis complete"
    );

    Ok(PriceAnalysis {
        group_by: options.group_by,
        families,
        unclassified,
        diagnostics,
    })
}
