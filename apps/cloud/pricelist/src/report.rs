//! Rendering of price analyses and validation reports

use clap::ValueEnum;
use domain_pricing::{FamilyPriceStats, PriceAnalysis, ValidationReport};
use strum::Display;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Tabled)]
struct FamilyLine {
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Members")]
    members: usize,
    #[tabled(rename = "Priced")]
    priced: usize,
    #[tabled(rename = "Lowest")]
    lowest: String,
    #[tabled(rename = "Lowest SKU")]
    lowest_sku: String,
    #[tabled(rename = "Lowest location")]
    lowest_location: String,
    #[tabled(rename = "Highest")]
    highest: String,
    #[tabled(rename = "Highest SKU")]
    highest_sku: String,
    #[tabled(rename = "Highest location")]
    highest_location: String,
    #[tabled(rename = "Spread")]
    spread: String,
}

impl From<&FamilyPriceStats> for FamilyLine {
    fn from(stats: &FamilyPriceStats) -> Self {
        let unpriced = || "-".to_string();
        let range = stats.range.as_ref();
        Self {
            family: stats.family.clone(),
            members: stats.member_count,
            priced: stats.priced_count,
            lowest: range.map_or_else(unpriced, |r| r.lowest.price.to_string()),
            lowest_sku: range.map_or_else(unpriced, |r| r.lowest.sku.clone()),
            lowest_location: range.map_or_else(unpriced, |r| r.lowest.location.clone()),
            highest: range.map_or_else(unpriced, |r| r.highest.price.to_string()),
            highest_sku: range.map_or_else(unpriced, |r| r.highest.sku.clone()),
            highest_location: range.map_or_else(unpriced, |r| r.highest.location.clone()),
            spread: range.map_or_else(unpriced, |r| r.spread.to_string()),
        }
    }
}

pub fn render_analysis(
    analysis: &PriceAnalysis,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(analysis),
        OutputFormat::Table => {
            let lines: Vec<FamilyLine> = analysis.families.iter().map(FamilyLine::from).collect();
            Ok(Table::new(lines).with(Style::psql()).to_string())
        }
    }
}

#[derive(Tabled)]
struct TermCodeLine {
    #[tabled(rename = "Offer term code")]
    code: String,
    #[tabled(rename = "Lease")]
    lease_contract_length: String,
    #[tabled(rename = "Class")]
    offering_class: String,
    #[tabled(rename = "Purchase option")]
    purchase_option: String,
}

/// One line per distinct offer term code, in code order
pub fn render_term_codes(report: &ValidationReport) -> String {
    let lines: Vec<TermCodeLine> = report
        .term_codes
        .iter()
        .map(|(code, attrs)| TermCodeLine {
            code: code.clone(),
            lease_contract_length: attrs.lease_contract_length.clone(),
            offering_class: attrs.offering_class.clone(),
            purchase_option: attrs.purchase_option.clone(),
        })
        .collect();
    Table::new(lines).with(Style::psql()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_pricing::{Decimal, FamilyKey, PricePoint, PriceRange, TermAttributes};
    use std::collections::BTreeMap;
    use std::str::FromStr;

    fn analysis() -> PriceAnalysis {
        let point = |price: &str, sku: &str, location: &str| PricePoint {
            price: Decimal::from_str(price).unwrap(),
            sku: sku.to_string(),
            location: location.to_string(),
        };
        PriceAnalysis {
            group_by: FamilyKey::InstanceType,
            families: vec![
                FamilyPriceStats {
                    family: "m5.xlarge".to_string(),
                    member_count: 3,
                    priced_count: 2,
                    range: Some(PriceRange {
                        lowest: point("0.096", "B3ZQ9G2HZCZMAYTC", "US East (N. Virginia)"),
                        highest: point("0.192", "7W6DMKN2UQ4RVGVT", "Asia Pacific (Seoul)"),
                        spread: Decimal::from_str("0.096").unwrap(),
                    }),
                },
                FamilyPriceStats {
                    family: "t3.micro".to_string(),
                    member_count: 1,
                    priced_count: 0,
                    range: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_table_lists_every_family() {
        let table = render_analysis(&analysis(), OutputFormat::Table).unwrap();

        assert!(table.contains("Family"));
        assert!(table.contains("Spread"));
        let m5 = table.lines().find(|l| l.contains("m5.xlarge")).unwrap();
        assert!(m5.contains("0.096"));
        assert!(m5.contains("0.192"));
        assert!(m5.contains("Asia Pacific (Seoul)"));
        let t3 = table.lines().find(|l| l.contains("t3.micro")).unwrap();
        assert!(t3.contains('-'));
    }

    #[test]
    fn test_json_keeps_decimal_text() {
        let json = render_analysis(&analysis(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["group_by"], "instance-type");
        assert_eq!(value["families"][0]["range"]["spread"], "0.096");
        assert_eq!(value["families"][0]["range"]["lowest"]["sku"], "B3ZQ9G2HZCZMAYTC");
        assert!(value["families"][1]["range"].is_null());
    }

    #[test]
    fn test_term_codes_table() {
        let report = ValidationReport {
            term_codes: BTreeMap::from([
                ("JRTCKXETXF".to_string(), TermAttributes::default()),
                (
                    "4NA7Y494T4".to_string(),
                    TermAttributes::new("1yr", "standard", "No Upfront"),
                ),
            ]),
            terms_checked: 4,
        };

        let table = render_term_codes(&report);
        let lines: Vec<_> = table.lines().collect();
        let reserved = lines.iter().position(|l| l.contains("4NA7Y494T4")).unwrap();
        let on_demand = lines.iter().position(|l| l.contains("JRTCKXETXF")).unwrap();
        assert!(reserved < on_demand);
        assert!(lines[reserved].contains("No Upfront"));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
