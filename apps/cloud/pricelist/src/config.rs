//! Configuration for the price list tool

use core_config::{ConfigError, Environment, FromEnv, env_list, env_or_default, env_parse};
use domain_pricing::{ON_DEMAND_OFFER_TERM_CODE, PricingOptions, REPORTING_CURRENCY};
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://pricing.us-east-1.amazonaws.com";
const DEFAULT_OFFER_INDEX_PATH: &str = "/offers/v1.0/aws/index.json";
const DEFAULT_OFFER_CODE: &str = "AmazonEC2";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub api: ApiConfig,
    pub pricing: PricingOptions,
    /// Families analyzed when none are given on the command line
    pub default_families: Vec<String>,
}

/// Where price lists are downloaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    /// Path of the offer index, relative to `base_url`
    pub offer_index_path: String,
    pub offer_code: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            offer_index_path: DEFAULT_OFFER_INDEX_PATH.to_string(),
            offer_code: DEFAULT_OFFER_CODE.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl FromEnv for ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_or_default("PRICING_API_BASE_URL", DEFAULT_API_BASE_URL),
            offer_index_path: env_or_default("PRICING_OFFER_INDEX_PATH", DEFAULT_OFFER_INDEX_PATH),
            offer_code: env_or_default("PRICING_OFFER_CODE", DEFAULT_OFFER_CODE),
            timeout: Duration::from_secs(env_parse(
                "PRICING_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            environment: Environment::from_env(),
            api: ApiConfig::from_env()?,
            pricing: PricingOptions {
                on_demand_term_code: env_or_default(
                    "PRICING_ON_DEMAND_TERM_CODE",
                    ON_DEMAND_OFFER_TERM_CODE,
                ),
                reporting_currency: env_or_default(
                    "PRICING_REPORTING_CURRENCY",
                    REPORTING_CURRENCY,
                ),
            },
            default_families: env_list("PRICING_FAMILIES").unwrap_or_default(),
        })
    }

    /// Families from the command line, or the configured default when none were given
    pub fn families_or_default(&self, families: Vec<String>) -> Vec<String> {
        if families.is_empty() {
            self.default_families.clone()
        } else {
            families
        }
    }
}
