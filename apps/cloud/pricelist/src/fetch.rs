//! AWS Price List bulk API client
//!
//! Downloads the offer index, resolves an offer's current price list and
//! downloads that. https://docs.aws.amazon.com/awsaccountbilling/latest/aboutv2/price-list-api.html

use domain_pricing::{Catalog, OfferIndex, PricingError, decode_catalog, decode_offer_index};
use observability::CatalogMetrics;
use reqwest::Client;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::ApiConfig;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GET {url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Downloaded document is not a usable price list: {0}")]
    Pricing(#[from] PricingError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Downloaded price list, decoded and kept as received
pub struct DownloadedCatalog {
    pub url: String,
    pub body: Vec<u8>,
    pub catalog: Catalog,
}

pub struct AwsOfferClient {
    config: ApiConfig,
    client: Client,
}

impl AwsOfferClient {
    pub fn new(config: ApiConfig) -> FetchResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Absolute URL for a path taken from the offer index
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get(&self, url: &str, document: &str) -> FetchResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await?.to_vec();
        CatalogMetrics::record_fetched_bytes(document, body.len());
        info!(url = url, bytes = body.len(), document = document, "Downloaded");
        Ok(body)
    }

    #[instrument(skip(self))]
    pub async fn fetch_offer_index(&self) -> FetchResult<OfferIndex> {
        let url = self.url_for(&self.config.offer_index_path);
        let body = self.get(&url, "offer_index").await?;
        Ok(decode_offer_index(body.as_slice())?)
    }

    /// Download the current price list of `offer_code` and check that it decodes
    #[instrument(skip(self))]
    pub async fn download_catalog(&self, offer_code: &str) -> FetchResult<DownloadedCatalog> {
        let index = self.fetch_offer_index().await?;
        let offer = index.resolve(offer_code)?;
        let url = self.url_for(&offer.current_version_url);

        let body = self.get(&url, "catalog").await?;
        let catalog = decode_catalog(body.as_slice())?;
        info!(
            offer_code = %catalog.metadata().offer_code,
            version = %catalog.metadata().version,
            products = catalog.products().len(),
            "Downloaded price list decodes"
        );

        Ok(DownloadedCatalog { url, body, catalog })
    }
}

/// Write a downloaded price list to `path` as received
pub async fn save(downloaded: &DownloadedCatalog, path: &Path) -> FetchResult<()> {
    tokio::fs::write(path, &downloaded.body)
        .await
        .map_err(|source| FetchError::Write {
            path: path.display().to_string(),
            source,
        })?;
    info!(path = %path.display(), bytes = downloaded.body.len(), "Saved price list");
    Ok(())
}
