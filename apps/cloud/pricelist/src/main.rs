//! Price List Tool
//!
//! Validates AWS price list offer files, exports them as product and price
//! CSV tables, reports per-family on-demand price ranges, and downloads
//! current offer files from the AWS Price List bulk API.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_pricing::{FamilyKey, PriceListService};
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing::info;

mod commands;
mod config;
mod export;
mod fetch;
mod report;

use config::Config;
use fetch::AwsOfferClient;
use report::OutputFormat;

#[derive(Parser)]
#[command(name = "pricelist")]
#[command(about = "Validate, export and analyze AWS price list offer files")]
struct Cli {
    /// Print Prometheus metrics to stderr when the command finishes
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the product and price tables of an offer file as CSV
    Export {
        /// Offer file to read
        #[arg(short, long)]
        input_offer_file: PathBuf,

        /// Destination of the product table
        #[arg(long)]
        products_csv_file: PathBuf,

        /// Destination of the price table
        #[arg(long)]
        prices_csv_file: PathBuf,

        /// Write a header row with column names
        #[arg(long)]
        headers: bool,
    },

    /// Report lowest and highest on-demand price per family
    Analyze {
        /// Offer file to read
        #[arg(short, long)]
        input_offer_file: PathBuf,

        /// Grouping attribute: instance-type, instance-family or product-family
        #[arg(short, long, default_value_t = FamilyKey::InstanceType)]
        group_by: FamilyKey,

        /// Only report these families. Defaults to PRICING_FAMILIES, else all.
        #[arg(short, long, value_delimiter = ',')]
        family: Vec<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Check an offer file and list its offer term codes
    Validate {
        /// Offer file to read
        #[arg(short, long)]
        input_offer_file: PathBuf,
    },

    /// Download the current offer file for a service
    Fetch {
        /// Where to write the offer file
        #[arg(short, long)]
        output: PathBuf,

        /// Service offer code. Defaults to PRICING_OFFER_CODE.
        #[arg(long)]
        offer_code: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    // Parse first so --help works regardless of the environment
    let cli = Cli::parse();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Initialize metrics
    observability::init_metrics().wrap_err("Failed to install metrics recorder")?;

    let service = PriceListService::new(config.pricing.clone());

    match cli.command {
        Commands::Export {
            input_offer_file,
            products_csv_file,
            prices_csv_file,
            headers,
        } => {
            let summary = commands::export(
                &service,
                &input_offer_file,
                &products_csv_file,
                &prices_csv_file,
                headers,
            )?;
            info!(
                "Export complete: {} products, {} prices",
                summary.products, summary.prices
            );
        }

        Commands::Analyze {
            input_offer_file,
            group_by,
            family,
            format,
        } => {
            let families = config.families_or_default(family);
            let rendered =
                commands::analyze(&service, &input_offer_file, group_by, families, format)?;
            println!("{rendered}");
        }

        Commands::Validate { input_offer_file } => {
            let rendered = commands::validate(&service, &input_offer_file)?;
            println!("{rendered}");
        }

        Commands::Fetch { output, offer_code } => {
            let offer_code = offer_code.unwrap_or_else(|| config.api.offer_code.clone());
            info!("Fetching current price list for {}", offer_code);

            let client = AwsOfferClient::new(config.api.clone())?;
            let downloaded = client.download_catalog(&offer_code).await?;
            fetch::save(&downloaded, &output).await?;

            info!(
                "Saved {} version {} ({} bytes) to {}",
                downloaded.url,
                downloaded.catalog.metadata().version,
                downloaded.body.len(),
                output.display()
            );
        }
    }

    if cli.print_metrics {
        eprintln!("{}", observability::render_metrics());
    }

    Ok(())
}
