use clap::Parser;
use mobile_search::{Aggregator, AppConfig, load_config};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

/// Search 91mobiles and GSMArena for phones.
#[derive(Debug, Parser)]
#[command(name = "mobile-search", version)]
struct Cli {
    /// Search terms, e.g. `galaxy s24`
    #[arg(required = true)]
    query: Vec<String>,

    /// Only keep products whose name contains this brand (repeatable)
    #[arg(long = "brand", short = 'b')]
    brands: Vec<String>,

    /// Price bucket: budget, mid, premium or flagship
    #[arg(long, short = 'p')]
    price: Option<String>,

    /// JSON config file; defaults are used when it is missing
    #[arg(long, short = 'c', env = "MOBILE_SEARCH_CONFIG", default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = if cli.config.exists() {
        match load_config(&cli.config) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        warn!("Config {} not found, using defaults", cli.config.display());
        AppConfig::default()
    };
    if let Err(e) = config
        .apply_overrides(|key| std::env::var(key).ok())
        .and_then(|()| config.validate())
    {
        error!("Config error: {}", e);
        return ExitCode::FAILURE;
    }

    let aggregator = match Aggregator::from_config(&config) {
        Ok(a) => a,
        Err(e) => {
            error!("Failed to set up sources: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(bucket) = cli.price.as_deref() {
        if bucket.parse::<mobile_search::PriceBucket>().is_err() {
            warn!("Ignoring unknown price bucket {:?}", bucket);
        }
    }
    let criteria = aggregator
        .filter()
        .validate(cli.brands.iter().map(String::as_str), cli.price.as_deref());
    info!("Filters: {}", aggregator.filter().describe(&criteria));

    let query = cli.query.join(" ");
    let products = aggregator.aggregate(&query, Some(&criteria)).await;
    info!("Found {} products for {:?}", products.len(), query);

    match serde_json::to_string_pretty(&products) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to serialize results: {}", e);
            ExitCode::FAILURE
        }
    }
}
