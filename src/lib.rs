pub mod aggregator;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod model;
pub mod parser;
pub mod source;

pub use aggregator::{Aggregator, SetupError};
pub use config::{AppConfig, ConfigError, load_config};
pub use fetch::{Fetcher, RateLimitedFetcher};
pub use filter::FilterEngine;
pub use model::{FetchError, FilterCriteria, ParseError, PriceBucket, Product, ScrapeError, Source};
pub use source::{GsmArenaAdapter, Mobiles91Adapter, SourceAdapter};
