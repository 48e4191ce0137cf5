use crate::model::PriceBucket;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Inclusive `[min, max]` price bounds, in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PriceRange {
    pub min: u64,
    pub max: u64,
}

impl PriceRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PriceRanges {
    pub budget: PriceRange,
    pub mid: PriceRange,
    pub premium: PriceRange,
    pub flagship: PriceRange,
}

impl PriceRanges {
    pub fn range(&self, bucket: PriceBucket) -> PriceRange {
        match bucket {
            PriceBucket::Budget => self.budget,
            PriceBucket::Mid => self.mid,
            PriceBucket::Premium => self.premium,
            PriceBucket::Flagship => self.flagship,
        }
    }
}

impl Default for PriceRanges {
    fn default() -> Self {
        Self {
            budget: PriceRange::new(0, 15_000),
            mid: PriceRange::new(15_000, 35_000),
            premium: PriceRange::new(35_000, 80_000),
            flagship: PriceRange::new(80_000, 200_000),
        }
    }
}

/// Base URLs of the two scraped sites.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceUrls {
    pub mobiles91: String,
    pub gsmarena: String,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            mobiles91: "https://www.91mobiles.com".into(),
            gsmarena: "https://www.gsmarena.com".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Minimum gap between any two outbound requests, in seconds.
    pub request_delay_seconds: f64,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
    pub max_results_per_page: usize,
    pub max_total_results: usize,
    pub supported_brands: Vec<String>,
    pub price_ranges: PriceRanges,
    pub sources: SourceUrls,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            request_delay_seconds: 2.0,
            request_timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.into(),
            max_results_per_page: 5,
            max_total_results: 20,
            supported_brands: [
                "Samsung", "Apple", "Xiaomi", "OnePlus", "Google", "Oppo", "Vivo", "Realme",
                "Motorola", "Nokia", "Huawei", "Honor", "Nothing",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            price_ranges: PriceRanges::default(),
            sources: SourceUrls::default(),
        }
    }
}

impl AppConfig {
    /// Fails for negative, non-finite or out-of-range delays.
    pub fn request_delay(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.request_delay_seconds).map_err(|e| {
            invalid(
                "request_delay_seconds",
                format!("{}: {e}", self.request_delay_seconds),
            )
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Applies `REQUEST_DELAY`, `SCRAPING_TIMEOUT`, `USER_AGENT`,
    /// `MAX_RESULTS_PER_PAGE` and `MAX_TOTAL_RESULTS` from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REQUEST_DELAY") {
            self.request_delay_seconds = parse_value("REQUEST_DELAY", &v)?;
        }
        if let Some(v) = lookup("SCRAPING_TIMEOUT") {
            self.request_timeout_seconds = parse_value("SCRAPING_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("MAX_RESULTS_PER_PAGE") {
            self.max_results_per_page = parse_value("MAX_RESULTS_PER_PAGE", &v)?;
        }
        if let Some(v) = lookup("MAX_TOTAL_RESULTS") {
            self.max_total_results = parse_value("MAX_TOTAL_RESULTS", &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.request_delay()?;
        if self.request_timeout_seconds == 0 {
            return Err(invalid("request_timeout_seconds", "must be positive"));
        }
        if self.max_results_per_page == 0 {
            return Err(invalid("max_results_per_page", "must be positive"));
        }
        if self.max_total_results == 0 {
            return Err(invalid("max_total_results", "must be positive"));
        }
        for bucket in PriceBucket::ALL {
            let range = self.price_ranges.range(bucket);
            if range.min > range.max {
                return Err(invalid(
                    "price_ranges",
                    format!("{} has min {} above max {}", bucket.label(), range.min, range.max),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        reason: reason.into(),
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, format!("{raw:?}: {e}")))
}

/// Reads `path` as JSON, falling back to defaults for any missing field.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: AppConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
