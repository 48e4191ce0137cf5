// Core structs: Product, FilterCriteria, error taxonomy
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Site a product listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "91mobiles")]
    Mobiles91,
    #[serde(rename = "GSMArena")]
    GsmArena,
}

impl Source {
    pub fn label(self) -> &'static str {
        match self {
            Source::Mobiles91 => "91mobiles",
            Source::GsmArena => "GSMArena",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scraped listing, normalized across sources.
///
/// Only `name` and `source` are guaranteed; everything else is best-effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub specs: Vec<String>,
    pub detailed_specs: Vec<String>,
    pub features: Vec<String>,
    pub summary: Option<String>,
    pub source: Source,
}

impl Product {
    pub fn new(name: impl Into<String>, price: impl Into<String>, source: Source) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image_url: None,
            product_url: None,
            specs: Vec::new(),
            detailed_specs: Vec::new(),
            features: Vec::new(),
            summary: None,
            source,
        }
    }

    /// Deduplication key: trimmed, case-folded name.
    pub fn fingerprint(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// Named price range used by the price filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceBucket {
    Budget,
    Mid,
    Premium,
    Flagship,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::Budget,
        PriceBucket::Mid,
        PriceBucket::Premium,
        PriceBucket::Flagship,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::Budget => "Budget",
            PriceBucket::Mid => "Mid-range",
            PriceBucket::Premium => "Premium",
            PriceBucket::Flagship => "Flagship",
        }
    }
}

impl FromStr for PriceBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(PriceBucket::Budget),
            "mid" | "mid-range" | "midrange" => Ok(PriceBucket::Mid),
            "premium" => Ok(PriceBucket::Premium),
            "flagship" => Ok(PriceBucket::Flagship),
            other => Err(format!("unknown price bucket: {other}")),
        }
    }
}

/// Caller-owned brand/price constraints. Empty means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub brands: BTreeSet<String>,
    pub price_bucket: Option<PriceBucket>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brands.insert(brand.into());
        self
    }

    pub fn with_price_bucket(mut self, bucket: PriceBucket) -> Self {
        self.price_bucket = Some(bucket);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty() && self.price_bucket.is_none()
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("card has no usable {0}")]
    MissingField(&'static str),

    #[error("invalid CSS selector {0:?}")]
    InvalidSelector(String),
}

/// Fault inside one adapter's pipeline; contained by the aggregator.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("{source_name}: cannot build search URL: {reason}")]
    InvalidUrl {
        source_name: Source,
        reason: String,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
