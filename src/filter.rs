use crate::config::{AppConfig, PriceRange, PriceRanges};
use crate::model::{FilterCriteria, PriceBucket, Product};
use std::collections::BTreeSet;

/// Brand and price predicates over scraped products.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    ranges: PriceRanges,
    supported_brands: Vec<String>,
}

impl FilterEngine {
    pub fn new(ranges: PriceRanges, supported_brands: Vec<String>) -> Self {
        Self {
            ranges,
            supported_brands,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.price_ranges.clone(), config.supported_brands.clone())
    }

    /// Products satisfying both predicates, in input order.
    pub fn apply(&self, products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
        products
            .iter()
            .filter(|p| self.matches(p, criteria))
            .cloned()
            .collect()
    }

    pub fn matches(&self, product: &Product, criteria: &FilterCriteria) -> bool {
        brand_matches(product, &criteria.brands)
            && criteria
                .price_bucket
                .is_none_or(|bucket| price_matches(product, self.ranges.range(bucket)))
    }

    /// Cleans caller-supplied brand names and bucket name into criteria.
    /// Known brands take their canonical spelling, unknown ones are title
    /// cased, blanks are dropped. An unknown bucket name is ignored.
    pub fn validate<'a, I>(&self, brands: I, price_bucket: Option<&str>) -> FilterCriteria
    where
        I: IntoIterator<Item = &'a str>,
    {
        let brands: BTreeSet<String> = brands
            .into_iter()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(|b| {
                self.supported_brands
                    .iter()
                    .find(|known| known.eq_ignore_ascii_case(b))
                    .cloned()
                    .unwrap_or_else(|| title_case(b))
            })
            .collect();

        FilterCriteria {
            brands,
            price_bucket: price_bucket.and_then(|name| name.parse().ok()),
        }
    }

    /// One-line description of the active filters.
    pub fn describe(&self, criteria: &FilterCriteria) -> String {
        if criteria.is_empty() {
            return "No filters applied".to_string();
        }

        let mut parts = Vec::new();
        if !criteria.brands.is_empty() {
            let brands: Vec<&str> = criteria.brands.iter().map(String::as_str).collect();
            parts.push(format!("Brands: {}", brands.join(", ")));
        }
        if let Some(bucket) = criteria.price_bucket {
            let range = self.ranges.range(bucket);
            let span = if bucket == PriceBucket::Flagship {
                format!("₹{}+", thousands(range.min))
            } else {
                format!("₹{}-{}", thousands(range.min), thousands(range.max))
            };
            parts.push(format!("Price: {} ({})", bucket.label(), span));
        }
        parts.join(" | ")
    }
}

/// Case-insensitive substring match of any brand in the product name.
/// An empty brand set passes everything.
fn brand_matches(product: &Product, brands: &BTreeSet<String>) -> bool {
    if brands.is_empty() {
        return true;
    }
    let name = product.name.to_lowercase();
    brands.iter().any(|brand| name.contains(&brand.to_lowercase()))
}

/// Prices that cannot be read never exclude a product.
fn price_matches(product: &Product, range: PriceRange) -> bool {
    let lower = product.price.to_lowercase();
    if lower.contains("not available") || lower.contains("check") {
        return true;
    }
    parse_price(&product.price).is_none_or(|value| range.contains(value))
}

/// Keeps digits and commas, drops the commas, and parses what remains.
pub fn parse_price(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn thousands(value: u64) -> String {
    if value >= 1000 && value % 1000 == 0 {
        format!("{}K", value / 1000)
    } else {
        value.to_string()
    }
}

fn title_case(word: &str) -> String {
    word.split_whitespace()
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
