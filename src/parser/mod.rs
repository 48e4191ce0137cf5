// HTML extraction for both sources
pub mod cascade;
pub mod detail;
pub mod gsmarena;
pub mod mobiles91;
pub mod text;

pub use detail::{DetailInfo, parse_detail};

use crate::model::{ParseError, Product, Source};
use cascade::select_cascade;
use reqwest::Url;
use scraper::{ElementRef, Html};
use tracing::{debug, info};

/// Locates cards with the `cards` selector cascade, keeps the first
/// `max_cards`, and parses each one. A card that fails to parse is dropped
/// without affecting the rest of the batch.
pub(crate) fn parse_cards<F>(
    html: &str,
    cards: &[&str],
    max_cards: usize,
    source: Source,
    mut parse_card: F,
) -> Vec<Product>
where
    F: FnMut(ElementRef<'_>) -> Result<Product, ParseError>,
{
    let document = Html::parse_document(html);
    let candidates = select_cascade(document.root_element(), cards);
    info!(%source, found = candidates.len(), "Located listing cards");

    candidates
        .into_iter()
        .take(max_cards)
        .enumerate()
        .filter_map(|(index, card)| match parse_card(card) {
            Ok(product) => Some(product),
            Err(e) => {
                debug!(%source, index, "Skipping card: {}", e);
                None
            }
        })
        .collect()
}

/// Resolves `href` against `base`; absolute links pass through unchanged.
pub fn absolute_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with("javascript:") || href.starts_with('#') {
        return None;
    }
    base.join(href).ok().map(String::from)
}
