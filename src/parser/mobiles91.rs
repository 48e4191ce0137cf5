// 91mobiles search-result parsing
use crate::model::{ParseError, Product, Source};
use crate::parser::cascade::{Lookup, element_text, extract_text, first_match, select_cascade};
use crate::parser::text::{LABEL_MAX, LINE_MAX, URL_MAX, clean_text};
use crate::parser::{absolute_url, parse_cards};
use reqwest::Url;
use scraper::ElementRef;

pub const PRICE_PLACEHOLDER: &str = "Price not available";

pub(crate) const CARDS: &[&str] = &[
    "div.listingbox",
    "div.product-item",
    "div.mobile-item",
    "article.product",
    "div[data-testid=\"product-card\"]",
    "div.card",
    "li.product",
];

const NAME: &[Lookup] = &[
    Lookup::Text("h3"),
    Lookup::Text("a.title"),
    Lookup::Text("h2"),
    Lookup::Text("h4"),
    Lookup::Text("a.product-title"),
    Lookup::Text("[data-testid=\"product-name\"]"),
    Lookup::Text("div.name"),
    Lookup::Text("span.title"),
];

const PRICE: &[Lookup] = &[
    Lookup::Text("span.price"),
    Lookup::Text("div.price"),
    Lookup::Text("span.cost"),
    Lookup::Text("[data-testid=\"price\"]"),
    Lookup::Text("div.price-current"),
    Lookup::Text("p.price"),
];

const IMAGE: &[Lookup] = &[
    Lookup::Attr("img", "src"),
    Lookup::Attr("img", "data-src"),
    Lookup::Attr("img", "data-lazy"),
    Lookup::Attr("img", "data-original"),
];

const SPEC_ROWS: &[&str] = &["li", "span.spec", "div.feature", "p.specification"];
const MAX_SPECS: usize = 8;

/// Parses up to `max_cards` listing cards from a search page.
pub fn parse_listing(html: &str, base: &Url, max_cards: usize) -> Vec<Product> {
    parse_cards(html, CARDS, max_cards, Source::Mobiles91, |card| parse_card(card, base))
}

pub fn parse_card(card: ElementRef<'_>, base: &Url) -> Result<Product, ParseError> {
    let name = extract_text(card, NAME, LABEL_MAX).ok_or(ParseError::MissingField("name"))?;
    let price = extract_text(card, PRICE, LABEL_MAX).unwrap_or_else(|| PRICE_PLACEHOLDER.to_string());

    let mut product = Product::new(name, price, Source::Mobiles91);
    product.product_url = first_match(card, "a")
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| absolute_url(base, href));
    product.image_url = extract_text(card, IMAGE, URL_MAX).and_then(|src| absolute_url(base, &src));
    product.specs = select_cascade(card, SPEC_ROWS)
        .into_iter()
        .take(MAX_SPECS)
        .map(|row| clean_text(&element_text(row), LINE_MAX))
        .filter(|text| text.chars().count() > 3)
        .collect();

    Ok(product)
}
