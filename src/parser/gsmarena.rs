// GSMArena quick-search result parsing
use crate::model::{ParseError, Product, Source};
use crate::parser::cascade::{Lookup, element_text, extract_field, extract_text, first_match};
use crate::parser::text::{LABEL_MAX, URL_MAX, clean_text};
use crate::parser::{absolute_url, parse_cards};
use reqwest::Url;
use scraper::ElementRef;

/// GSMArena lists no prices.
pub const PRICE_PLACEHOLDER: &str = "Check GSMArena for pricing";

pub(crate) const CARDS: &[&str] = &["div.makers li", "div.makers a", "li"];

type LinkStrategy = for<'a> fn(ElementRef<'a>) -> Option<String>;

const NAME: &[LinkStrategy] = &[link_title, strong_text, link_text];

const IMAGE: &[Lookup] = &[Lookup::Attr("img", "src"), Lookup::Attr("img", "data-src")];

pub fn parse_listing(html: &str, base: &Url, max_cards: usize) -> Vec<Product> {
    parse_cards(html, CARDS, max_cards, Source::GsmArena, |card| parse_card(card, base))
}

/// A card is either the `<a>` itself or an element wrapping one.
pub fn parse_card(card: ElementRef<'_>, base: &Url) -> Result<Product, ParseError> {
    let link = if card.value().name() == "a" {
        card
    } else {
        first_match(card, "a").ok_or(ParseError::MissingField("link"))?
    };

    let name = extract_field(NAME, |strategy| {
        strategy(link).map(|raw| clean_text(&raw, LABEL_MAX))
    })
    .ok_or(ParseError::MissingField("name"))?;

    let mut product = Product::new(name, PRICE_PLACEHOLDER, Source::GsmArena);
    product.product_url = link
        .value()
        .attr("href")
        .and_then(|href| absolute_url(base, href));
    product.image_url = extract_text(card, IMAGE, URL_MAX).and_then(|src| absolute_url(base, &src));

    Ok(product)
}

fn link_title(link: ElementRef<'_>) -> Option<String> {
    link.value().attr("title").map(str::to_string)
}

fn strong_text(link: ElementRef<'_>) -> Option<String> {
    first_match(link, "strong").map(element_text)
}

fn link_text(link: ElementRef<'_>) -> Option<String> {
    Some(element_text(link))
}
