// Ordered fallback extraction: the first strategy with a non-empty value wins

use crate::model::ParseError;
use crate::parser::text::clean_text;
use scraper::{ElementRef, Selector};
use tracing::debug;

/// A value that can be "found but empty".
pub trait Present {
    fn is_present(&self) -> bool;
}

impl Present for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl<T> Present for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

/// Runs `strategies` in order and returns the first present result.
/// Later strategies are not evaluated once one succeeds.
pub fn extract_field<S, T, F>(strategies: &[S], run: F) -> Option<T>
where
    F: FnMut(&S) -> Option<T>,
    T: Present,
{
    strategies.iter().filter_map(run).find(Present::is_present)
}

/// One way of locating a string value below a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Text content of the first descendant matching the selector.
    Text(&'static str),
    /// Attribute of the first descendant matching the selector.
    Attr(&'static str, &'static str),
}

impl Lookup {
    pub fn apply(&self, node: ElementRef<'_>) -> Option<String> {
        match *self {
            Lookup::Text(css) => first_match(node, css).map(element_text),
            Lookup::Attr(css, attr) => first_match(node, css)
                .and_then(|el| el.value().attr(attr))
                .map(str::to_string),
        }
    }
}

pub fn parse_selector(css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css).map_err(|_| ParseError::InvalidSelector(css.to_string()))
}

/// All descendants of `node` matching `css`, in document order.
/// An unparsable selector matches nothing.
pub fn select_all<'a>(node: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Ok(selector) => node.select(&selector).collect(),
        Err(e) => {
            debug!("{}", e);
            Vec::new()
        }
    }
}

pub fn first_match<'a>(node: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = parse_selector(css).ok()?;
    node.select(&selector).next()
}

/// Text nodes of `el` joined by single spaces.
pub fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

/// Cleaned string from the first lookup that yields non-blank text.
pub fn extract_text(node: ElementRef<'_>, lookups: &[Lookup], max_chars: usize) -> Option<String> {
    extract_field(lookups, |lookup| {
        lookup.apply(node).map(|raw| clean_text(&raw, max_chars))
    })
}

/// Elements matched by the first selector that matches anything.
pub fn select_cascade<'a>(node: ElementRef<'a>, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    extract_field(selectors, |css| Some(select_all(node, css))).unwrap_or_default()
}
