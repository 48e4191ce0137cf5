// Product detail pages: spec sections, feature highlights, summary
use crate::parser::cascade::{Lookup, element_text, extract_text, select_all, select_cascade};
use crate::parser::text::{LINE_MAX, SUMMARY_MAX, clean_text};
use scraper::{ElementRef, Html};

const SPEC_SECTIONS: &[&str] = &[
    "div.spec-table",
    "table.specifications",
    "div.phone-feature",
    "ul.spec-list",
];
const FEATURE_SECTIONS: &[&str] = &["div.features", "ul.key-features", "div.highlights"];
const SUMMARY: &[Lookup] = &[
    Lookup::Text("div.summary"),
    Lookup::Text("p.description"),
    Lookup::Text("div.overview"),
    Lookup::Attr("meta[name=\"description\"]", "content"),
];

const SPEC_ROWS: &str = "tr, li, div";
const FEATURE_ROWS: &str = "li, p, div";

const SPEC_ROWS_PER_SECTION: usize = 15;
const MAX_DETAILED_SPECS: usize = 12;
const FEATURES_PER_SECTION: usize = 8;
const MAX_FEATURES: usize = 6;
const TABLE_ROWS_PER_TABLE: usize = 10;
const MAX_TABLE_SPECS: usize = 12;

/// Fields read from a product's own page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailInfo {
    /// "Name: Value" rows from plain spec tables.
    pub table_specs: Vec<String>,
    pub detailed_specs: Vec<String>,
    pub features: Vec<String>,
    pub summary: Option<String>,
}

impl DetailInfo {
    pub fn is_empty(&self) -> bool {
        self.table_specs.is_empty()
            && self.detailed_specs.is_empty()
            && self.features.is_empty()
            && self.summary.is_none()
    }
}

pub fn parse_detail(html: &str) -> DetailInfo {
    let document = Html::parse_document(html);
    let root = document.root_element();

    DetailInfo {
        table_specs: table_specs(root),
        detailed_specs: detailed_specs(root),
        features: features(root),
        summary: extract_text(root, SUMMARY, SUMMARY_MAX),
    }
}

fn detailed_specs(root: ElementRef<'_>) -> Vec<String> {
    collect_lines(
        root,
        SPEC_SECTIONS,
        SPEC_ROWS,
        SPEC_ROWS_PER_SECTION,
        MAX_DETAILED_SPECS,
        |text| text.chars().count() > 10 && text.contains(':'),
    )
}

fn features(root: ElementRef<'_>) -> Vec<String> {
    collect_lines(
        root,
        FEATURE_SECTIONS,
        FEATURE_ROWS,
        FEATURES_PER_SECTION,
        MAX_FEATURES,
        |text| text.chars().count() > 5,
    )
}

/// Walks the first matching kind of section and gathers `rows` texts, in
/// document order, that pass `keep`. Duplicates from nested rows are skipped.
fn collect_lines<F>(
    root: ElementRef<'_>,
    sections: &[&str],
    rows: &str,
    per_section: usize,
    max_total: usize,
    keep: F,
) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let mut lines = Vec::new();
    for section in select_cascade(root, sections) {
        for row in select_all(section, rows).into_iter().take(per_section) {
            let text = clean_text(&element_text(row), LINE_MAX);
            if keep(&text) && !lines.contains(&text) {
                lines.push(text);
            }
        }
    }
    lines.truncate(max_total);
    lines
}

/// Every `<tr>` with at least two cells becomes "first: second".
fn table_specs(root: ElementRef<'_>) -> Vec<String> {
    let mut specs = Vec::new();
    for table in select_all(root, "table") {
        for row in select_all(table, "tr").into_iter().take(TABLE_ROWS_PER_TABLE) {
            let cells = select_all(row, "td, th");
            if cells.len() < 2 {
                continue;
            }
            let label = clean_text(&element_text(cells[0]), LINE_MAX);
            let value = clean_text(&element_text(cells[1]), LINE_MAX);
            if !label.is_empty() && !value.is_empty() {
                specs.push(format!("{label}: {value}"));
            }
        }
    }
    specs.truncate(MAX_TABLE_SPECS);
    specs
}
