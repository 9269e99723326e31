pub mod date;
pub mod select;
pub mod table;

pub use date::*;
pub use select::*;
pub use table::*;

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};

/// Collapse every whitespace run to one space and trim the ends.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with whitespace collapsed.
pub fn element_text(element: &ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Outer HTML of the first `tag` element whose id is `id`.
pub fn find_element_html(html: &str, tag: &str, id: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(tag)?;
    let found = document
        .select(&selector)
        .find(|element| element.value().id() == Some(id))
        .map(|element| element.html());
    Ok(found)
}

/// Outer HTML of the first `tag` element, if any.
pub fn first_element_html(html: &str, tag: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);
    let selector = parse_selector(tag)?;
    Ok(document.select(&selector).next().map(|element| element.html()))
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Validation(format!("invalid CSS selector '{}': {:?}", selector, e)))
}
