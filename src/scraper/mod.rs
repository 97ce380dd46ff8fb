pub(crate) mod analytics;
pub(crate) mod match_detail;
pub(crate) mod matchlist;
pub(crate) mod player;
pub(crate) mod team;

pub(crate) use ::scraper::Html;
use ::scraper::{ElementRef, Selector};

pub(crate) const BASE_URL: &str = "https://www.hltv.org";

/// Trimmed text of an element with whitespace-only text nodes dropped.
/// Returns `None` when the element has no visible text.
pub(crate) fn element_text(element: &ElementRef) -> Option<String> {
    let text = element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Text of the first element matching `selector` inside `element`.
/// Returns `None` if nothing matches; never fails on a missing node.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| element_text(&e))
}

/// Value of `attr` on the first element matching `selector` inside `element`.
pub(crate) fn select_attr(element: &ElementRef, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Direct element children of `element`, in document order.
pub(crate) fn child_cells<'a>(element: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap).collect()
}

/// Text of the `index`-th cell, if that cell exists and has text.
pub(crate) fn cell_text(cells: &[ElementRef], index: usize) -> Option<String> {
    cells.get(index).and_then(element_text)
}

/// Resolve a site-relative href against hltv.org.
pub(crate) fn absolute_url(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("{BASE_URL}{href}")
    } else {
        format!("{BASE_URL}/{href}")
    }
}
