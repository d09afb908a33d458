//! HTML link extraction
//!
//! This module parses a fetched page and extracts:
//! - The page title (once per page)
//! - Every in-scope `<a href>` link, resolved to an absolute URL
//! - A human-readable label for each link

use crate::url::Scope;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::iter::successors;
use url::Url;

/// Title used when a page has no usable `<title>`
pub const NO_TITLE: &str = "No Title Found";

/// Label used when neither the anchor nor its two nearest ancestors have text
pub const NO_TEXT: &str = "No text available";

/// How far up the tree the anchor label search may go
const LABEL_ANCESTOR_LEVELS: usize = 2;

/// A link discovered on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// Absolute URL after resolution against the page URL
    pub url: String,
    pub anchor_text: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub title: String,

    /// In-scope links, first occurrence of each URL only
    pub links: Vec<CandidateLink>,

    /// Links dropped because they were outside the scope
    pub out_of_scope: usize,
}

/// Parses HTML content and extracts the title and in-scope links
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">` that resolves to an `http`/`https` URL
/// inside `scope`.
///
/// **Exclude:**
/// - empty and fragment-only (`#section`) hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - anything that fails to resolve
/// - a URL already seen earlier on the same page (exact, case-sensitive match)
///
/// Malformed HTML never fails: the parser recovers and at worst the page has
/// zero links.
///
/// # Example
///
/// ```
/// use sumi_linkcheck::crawler::extract_links;
/// use sumi_linkcheck::url::{Scope, ScopeMode};
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let scope = Scope::for_seed(&base, ScopeMode::RegistrableDomain, &[]);
/// let html = r#"<html><head><title>Home</title></head><body><a href="/about">About</a></body></html>"#;
///
/// let page = extract_links(&base, html, &scope);
/// assert_eq!(page.title, "Home");
/// assert_eq!(page.links[0].url, "https://example.com/about");
/// assert_eq!(page.links[0].anchor_text, "About");
/// ```
pub fn extract_links(base_url: &Url, html: &str, scope: &Scope) -> ParsedPage {
    let document = Html::parse_document(html);
    let title = extract_title(&document);

    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let mut out_of_scope = 0;

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return ParsedPage {
            title,
            links,
            out_of_scope,
        };
    };

    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_link(href, base_url) else {
            continue;
        };

        if !scope.contains(&resolved) {
            tracing::trace!("Dropping out-of-scope link {}", resolved);
            out_of_scope += 1;
            continue;
        }

        let url = resolved.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }

        links.push(CandidateLink {
            url,
            anchor_text: anchor_label(element),
        });
    }

    ParsedPage {
        title,
        links,
        out_of_scope,
    }
}

/// Extracts the page title from the first `<title>` element
fn extract_title(document: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(element_text)
        })
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Derives the label of an anchor
///
/// Tries the anchor's own text, then its parent's, then its grandparent's,
/// and falls back to [`NO_TEXT`].
fn anchor_label(anchor: ElementRef<'_>) -> String {
    successors(Some(anchor), |element| {
        element.parent().and_then(ElementRef::wrap)
    })
    .take(LABEL_ANCESTOR_LEVELS + 1)
    .map(element_text)
    .find(|text| !text.is_empty())
    .unwrap_or_else(|| NO_TEXT.to_string())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves an href to an absolute URL, or `None` if it should be skipped
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    matches!(resolved.scheme(), "http" | "https").then_some(resolved)
}
