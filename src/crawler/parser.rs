//! Page parsers for the Justia codes and regulations sites
//!
//! The engine only sees the `PageParser` trait. Both sites share one layout
//! family:
//! - Child links live inside `.codes-listing`
//! - Long listings continue on a page linked with `rel="next"`
//! - Documents carry their body in `#codes-content`, a heading in `h1`
//!   and a breadcrumb trail in `nav.breadcrumbs`
//!
//! They differ in where the citation sits, so each site gets its own type.

use crate::state::{ChildNode, NodeKind};
use crate::storage::layout::url_slug;
use crate::targets::Mode;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

const LISTING_SELECTOR: &str = ".codes-listing";
const CONTENT_SELECTOR: &str = "#codes-content";
const NEXT_PAGE_SELECTOR: &str = "a[rel~=\"next\"][href]";
const TITLE_SELECTOR: &str = "h1";
const BREADCRUMB_SELECTOR: &str = "nav.breadcrumbs";
const CODES_CITATION_SELECTOR: &str = "div.citation span";
const REGULATIONS_CITATION_SELECTOR: &str = "a[href=\"/citations.html\"]";

/// Separator used between heading parts and breadcrumb entries
const PATH_SEPARATOR: &str = " › ";

/// Slug words that mark a document rather than a listing
///
/// A slug is a leaf when it is one of these words or starts with the word
/// followed by `-`; `rules-of-practice` and `sections-1-to-9` are listings.
const LEAF_SLUG_WORDS: [&str; 2] = ["section", "rule"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Asked for a listing, got a document
    #[error("{url} is a document page, not a listing")]
    DocumentPage { url: String },

    /// Asked for a document, got a listing
    #[error("{url} is a listing page, not a document")]
    ListingPage { url: String },

    #[error("Unrecognized markup at {url}: {reason}")]
    Unrecognized { url: String, reason: String },
}

impl ParseError {
    fn unrecognized(url: &Url, reason: impl Into<String>) -> Self {
        Self::Unrecognized {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Children in page order, without duplicates
    pub children: Vec<ChildNode>,

    /// Continuation of this listing, if paginated
    pub next_page: Option<Url>,
}

/// Site-specific markup rules
pub trait PageParser: Send + Sync {
    /// Lists the children of a non-leaf node
    ///
    /// `kind` is the kind of the node whose page this is; non-leaf children
    /// are assigned `kind.next_branch()`.
    fn discover_children(
        &self,
        node_url: &Url,
        kind: NodeKind,
        body: &[u8],
    ) -> Result<Listing, ParseError>;

    /// Renders a document page as plain text
    fn extract_document_text(&self, leaf_url: &Url, body: &[u8]) -> Result<String, ParseError>;
}

/// Returns the parser for a content mode
pub fn parser_for(mode: Mode) -> Arc<dyn PageParser> {
    match mode {
        Mode::Codes => Arc::new(CodesParser),
        Mode::Regulations => Arc::new(RegulationsParser),
    }
}

/// Parser for `law.justia.com/codes/...`
#[derive(Debug, Default, Clone, Copy)]
pub struct CodesParser;

impl PageParser for CodesParser {
    fn discover_children(
        &self,
        node_url: &Url,
        kind: NodeKind,
        body: &[u8],
    ) -> Result<Listing, ParseError> {
        parse_listing(node_url, kind, body)
    }

    fn extract_document_text(&self, leaf_url: &Url, body: &[u8]) -> Result<String, ParseError> {
        render_document(leaf_url, body, CODES_CITATION_SELECTOR)
    }
}

/// Parser for `regulations.justia.com/states/...`
#[derive(Debug, Default, Clone, Copy)]
pub struct RegulationsParser;

impl PageParser for RegulationsParser {
    fn discover_children(
        &self,
        node_url: &Url,
        kind: NodeKind,
        body: &[u8],
    ) -> Result<Listing, ParseError> {
        parse_listing(node_url, kind, body)
    }

    fn extract_document_text(&self, leaf_url: &Url, body: &[u8]) -> Result<String, ParseError> {
        render_document(leaf_url, body, REGULATIONS_CITATION_SELECTOR)
    }
}

fn selector(url: &Url, css: &str) -> Result<Selector, ParseError> {
    Selector::parse(css)
        .map_err(|e| ParseError::unrecognized(url, format!("bad selector {}: {}", css, e)))
}

fn parse_listing(node_url: &Url, kind: NodeKind, body: &[u8]) -> Result<Listing, ParseError> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let listing_selector = selector(node_url, LISTING_SELECTOR)?;
    let listing = match document.select(&listing_selector).next() {
        Some(listing) => listing,
        None => {
            let content_selector = selector(node_url, CONTENT_SELECTOR)?;
            if document.select(&content_selector).next().is_some() {
                return Err(ParseError::DocumentPage {
                    url: node_url.to_string(),
                });
            }
            return Err(ParseError::unrecognized(node_url, "no listing block"));
        }
    };

    let link_selector = selector(node_url, "a[href]")?;
    let mut seen = HashSet::new();
    let mut children = Vec::new();

    for element in listing.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_link(href, node_url) else {
            continue;
        };
        if url == *node_url || !seen.insert(url.clone()) {
            continue;
        }

        let name = collapse_whitespace(&element.text().collect::<String>());
        let name = if name.is_empty() {
            url_slug(&url).unwrap_or_default()
        } else {
            name
        };

        let child_kind = if is_leaf_url(&url) {
            NodeKind::Leaf
        } else {
            kind.next_branch()
        };

        children.push(ChildNode {
            url,
            name,
            kind: child_kind,
        });
    }

    let next_selector = selector(node_url, NEXT_PAGE_SELECTOR)?;
    let next_page = document
        .select(&next_selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_link(href, node_url))
        .find(|url| url != node_url);

    Ok(Listing {
        children,
        next_page,
    })
}

fn render_document(leaf_url: &Url, body: &[u8], citation_css: &str) -> Result<String, ParseError> {
    let html = String::from_utf8_lossy(body);
    let document = Html::parse_document(&html);

    let content_selector = selector(leaf_url, CONTENT_SELECTOR)?;
    let Some(content) = document.select(&content_selector).next() else {
        let listing_selector = selector(leaf_url, LISTING_SELECTOR)?;
        if document.select(&listing_selector).next().is_some() {
            return Err(ParseError::ListingPage {
                url: leaf_url.to_string(),
            });
        }
        return Err(ParseError::unrecognized(leaf_url, "no document content block"));
    };

    let content_lines = text_lines(content);
    if content_lines.is_empty() {
        return Err(ParseError::unrecognized(leaf_url, "document content is empty"));
    }

    let title_selector = selector(leaf_url, TITLE_SELECTOR)?;
    let title = document
        .select(&title_selector)
        .map(|h| collapse_whitespace(&h.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR);

    let breadcrumb_selector = selector(leaf_url, BREADCRUMB_SELECTOR)?;
    let breadcrumbs = document
        .select(&breadcrumb_selector)
        .next()
        .map(|nav| {
            text_lines(nav)
                .into_iter()
                .filter(|part| !part.chars().all(|c| c == '›' || c == '>'))
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR)
        })
        .unwrap_or_default();

    let citation_selector = selector(leaf_url, citation_css)?;
    let citation = document
        .select(&citation_selector)
        .map(|c| collapse_whitespace(&c.text().collect::<String>()))
        .find(|c| !c.is_empty());

    let mut text = String::new();
    for header in [title, breadcrumbs] {
        if !header.is_empty() {
            text.push_str(&header);
            text.push('\n');
        }
    }
    if let Some(citation) = citation {
        text.push_str("Citation: ");
        text.push_str(&citation);
        text.push('\n');
    }
    text.push_str("Source: ");
    text.push_str(leaf_url.as_str());
    text.push_str("\n\n");
    text.push_str(&content_lines.join("\n"));
    text.push('\n');

    Ok(text)
}

/// Non-empty trimmed text nodes under `element`
fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_leaf_url(url: &Url) -> bool {
    url_slug(url)
        .map(|slug| {
            let slug = slug.to_ascii_lowercase();
            LEAF_SLUG_WORDS.iter().any(|word| {
                slug.strip_prefix(word)
                    .map_or(false, |rest| rest.is_empty() || rest.starts_with('-'))
            })
        })
        .unwrap_or(false)
}

/// Resolves a link href to an absolute http(s) URL without fragment
///
/// Returns None for empty hrefs, same-page anchors, `javascript:`/`mailto:`
/// style schemes and anything that does not resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = base_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}
