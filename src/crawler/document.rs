//! Markup parser adapter
//!
//! Wraps a parsed [`scraper::Html`] tree behind the handful of queries the
//! harvester and extractor need: find-first and find-all by CSS selector,
//! lookup by id, trimmed text, attribute access, and structural "next"
//! traversal. Parsing never fails; malformed markup simply yields a tree in
//! which selectors match nothing.

use scraper::{ElementRef, Html, Selector};

/// A parsed, queryable page
pub struct Document {
    html: Html,
}

/// Parses raw page content into a [`Document`]
///
/// # Example
///
/// ```
/// use catalog_harvest::crawler::{parse_document, text_of};
///
/// let doc = parse_document(r#"<div class="col-auto pr-1"><h1> Hades </h1></div>"#);
/// let title = doc.find_first("div.col-auto.pr-1").map(text_of);
/// assert_eq!(title.as_deref(), Some("Hades"));
/// ```
pub fn parse_document(content: &str) -> Document {
    Document {
        html: Html::parse_document(content),
    }
}

impl Document {
    /// First element matching `css`, in document order
    pub fn find_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = compile(css)?;
        self.html.select(&selector).next()
    }

    /// All elements matching `css`, in document order
    pub fn find_all(&self, css: &str) -> Vec<ElementRef<'_>> {
        match compile(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// Element whose `id` attribute equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<ElementRef<'_>> {
        self.find_first(&format!("[id=\"{}\"]", id))
    }

    /// First element matching `css` that starts after `after` in document order
    ///
    /// Like a "find next" over the whole tree, the search includes the
    /// descendants of `after`.
    pub fn next_match<'a>(&'a self, after: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
        let selector = compile(css)?;
        self.html
            .root_element()
            .descendants()
            .skip_while(|node| node.id() != after.id())
            // Skip `after` itself
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|element| selector.matches(element))
    }
}

/// First element matching `css` inside `scope`
pub fn find_first_in<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = compile(css)?;
    scope.select(&selector).next()
}

/// All elements matching `css` inside `scope`
pub fn find_all_in<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match compile(css) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

/// Text content of an element with whitespace trimmed
///
/// Each text node is trimmed and empty ones dropped; the rest are joined with
/// a single space.
pub fn text_of(element: ElementRef<'_>) -> String {
    text_lines(element).join(" ")
}

/// Non-empty trimmed lines of an element's text, in document order
pub fn text_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Attribute value of an element
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Whether an element matches `css`
pub fn matches(element: ElementRef<'_>, css: &str) -> bool {
    compile(css).is_some_and(|selector| selector.matches(&element))
}

/// The next sibling that is an element, skipping text and comments
pub fn next_sibling_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

fn compile(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Invalid selector {:?}: {:?}", css, e);
            None
        }
    }
}
