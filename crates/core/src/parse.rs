//! HTML parsing and DOM access.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use siftpage_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.title(), Some("Title".to_string()));
//! assert_eq!(doc.select("p.content").unwrap().len(), 1);
//! ```

use scraper::{ElementRef, Html, Selector};

use crate::{Result, SiftError};

/// Represents a parsed HTML document or fragment.
///
/// A Document wraps a `scraper::Html` tree and provides methods for querying
/// elements using CSS selectors and reading page metadata.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a complete HTML document.
    ///
    /// Parsing never fails: malformed markup is recovered the way browsers
    /// recover it.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses an HTML fragment, as found inside `<body>`.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire HTML as a string.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use siftpage_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = compile_selector(selector)?;
        Ok(self.html.root_element().select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the title of the document.
    ///
    /// Returns the text of the first `<title>` element if present.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .root_element()
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>())
    }

    /// Gets the `href` of the first `<base>` element, as written in the page.
    pub fn base_href(&self) -> Option<String> {
        let selector = Selector::parse("base[href]").ok()?;
        self.html
            .root_element()
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// Removes every element matching `selector` from the tree.
    ///
    /// Returns how many subtrees were detached.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::HtmlParseError`] if the selector is invalid.
    pub fn remove(&mut self, selector: &str) -> Result<usize> {
        let sel = compile_selector(selector)?;
        let ids: Vec<_> = self.html.root_element().select(&sel).map(|el| el.id()).collect();

        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use siftpage_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the underlying scraper element.
    pub fn as_element_ref(&self) -> ElementRef<'a> {
        self.element
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute, `None` if it is not present.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Gets the parent element, `None` for the root or a non-element parent.
    pub fn parent(&self) -> Option<Element<'a>> {
        self.element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = compile_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}

fn compile_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| SiftError::HtmlParseError(format!("Invalid selector: {}", e)))
}
