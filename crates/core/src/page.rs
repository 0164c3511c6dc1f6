//! A fetched and parsed candidate page.

use url::Url;

use crate::fetch::FetchedPage;
use crate::images::base_url;
use crate::parse::Document;
use crate::text::sanitize;

/// A candidate page: its document, where it came from and its title.
pub struct Page {
    document: Document,
    url: Url,
    title: Option<String>,
}

impl Page {
    /// Parses a fetched page.
    pub fn from_fetched(fetched: FetchedPage) -> Self {
        Self::parse(&fetched.body, fetched.url)
    }

    /// Parses `html` as the page found at `url`.
    pub fn parse(html: &str, url: Url) -> Self {
        let document = Document::parse(html);
        let title = document.title();
        Self { document, url, title }
    }

    /// The parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The URL the page was served from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The raw `<title>` text, if the page has one.
    pub fn raw_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The page title, trimmed and sanitized. `None` if missing or blank.
    pub fn title(&self) -> Option<String> {
        let title = sanitize(self.title.as_deref()?.trim());
        if title.is_empty() { None } else { Some(title) }
    }

    /// The URL relative references on this page resolve against.
    pub fn base_url(&self) -> Url {
        base_url(&self.document, &self.url)
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url.as_str())
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}
