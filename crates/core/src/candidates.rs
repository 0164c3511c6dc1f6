//! Picking the best title, text and image from a list of candidate URLs.
//!
//! The main entry point is [`Candidates`]. It fetches every candidate page
//! once, on first use, then walks the pages in list order for each kind of
//! result and keeps the first one that yields something.
//!
//! # Example
//!
//! ```no_run
//! use siftpage_core::Candidates;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut candidates = Candidates::new([
//!     "https://example.com/story",
//!     "https://mirror.example.org/story",
//! ])?;
//!
//! println!("Title: {}", candidates.best_title().await);
//! if let Some(image) = candidates.best_image().await {
//!     println!("Image: {image}");
//! }
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fetch::{FetchConfig, PageFetcher};
use crate::images::{ImageConfig, ImageProbe, select_image};
use crate::page::Page;
use crate::scoring::{ScoreConfig, find_main_content};
use crate::text::extract_text;
use crate::{FetchErrorKind, Result, SiftError};

#[cfg(feature = "fetch")]
use crate::fetch::{HttpFetcher, HttpImageProbe};

/// Configuration for a [`Candidates`] session.
///
/// # Example
///
/// ```rust
/// use siftpage_core::SiftConfig;
///
/// let config = SiftConfig::builder()
///     .timeout(10)
///     .min_image_size(100, 100)
///     .probe_images(false)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SiftConfig {
    /// HTTP settings used by the default fetcher and image probe.
    pub fetch: FetchConfig,
    /// Content scoring weights.
    pub score: ScoreConfig,
    /// Image selection thresholds.
    pub image: ImageConfig,
}

impl SiftConfig {
    /// Creates a new builder for SiftConfig.
    pub fn builder() -> SiftConfigBuilder {
        SiftConfigBuilder::new()
    }
}

/// Builder for SiftConfig.
pub struct SiftConfigBuilder {
    config: SiftConfig,
}

impl SiftConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: SiftConfig::default() }
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.config.fetch.timeout = secs;
        self
    }

    /// Sets the User-Agent sent with every request.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the weight for article-like class and id values.
    pub fn positive_weight(mut self, value: i64) -> Self {
        self.config.score.positive_weight = value;
        self
    }

    /// Sets the weight for comment/footer-like class and id values.
    pub fn negative_weight(mut self, value: i64) -> Self {
        self.config.score.negative_weight = value;
        self
    }

    /// Sets the paragraph length above which a paragraph earns a point.
    pub fn min_paragraph_len(mut self, value: usize) -> Self {
        self.config.score.min_paragraph_len = value;
        self
    }

    /// Sets the size an image must exceed on both sides.
    pub fn min_image_size(mut self, width: u32, height: u32) -> Self {
        self.config.image.min_width = width;
        self.config.image.min_height = height;
        self
    }

    /// Sets whether images are downloaded when no declared size qualifies.
    pub fn probe_images(mut self, value: bool) -> Self {
        self.config.image.probe = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> SiftConfig {
        self.config
    }
}

impl Default for SiftConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The three results of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    /// Best title, or the first candidate URL when no page has one.
    pub title: String,
    /// Best body text.
    pub text: Option<String>,
    /// Absolute URL of the best image.
    pub image: Option<String>,
}

impl Extraction {
    /// Gets the extraction as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// An ordered list of candidate URLs for one logical item.
///
/// Pages are fetched lazily, at most once per URL, and shared by the three
/// accessors. Each result is memoized once computed, absent results
/// included. Failing URLs are logged and skipped.
pub struct Candidates<F, P> {
    urls: Vec<String>,
    fetcher: F,
    prober: P,
    config: SiftConfig,
    pages: Option<Vec<Page>>,
    best_title: Option<String>,
    best_text: Option<Option<String>>,
    best_image: Option<Option<String>>,
}

#[cfg(feature = "fetch")]
impl Candidates<HttpFetcher, HttpImageProbe> {
    /// Creates a session over `urls` with the default HTTP collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::HttpError`] if the HTTP client cannot be built.
    pub fn new<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(urls, SiftConfig::default())
    }

    /// Creates a session over `urls` with the default HTTP collaborators
    /// built from `config`.
    pub fn with_config<I, S>(urls: I, config: SiftConfig) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let prober = HttpImageProbe::with_client(fetcher.client().clone());
        Ok(Self::with_parts(urls, fetcher, prober, config))
    }
}

impl<F, P> Candidates<F, P>
where
    F: PageFetcher,
    P: ImageProbe,
{
    /// Creates a session with explicit collaborators.
    pub fn with_parts<I, S>(urls: I, fetcher: F, prober: P, config: SiftConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            fetcher,
            prober,
            config,
            pages: None,
            best_title: None,
            best_text: None,
            best_image: None,
        }
    }

    /// The candidate URLs, in priority order.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// The session configuration.
    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// The pages that could be fetched, in candidate order.
    pub async fn pages(&mut self) -> &[Page] {
        self.ensure_pages().await;
        self.pages.as_deref().unwrap_or_default()
    }

    /// The best title.
    ///
    /// Falls back to the first candidate URL when no page has a non-blank
    /// `<title>`, and to an empty string when there are no candidates.
    pub async fn best_title(&mut self) -> String {
        if let Some(title) = &self.best_title {
            return title.clone();
        }
        self.ensure_pages().await;

        let found = self
            .pages
            .iter()
            .flatten()
            .find_map(|page| page.title().map(|title| (page.url().to_string(), title)));

        let title = match found {
            Some((url, title)) => {
                info!(%url, "title picked");
                title
            }
            None => {
                debug!("no candidate has a title, falling back to the first url");
                self.urls.first().cloned().unwrap_or_default()
            }
        };

        self.best_title = Some(title.clone());
        title
    }

    /// The best body text, `None` when no page has a content container
    /// with text in it.
    pub async fn best_text(&mut self) -> Option<String> {
        if let Some(text) = &self.best_text {
            return text.clone();
        }
        self.ensure_pages().await;

        let score = &self.config.score;
        let found = self.pages.iter().flatten().find_map(|page| {
            let container = find_main_content(page.document(), score);
            let text = extract_text(container.as_ref())?;
            info!(url = %page.url(), chars = text.chars().count(), "text picked");
            Some(text)
        });

        self.best_text = Some(found.clone());
        found
    }

    /// The absolute URL of the best image, `None` when no page has a
    /// qualifying image in its content container.
    pub async fn best_image(&mut self) -> Option<String> {
        if let Some(image) = &self.best_image {
            return image.clone();
        }
        self.ensure_pages().await;

        let mut found = None;
        for page in self.pages.iter().flatten() {
            let Some(container) = find_main_content(page.document(), &self.config.score) else {
                continue;
            };

            let base = page.base_url();
            if let Some(image) = select_image(&container, &base, &self.config.image, &self.prober).await {
                info!(url = %page.url(), %image, "image picked");
                found = Some(image);
                break;
            }
        }

        self.best_image = Some(found.clone());
        found
    }

    /// Computes all three results.
    pub async fn extract_all(&mut self) -> Extraction {
        let title = self.best_title().await;
        let text = self.best_text().await;
        let image = self.best_image().await;
        Extraction { title, text, image }
    }

    async fn ensure_pages(&mut self) {
        if self.pages.is_some() {
            return;
        }

        let mut pages = Vec::with_capacity(self.urls.len());
        for url in &self.urls {
            match self.fetcher.fetch(url).await {
                Ok(fetched) => pages.push(Page::from_fetched(fetched)),
                Err(e) => report_fetch_failure(url, &e),
            }
        }

        debug!(fetched = pages.len(), candidates = self.urls.len(), "candidate pages fetched");
        self.pages = Some(pages);
    }
}

/// Logs a skipped candidate. The kind only changes the message and level.
fn report_fetch_failure(url: &str, err: &SiftError) {
    let SiftError::Fetch(fetch) = err else {
        warn!(url, error = %err, "There was a problem connecting");
        return;
    };

    match fetch.kind {
        FetchErrorKind::Timeout => warn!(url, "Timeout"),
        FetchErrorKind::ConnectionReset => warn!(url, "Connection reset by peer"),
        FetchErrorKind::InvalidUrl => warn!(url, reason = %fetch.message, "Invalid url"),
        FetchErrorKind::ResponseStatus => warn!(url, status = %fetch.message, "Bad response"),
        FetchErrorKind::UnsupportedScheme => warn!(url, "Unsupported scheme"),
        FetchErrorKind::NotHtml => debug!(url, content_type = %fetch.message, "Not an HTML page"),
        FetchErrorKind::Transport => warn!(url, error = %fetch.message, "There was a problem connecting"),
    }
}

/// Convenience function: extract everything from `urls` with defaults.
///
/// # Example
///
/// ```no_run
/// use siftpage_core::extract;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let extraction = extract(["https://example.com/article"]).await?;
///     println!("Title: {}", extraction.title);
///     Ok(())
/// }
/// ```
#[cfg(feature = "fetch")]
pub async fn extract<I, S>(urls: I) -> Result<Extraction>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut candidates = Candidates::new(urls)?;
    Ok(candidates.extract_all().await)
}
