//! Picking a representative image out of a content container.
//!
//! Selection runs in two passes over the container's `<img>` elements:
//!
//! 1. [`attribute_pass`] trusts the declared `width`/`height` attributes and
//!    needs no network access.
//! 2. [`probe_pass`] runs only when the first pass found nothing. It asks an
//!    [`ImageProbe`] for the real pixel size of every image.
//!
//! Both passes share the [`is_valid_image`] predicate.

use std::io::Cursor;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::Result;
use crate::parse::Document;
use crate::scoring::Container;

/// Ad leaderboard size that is rejected even though it is large enough
const LEADERBOARD: (u32, u32) = (728, 90);

/// Configuration for image selection
#[derive(Debug, Clone)]
pub struct ImageConfig {
    /// Images must be strictly wider than this
    pub min_width: u32,
    /// Images must be strictly taller than this
    pub min_height: u32,
    /// Whether to download images when no declared size qualifies
    pub probe: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self { min_width: 64, min_height: 64, probe: true }
    }
}

/// Pixel dimensions of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Reads the real dimensions of a remote image.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    /// Fetches the image at the absolute `url` and returns its size.
    async fn probe(&self, url: &str) -> Result<ImageSize>;
}

/// Reads the pixel dimensions from raw image bytes.
///
/// Only the header is decoded; the format is guessed from the content.
pub fn probe_dimensions(bytes: &[u8]) -> Result<ImageSize> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::from)?;
    let (width, height) = reader.into_dimensions()?;
    Ok(ImageSize { width, height })
}

/// Whether an image is worth showing.
///
/// Both sides must exceed the configured minimum, the source must not look
/// like a banner or a GIF, and the 728x90 leaderboard size is excluded.
pub fn is_valid_image(width: u32, height: u32, src: &str, config: &ImageConfig) -> bool {
    width > config.min_width
        && height > config.min_height
        && !src.contains("banner")
        && !src.contains(".gif")
        && (width, height) != LEADERBOARD
}

/// Parses a declared dimension the lenient way browsers do: leading digits
/// count, anything else means 0. Values past `u32::MAX` saturate.
pub fn parse_dimension(value: Option<&str>) -> u32 {
    let value = value.unwrap_or_default().trim_start();
    let end = value.find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len());
    let digits = &value[..end];
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u32::MAX)
}

/// Resolves an image source against the base URL.
///
/// Absolute sources are returned unchanged; relative ones are joined.
/// Returns `None` for sources that cannot be resolved.
pub fn resolve_url(src: &str, base: &Url) -> Option<String> {
    let src = src.trim();
    match Url::parse(src) {
        Ok(_) => Some(src.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(src).ok().map(String::from),
        Err(_) => None,
    }
}

/// The URL relative image sources are resolved against: the document's
/// `<base href>` when present, else the page URL.
pub fn base_url(doc: &Document, page_url: &Url) -> Url {
    doc.base_href()
        .and_then(|href| page_url.join(&href).ok())
        .unwrap_or_else(|| page_url.clone())
}

/// An `<img>` element reduced to what selection needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub src: String,
    pub width: u32,
    pub height: u32,
}

impl ImageCandidate {
    /// Collects the container's images in document order, skipping those
    /// without a `src`.
    pub fn collect(container: &Container) -> Vec<Self> {
        container
            .images()
            .iter()
            .filter_map(|img| {
                let src = img.attr("src")?.trim();
                if src.is_empty() {
                    return None;
                }
                Some(Self {
                    src: src.to_string(),
                    width: parse_dimension(img.attr("width")),
                    height: parse_dimension(img.attr("height")),
                })
            })
            .collect()
    }
}

/// First pass: declared dimensions only, no I/O.
pub fn attribute_pass(candidates: &[ImageCandidate], base: &Url, config: &ImageConfig) -> Option<String> {
    candidates
        .iter()
        .filter(|img| is_valid_image(img.width, img.height, &img.src, config))
        .find_map(|img| resolve_url(&img.src, base))
}

/// Second pass: probe every image for its real size.
///
/// Images that cannot be resolved, downloaded or decoded are skipped.
pub async fn probe_pass<P>(
    candidates: &[ImageCandidate], base: &Url, config: &ImageConfig, prober: &P,
) -> Option<String>
where
    P: ImageProbe + ?Sized,
{
    for img in candidates {
        let Some(url) = resolve_url(&img.src, base) else {
            debug!(src = %img.src, "skipping unresolvable image source");
            continue;
        };

        match prober.probe(&url).await {
            Ok(size) if is_valid_image(size.width, size.height, &url, config) => return Some(url),
            Ok(size) => debug!(%url, width = size.width, height = size.height, "probed image rejected"),
            Err(e) => debug!(%url, error = %e, "image probe failed"),
        }
    }
    None
}

/// Selects the representative image of a container.
///
/// The probe pass only starts once the attribute pass has looked at every
/// image, and only when `config.probe` is set.
pub async fn select_image<P>(container: &Container, base: &Url, config: &ImageConfig, prober: &P) -> Option<String>
where
    P: ImageProbe + ?Sized,
{
    let candidates = ImageCandidate::collect(container);
    if candidates.is_empty() {
        return None;
    }

    if let Some(found) = attribute_pass(&candidates, base, config) {
        return Some(found);
    }

    if !config.probe {
        return None;
    }

    probe_pass(&candidates, base, config, prober).await
}
