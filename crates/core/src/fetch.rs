//! Fetching candidate pages and probing remote images.
//!
//! The orchestrator talks to the network only through the [`PageFetcher`]
//! and [`ImageProbe`](crate::images::ImageProbe) traits. With the `fetch`
//! feature enabled, [`HttpFetcher`] and [`HttpImageProbe`] implement them on
//! top of `reqwest`.

use async_trait::async_trait;
use url::Url;

use crate::Result;

/// HTTP client configuration for fetching web pages.
///
/// This is passed to the fetcher when it is built; there is no shared
/// global agent.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) \
                         Version/17.0 Safari/605.1.15"
                .to_string(),
        }
    }
}

/// A successfully fetched HTML page, before parsing.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL of the page, after redirects.
    pub url: Url,
    /// Decoded response body.
    pub body: String,
}

/// Retrieves candidate pages.
///
/// Implementations classify every failure into a
/// [`FetchErrorKind`](crate::FetchErrorKind) and report it as
/// [`SiftError::Fetch`](crate::SiftError::Fetch).
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and returns the HTML page behind it.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Whether a `Content-Type` header value denotes an HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

#[cfg(feature = "fetch")]
pub use http::{HttpFetcher, HttpImageProbe};

#[cfg(feature = "fetch")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
    use tracing::debug;
    use url::Url;

    use super::{FetchConfig, FetchedPage, PageFetcher, is_html_content_type};
    use crate::images::{ImageProbe, ImageSize, probe_dimensions};
    use crate::{FetchError, FetchErrorKind, Result, SiftError};

    fn build_client(config: &FetchConfig) -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(SiftError::HttpError)
    }

    /// Parses a candidate URL and makes sure it is something HTTP can fetch.
    fn checked_url(url: &str) -> std::result::Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::new(FetchErrorKind::InvalidUrl, url, e.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FetchError::new(
                FetchErrorKind::UnsupportedScheme,
                url,
                format!("scheme '{}' is not supported", other),
            )),
        }
    }

    /// Maps a reqwest failure onto the closed set of fetch failure kinds.
    ///
    /// `ConnectionReset` is best-effort: it is reported only when an I/O
    /// reset surfaces in the error's source chain. A peer that simply closes
    /// the socket is reported as `Transport`.
    fn classify(url: &str, err: &reqwest::Error) -> FetchError {
        let kind = if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if err.is_status() {
            FetchErrorKind::ResponseStatus
        } else if err.is_builder() {
            FetchErrorKind::InvalidUrl
        } else if is_connection_reset(err) {
            FetchErrorKind::ConnectionReset
        } else {
            FetchErrorKind::Transport
        };
        FetchError::new(kind, url, err.to_string())
    }

    /// Walks `err` and its sources looking for an I/O connection reset.
    fn is_connection_reset(err: &(dyn std::error::Error + 'static)) -> bool {
        let mut source = Some(err);
        while let Some(cause) = source {
            if let Some(io) = cause.downcast_ref::<std::io::Error>()
                && io.kind() == std::io::ErrorKind::ConnectionReset
            {
                return true;
            }
            source = cause.source();
        }
        false
    }

    /// Page fetcher backed by a shared reqwest client.
    ///
    /// Redirects are followed with reqwest's default policy; the final URL
    /// is reported on the fetched page.
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
    }

    impl HttpFetcher {
        /// Builds a fetcher from the given configuration.
        pub fn new(config: &FetchConfig) -> Result<Self> {
            Ok(Self { client: build_client(config)? })
        }

        /// The underlying HTTP client.
        pub fn client(&self) -> &Client {
            &self.client
        }
    }

    #[async_trait]
    impl PageFetcher for HttpFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            let parsed = checked_url(url)?;

            let response = self
                .client
                .get(parsed)
                .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
                .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| classify(url, &e))?;

            if let Some(content_type) = response.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
                && !is_html_content_type(content_type)
            {
                return Err(FetchError::new(FetchErrorKind::NotHtml, url, content_type.to_string()).into());
            }

            let final_url = response.url().clone();
            let body = response.text().await.map_err(|e| classify(url, &e))?;
            debug!(url, final_url = %final_url, bytes = body.len(), "fetched page");

            Ok(FetchedPage { url: final_url, body })
        }
    }

    /// Image probe that downloads the image and reads its header.
    #[derive(Debug, Clone)]
    pub struct HttpImageProbe {
        client: Client,
    }

    impl HttpImageProbe {
        /// Builds a probe from the given configuration.
        pub fn new(config: &FetchConfig) -> Result<Self> {
            Ok(Self { client: build_client(config)? })
        }

        /// Builds a probe that reuses an existing client.
        pub fn with_client(client: Client) -> Self {
            Self { client }
        }
    }

    #[async_trait]
    impl ImageProbe for HttpImageProbe {
        async fn probe(&self, url: &str) -> Result<ImageSize> {
            let probe_error = |message: String| SiftError::ImageProbe { url: url.to_string(), message };

            let parsed = checked_url(url).map_err(|e| probe_error(e.to_string()))?;
            let bytes = self
                .client
                .get(parsed)
                .header(ACCEPT, "image/*,*/*;q=0.8")
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| probe_error(e.to_string()))?
                .bytes()
                .await
                .map_err(|e| probe_error(e.to_string()))?;

            probe_dimensions(&bytes).map_err(|e| probe_error(e.to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use std::io::{Cursor, Read, Write};
        use std::net::TcpListener;
        use std::thread;
        use std::time::Duration;

        use super::*;

        /// Serves one connection on a local port: reads the request, waits
        /// `delay`, then writes `response` or hangs up when there is none.
        fn serve_once(response: Option<Vec<u8>>, delay: Duration) -> String {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let addr = listener.local_addr().unwrap();
            thread::spawn(move || {
                if let Ok((mut stream, _)) = listener.accept() {
                    let mut request = [0u8; 4096];
                    let _ = stream.read(&mut request);
                    thread::sleep(delay);
                    if let Some(response) = response {
                        let _ = stream.write_all(&response);
                        let _ = stream.flush();
                    }
                }
            });
            format!("http://{addr}/page")
        }

        fn http_response(status: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
            let mut response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            )
            .into_bytes();
            response.extend_from_slice(body);
            response
        }

        fn png_bytes(width: u32, height: u32) -> Vec<u8> {
            let mut bytes = Cursor::new(Vec::new());
            image::RgbImage::new(width, height)
                .write_to(&mut bytes, image::ImageFormat::Png)
                .unwrap();
            bytes.into_inner()
        }

        #[derive(Debug, thiserror::Error)]
        #[error("request failed")]
        struct Wrapped(#[source] std::io::Error);

        fn fetcher() -> HttpFetcher {
            HttpFetcher::new(&FetchConfig { timeout: 5, ..Default::default() }).unwrap()
        }

        fn fetch_kind(result: Result<FetchedPage>) -> Option<FetchErrorKind> {
            match result {
                Err(SiftError::Fetch(err)) => Some(err.kind),
                _ => None,
            }
        }

        #[test]
        fn test_checked_url() {
            assert!(checked_url("https://example.com/a").is_ok());
            assert_eq!(checked_url("example.com").unwrap_err().kind, FetchErrorKind::InvalidUrl);
            assert_eq!(checked_url("ftp://example.com/a").unwrap_err().kind, FetchErrorKind::UnsupportedScheme);
        }

        #[tokio::test]
        async fn test_fetch_invalid_url() {
            let result = fetcher().fetch("not-a-url").await;
            assert_eq!(fetch_kind(result), Some(FetchErrorKind::InvalidUrl));
        }

        #[tokio::test]
        async fn test_fetch_unsupported_scheme() {
            let result = fetcher().fetch("file:///etc/hostname").await;
            assert_eq!(fetch_kind(result), Some(FetchErrorKind::UnsupportedScheme));
        }

        #[tokio::test]
        async fn test_fetch_connection_refused() {
            let result = fetcher().fetch("http://127.0.0.1:9/").await;
            assert!(matches!(
                fetch_kind(result),
                Some(FetchErrorKind::Transport | FetchErrorKind::ConnectionReset)
            ));
        }

        #[tokio::test]
        async fn test_probe_invalid_url() {
            let probe = HttpImageProbe::new(&FetchConfig::default()).unwrap();
            let result = probe.probe("data:image/png;base64,AAAA").await;
            assert!(matches!(result, Err(SiftError::ImageProbe { .. })));
        }

        #[tokio::test]
        async fn test_fetch_html_page() {
            let body = "<html><head><title>Local</title></head></html>";
            let url = serve_once(Some(http_response("200 OK", "text/html; charset=utf-8", body.as_bytes())), Duration::ZERO);

            let page = fetcher().fetch(&url).await.unwrap();
            assert_eq!(page.url.as_str(), url);
            assert_eq!(page.body, body);
        }

        #[tokio::test]
        async fn test_fetch_error_status() {
            let url = serve_once(Some(http_response("404 Not Found", "text/html", b"gone")), Duration::ZERO);
            let result = fetcher().fetch(&url).await;
            assert_eq!(fetch_kind(result), Some(FetchErrorKind::ResponseStatus));
        }

        #[tokio::test]
        async fn test_fetch_not_html() {
            let url = serve_once(Some(http_response("200 OK", "image/png", &png_bytes(2, 2))), Duration::ZERO);
            let result = fetcher().fetch(&url).await;
            assert_eq!(fetch_kind(result), Some(FetchErrorKind::NotHtml));
        }

        #[tokio::test]
        async fn test_fetch_timeout() {
            let url = serve_once(Some(http_response("200 OK", "text/html", b"late")), Duration::from_secs(3));
            let fetcher = HttpFetcher::new(&FetchConfig { timeout: 1, ..Default::default() }).unwrap();
            let result = fetcher.fetch(&url).await;
            assert_eq!(fetch_kind(result), Some(FetchErrorKind::Timeout));
        }

        #[tokio::test]
        async fn test_fetch_peer_hangs_up() {
            let url = serve_once(None, Duration::ZERO);
            let result = fetcher().fetch(&url).await;
            // Closing with unread bytes may turn into an RST, depending on timing
            assert!(matches!(
                fetch_kind(result),
                Some(FetchErrorKind::Transport | FetchErrorKind::ConnectionReset)
            ));
        }

        #[test]
        fn test_connection_reset_found_in_source_chain() {
            let reset = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
            assert!(is_connection_reset(&reset));
            assert!(is_connection_reset(&Wrapped(reset)));

            let refused = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
            assert!(!is_connection_reset(&Wrapped(refused)));
        }

        #[tokio::test]
        async fn test_probe_measures_downloaded_image() {
            let url = serve_once(Some(http_response("200 OK", "image/png", &png_bytes(100, 80))), Duration::ZERO);
            let probe = HttpImageProbe::new(&FetchConfig { timeout: 5, ..Default::default() }).unwrap();

            let size = probe.probe(&url).await.unwrap();
            assert_eq!(size, ImageSize { width: 100, height: 80 });
        }

        #[tokio::test]
        async fn test_probe_error_status() {
            let url = serve_once(Some(http_response("404 Not Found", "text/plain", b"gone")), Duration::ZERO);
            let probe = HttpImageProbe::new(&FetchConfig { timeout: 5, ..Default::default() }).unwrap();

            let result = probe.probe(&url).await;
            assert!(matches!(result, Err(SiftError::ImageProbe { .. })));
        }

        #[tokio::test]
        async fn test_probe_undecodable_body() {
            let url = serve_once(Some(http_response("200 OK", "image/png", b"not an image")), Duration::ZERO);
            let probe = HttpImageProbe::new(&FetchConfig { timeout: 5, ..Default::default() }).unwrap();

            let result = probe.probe(&url).await;
            assert!(matches!(result, Err(SiftError::ImageProbe { .. })));
        }
    }
}
