pub mod candidates;
pub mod error;
pub mod fetch;
pub mod images;
pub mod page;
pub mod parse;
pub mod scoring;
pub mod text;

#[cfg(feature = "fetch")]
pub use candidates::extract;
pub use candidates::{Candidates, Extraction, SiftConfig, SiftConfigBuilder};
pub use error::{FetchError, FetchErrorKind, Result, SiftError};
pub use fetch::{FetchConfig, FetchedPage, PageFetcher, is_html_content_type};
#[cfg(feature = "fetch")]
pub use fetch::{HttpFetcher, HttpImageProbe};
pub use images::{
    ImageCandidate, ImageConfig, ImageProbe, ImageSize, attribute_pass, base_url, is_valid_image, parse_dimension,
    probe_dimensions, probe_pass, resolve_url, select_image,
};
pub use page::Page;
pub use parse::Document;
#[doc(hidden)]
pub use scoring::{ScoredParent, attribute_weight, class_id_weight, paragraph_score, score_candidates};
pub use scoring::{Container, ScoreConfig, find_main_content};
pub use text::{extract_text, sanitize};
