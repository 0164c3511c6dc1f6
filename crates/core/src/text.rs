//! Plain text extraction from a content container.

use crate::scoring::Container;

/// Extracts the normalized text of a container.
///
/// Tabs and newlines are removed (not replaced), the result is trimmed and
/// then passed through [`sanitize`]. Returns `None` when there is no
/// container or nothing is left.
pub fn extract_text(container: Option<&Container>) -> Option<String> {
    let raw = container?.text();
    let flattened: String = raw.chars().filter(|c| !matches!(c, '\t' | '\n')).collect();
    let text = sanitize(flattened.trim());

    if text.is_empty() { None } else { Some(text) }
}

/// Drops characters that only exist because a byte sequence could not be
/// decoded: U+FFFD replacement characters and NUL.
///
/// Pages are decoded lossily by the fetcher, so invalid input never fails
/// here; it just loses the undecodable bytes.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\u{FFFD}' | '\0')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use crate::scoring::{ScoreConfig, find_main_content};

    fn container_for(html: &str) -> Option<Container> {
        find_main_content(&Document::parse(html), &ScoreConfig::default())
    }

    #[test]
    fn test_extract_text_strips_tabs_and_newlines() {
        let container = container_for("<div class=\"post\"><p>\n\tFirst line,\n\tsecond line\n</p></div>");
        let text = extract_text(container.as_ref()).unwrap();
        assert_eq!(text, "First line,second line");
    }

    #[test]
    fn test_extract_text_without_container() {
        assert_eq!(extract_text(None), None);
    }

    #[test]
    fn test_extract_text_empty_container() {
        let container = container_for("<div class=\"post\"><p>\n\t  \n</p></div>");
        assert!(container.is_some());
        assert_eq!(extract_text(container.as_ref()), None);
    }

    #[test]
    fn test_extract_text_skips_stripped_headings() {
        let container = container_for("<div class=\"entry\"><h1>Headline</h1><p>The body, in full.</p></div>");
        let text = extract_text(container.as_ref()).unwrap();
        assert_eq!(text, "The body, in full.");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("caf\u{FFFD}e\0 bar"), "cafe bar");
        assert_eq!(sanitize("naïve café"), "naïve café");
    }
}
