//! Content scoring: finding the element that holds the main text of a page.
//!
//! Every `<p>` in the document votes for its parent element. The parent with
//! the highest accumulated score becomes the content [`Container`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::parse::{Document, Element};

/// Configuration for the content scoring pass
#[derive(Debug, Clone)]
pub struct ScoreConfig {
    /// Added when a class or id looks like an article body
    pub positive_weight: i64,
    /// Added when a class or id looks like comments, metadata or a footer
    pub negative_weight: i64,
    /// Paragraphs with more characters than this earn one point
    pub min_paragraph_len: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self { positive_weight: 25, negative_weight: -50, min_paragraph_len: 10 }
    }
}

/// Negative patterns: any occurrence anywhere in the attribute value
static NEGATIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)comment|meta|footer|footnote").expect("NEGATIVE_RE should compile"));

/// Positive patterns: a whole whitespace-separated word of the attribute value
static POSITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|\s)(post|hentry|entry([-_]?(content|text|body))?|article([-_]?(content|text|body))?)(\s|$)")
        .expect("POSITIVE_RE should compile")
});

/// Tags removed from the winning container before text or images are read
const STRIPPED_SELECTOR: &str = "script, iframe, h1, h2";

/// Weight contributed by a single class or id value.
///
/// Negative patterns take precedence over positive ones.
pub fn attribute_weight(value: &str, config: &ScoreConfig) -> i64 {
    if NEGATIVE_RE.is_match(value) {
        config.negative_weight
    } else if POSITIVE_RE.is_match(value) {
        config.positive_weight
    } else {
        0
    }
}

/// Weight of a parent element's class and id, each judged independently.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> i64 {
    let class = element.attr("class").unwrap_or_default();
    let id = element.attr("id").unwrap_or_default();
    attribute_weight(class, config) + attribute_weight(id, config)
}

/// Points a paragraph contributes from its own text: one for being longer
/// than `min_paragraph_len` characters, plus one per comma.
pub fn paragraph_score(paragraph: &Element<'_>, config: &ScoreConfig) -> i64 {
    let text = paragraph.text();
    let length_bonus = i64::from(text.chars().count() > config.min_paragraph_len);
    let commas = text.matches(',').count() as i64;
    length_bonus + commas
}

/// A parent element and the score its paragraphs earned it
#[derive(Debug, Clone)]
pub struct ScoredParent<'a> {
    pub element: Element<'a>,
    pub score: i64,
}

/// Scores every paragraph parent in the document.
///
/// The returned table is in first-seen order, which is also the tie-break
/// order used by [`find_main_content`].
pub fn score_candidates<'a>(doc: &'a Document, config: &ScoreConfig) -> Vec<ScoredParent<'a>> {
    let paragraphs = doc.select("p").unwrap_or_default();

    let mut parents: Vec<Element<'a>> = Vec::new();
    let mut scores: Vec<i64> = Vec::new();
    let mut slots = HashMap::new();

    for paragraph in &paragraphs {
        let Some(parent) = paragraph.parent() else {
            continue;
        };

        let slot = *slots.entry(parent.as_element_ref().id()).or_insert_with(|| {
            parents.push(parent);
            scores.push(0);
            parents.len() - 1
        });

        scores[slot] += class_id_weight(&parent, config) + paragraph_score(paragraph, config);
    }

    parents
        .into_iter()
        .zip(scores)
        .map(|(element, score)| ScoredParent { element, score })
        .collect()
}

/// Picks the highest scoring entry, keeping the earliest one on ties.
fn pick_best<'t, 'a>(table: &'t [ScoredParent<'a>]) -> Option<&'t ScoredParent<'a>> {
    let mut best: Option<&ScoredParent<'a>> = None;
    for candidate in table {
        match best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// The element judged to hold the main content of a page.
///
/// This is an owned copy of the winning subtree with scripts, inline frames
/// and first/second level headings removed. The source document is left
/// untouched.
pub struct Container {
    document: Document,
    tag_name: String,
    score: i64,
}

impl Container {
    /// Copies `element` out of its document and strips the noisy tags.
    pub fn from_element(element: &Element<'_>, score: i64) -> Self {
        let mut document = Document::parse_fragment(&element.outer_html());
        if let Ok(removed) = document.remove(STRIPPED_SELECTOR) {
            debug!(removed, "stripped script/iframe/heading elements from container");
        }

        Self { document, tag_name: element.tag_name(), score }
    }

    /// Tag name of the winning element in the source document.
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Readability score the element won with.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Full text of the stripped container.
    pub fn text(&self) -> String {
        self.document.text_content()
    }

    /// Every `<img>` in the container, in document order.
    pub fn images(&self) -> Vec<Element<'_>> {
        self.document.select("img").unwrap_or_default()
    }

    /// Serialized HTML of the stripped container.
    pub fn html(&self) -> String {
        self.document.as_string()
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("tag_name", &self.tag_name)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

/// Finds the main content container of a document.
///
/// Returns `None` when the document has no paragraphs.
pub fn find_main_content(doc: &Document, config: &ScoreConfig) -> Option<Container> {
    let table = score_candidates(doc, config);
    let best = pick_best(&table)?;

    debug!(
        candidates = table.len(),
        tag = %best.element.tag_name(),
        class = best.element.attr("class").unwrap_or_default(),
        id = best.element.attr("id").unwrap_or_default(),
        score = best.score,
        "selected content container"
    );

    Some(Container::from_element(&best.element, best.score))
}
