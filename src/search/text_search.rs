//! Word-level search with highlight box merging.
//!
//! Matching happens in two passes. First each line whose text matches a
//! pattern is re-joined from its words, left to right, so a regex match can
//! be mapped back to the words it covers. Then the covered words of the whole
//! page are put in reading order and merged: a word that matches on its own
//! is a highlight, otherwise consecutive words are accumulated until their
//! joined text matches.

use std::cmp::Ordering;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::geometry::BoundingBox;
use crate::graph::BlockGraph;
use crate::model::{Block, BlockType};
use crate::utils::safe_float_cmp;

/// A rectangle to highlight, with the text it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HighlightBox {
    /// Covered text; words joined by single spaces
    pub text: String,
    /// Top edge
    pub top: f64,
    /// Left edge
    pub left: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl HighlightBox {
    /// Create a highlight box.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            top: bbox.top,
            left: bbox.left,
            width: bbox.width,
            height: bbox.height,
        }
    }

    fn from_word(word: &Block) -> Self {
        Self::new(word.text(), *word.bounding_box())
    }

    /// The rectangle without its text.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.top, self.left, self.width, self.height)
    }

    /// Append the next word of a run.
    fn extend(&self, next: &HighlightBox) -> HighlightBox {
        HighlightBox::new(
            format!("{} {}", self.text, next.text),
            self.bounding_box().extend_run(&next.bounding_box()),
        )
    }
}

fn matches_any(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

/// Join word texts with single spaces.
///
/// Returns the joined text and the byte offset where each word starts.
fn build_text_with_positions(words: &[&Block]) -> (String, Vec<usize>) {
    let mut text = String::new();
    let mut starts = Vec::with_capacity(words.len());

    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        starts.push(text.len());
        text.push_str(word.text());
    }

    (text, starts)
}

/// Word covering byte offset `idx` of the joined text.
///
/// The space after a word belongs to that word. Offsets past the end map to
/// the last word.
fn word_index_at(words: &[&Block], idx: usize) -> usize {
    let mut search_index = 0;
    for (i, word) in words.iter().enumerate() {
        let span = word.text().len() + 1;
        if idx < search_index + span {
            return i;
        }
        search_index += span;
    }
    words.len().saturating_sub(1)
}

/// Words of `line` covered by the first match of each pattern.
///
/// Each pattern contributes its own run, so a word covered by two patterns
/// appears twice.
fn line_matching_words<'a>(graph: &BlockGraph<'a>, line: &Block, patterns: &[Regex]) -> Vec<&'a Block> {
    let mut words: Vec<&'a Block> = graph
        .children(line)
        .into_iter()
        .filter(|b| b.block_type == BlockType::Word)
        .collect();
    if words.is_empty() {
        return Vec::new();
    }
    words.sort_by(|a, b| safe_float_cmp(a.bounding_box().left, b.bounding_box().left));

    let (word_text, _) = build_text_with_positions(&words);
    let mut matched: Vec<&'a Block> = Vec::new();

    for pattern in patterns {
        let Some(m) = pattern.find(&word_text) else {
            continue;
        };
        let start_word = word_index_at(&words, m.start());
        let end_word = word_index_at(&words, m.end());

        matched.extend_from_slice(&words[start_word..=end_word]);
    }

    matched
}

/// Reading-order comparison with a same-line tolerance on `top`.
///
/// Tops closer than `1 / quantization` of the page compare equal and fall
/// back to `left`. The tolerance makes this relation non-transitive.
fn compare_reading_position(a: &HighlightBox, b: &HighlightBox, quantization: f64) -> Ordering {
    let difference = ((a.top - b.top).abs() * quantization).floor();
    if difference == 0.0 {
        safe_float_cmp(a.left, b.left)
    } else {
        safe_float_cmp(a.top, b.top)
    }
}

/// Stable insertion sort by reading position.
///
/// `slice::sort_by` requires a total order and may panic without one.
fn sort_reading_order(boxes: &mut [HighlightBox], quantization: f64) {
    for i in 1..boxes.len() {
        let mut j = i;
        while j > 0 && compare_reading_position(&boxes[j - 1], &boxes[j], quantization) == Ordering::Greater {
            boxes.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Merge sorted word boxes into highlight boxes.
fn merge_runs(bounds: Vec<HighlightBox>, patterns: &[Regex]) -> Vec<HighlightBox> {
    let mut highlights = Vec::new();
    let mut unmatched: Option<HighlightBox> = None;

    for word in bounds {
        if matches_any(patterns, &word.text) {
            unmatched = None;
            highlights.push(word);
            continue;
        }

        match unmatched.take() {
            Some(run) => {
                let combined = run.extend(&word);
                if matches_any(patterns, &combined.text) {
                    highlights.push(combined);
                } else {
                    unmatched = Some(combined);
                }
            },
            None => unmatched = Some(word),
        }
    }

    highlights
}

/// Find the highlight boxes of `patterns` on a page.
///
/// An empty pattern list returns immediately. Lines are kept when any pattern
/// matches their text; within each, the words covered by each pattern's first
/// match are collected. Those words, across all matching lines, are sorted in
/// reading order and merged into the rectangles covering each occurrence.
pub fn match_words(graph: &BlockGraph<'_>, page_number: u32, patterns: &[Regex]) -> Vec<HighlightBox> {
    if patterns.is_empty() {
        return Vec::new();
    }

    let mut bounds: Vec<HighlightBox> = graph
        .children_by_type(page_number, BlockType::Line)
        .into_iter()
        .filter(|line| matches_any(patterns, line.text()))
        .flat_map(|line| line_matching_words(graph, line, patterns))
        .map(HighlightBox::from_word)
        .collect();

    sort_reading_order(&mut bounds, graph.config().line_quantization);
    let highlights = merge_runs(bounds, patterns);

    log::debug!(
        "Page {}: {} highlight(s) for {} pattern(s)",
        page_number,
        highlights.len(),
        patterns.len()
    );
    highlights
}

/// Highlight boxes of `patterns` on every page, paired with their page number.
pub fn match_document(graph: &BlockGraph<'_>, patterns: &[Regex]) -> Vec<(u32, Vec<HighlightBox>)> {
    graph
        .pages()
        .map(|page| (page, match_words(graph, page, patterns)))
        .filter(|(_, highlights)| !highlights.is_empty())
        .collect()
}
