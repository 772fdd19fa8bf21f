//! Search state with change notification.
//!
//! A viewer keeps one [`SearchSession`] per open page. Refreshing it re-runs
//! the matcher and tells every registered listener when the highlights
//! changed, including when they were cleared.

use std::fmt;

use regex::Regex;

use super::text_search::{match_words, HighlightBox};
use crate::graph::BlockGraph;

type Listener = Box<dyn FnMut(&[HighlightBox])>;

/// Current highlights of a page and the listeners to notify on change.
#[derive(Default)]
pub struct SearchSession {
    highlights: Vec<HighlightBox>,
    listeners: Vec<Listener>,
}

impl SearchSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked with the new highlights on every change.
    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&[HighlightBox]) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Current highlights.
    pub fn highlights(&self) -> &[HighlightBox] {
        &self.highlights
    }

    /// Re-run the matcher for `page_number`.
    ///
    /// Listeners are called only when the result differs from the current
    /// highlights. Returns whether it did.
    pub fn refresh(&mut self, graph: &BlockGraph<'_>, page_number: u32, patterns: &[Regex]) -> bool {
        let highlights = match_words(graph, page_number, patterns);
        self.replace(highlights)
    }

    /// Clear all highlights, notifying listeners if there were any.
    pub fn reset(&mut self) -> bool {
        self.replace(Vec::new())
    }

    fn replace(&mut self, highlights: Vec<HighlightBox>) -> bool {
        if highlights == self.highlights {
            return false;
        }
        self.highlights = highlights;
        log::trace!(
            "Search highlights changed ({}), notifying {} listener(s)",
            self.highlights.len(),
            self.listeners.len()
        );
        for listener in &mut self.listeners {
            listener(&self.highlights);
        }
        true
    }
}

impl fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchSession")
            .field("highlights", &self.highlights)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
