//! Integration tests for word-level search and highlight merging.

use blockview::geometry::BoundingBox;
use blockview::graph::BlockGraph;
use blockview::model::{
    AnalysisPayload, AnalysisResponse, Block, BlockType, Document, NlpService, RelationshipType,
};
use blockview::search::{
    build_pattern, literal_patterns, match_document, match_words, query_patterns, ExclusionItem,
    ExclusionList, SearchOptions, SearchSession,
};
use blockview::views::page_entity_groups;
use regex::Regex;

const EPSILON: f64 = 1e-9;

fn load_fixture(name: &str) -> Document {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    let json = std::fs::read_to_string(&path).expect("fixture readable");
    Document::from_json(&json).expect("fixture parses")
}

/// One page with the line "Hello World".
fn hello_world() -> Document {
    let page = Block::new("page", BlockType::Page, BoundingBox::new(0.0, 0.0, 1.0, 1.0))
        .with_relationship(RelationshipType::Child, ["line"]);
    let line = Block::new("line", BlockType::Line, BoundingBox::new(0.10, 0.10, 0.11, 0.02))
        .with_text("Hello World")
        .with_relationship(RelationshipType::Child, ["world", "hello"]);
    let hello = Block::new("hello", BlockType::Word, BoundingBox::new(0.10, 0.10, 0.05, 0.02)).with_text("Hello");
    let world = Block::new("world", BlockType::Word, BoundingBox::new(0.10, 0.16, 0.05, 0.02)).with_text("World");

    Document::new(
        "hello",
        "v1",
        AnalysisPayload::Single(AnalysisResponse::new(vec![page, line, hello, world], 1)),
    )
}

fn case_insensitive(pattern: &str) -> Regex {
    build_pattern(pattern, &SearchOptions::case_insensitive()).unwrap()
}

fn assert_box(actual: &BoundingBox, expected: &BoundingBox) {
    assert!((actual.top - expected.top).abs() < EPSILON, "{:?} != {:?}", actual, expected);
    assert!((actual.left - expected.left).abs() < EPSILON, "{:?} != {:?}", actual, expected);
    assert!((actual.width - expected.width).abs() < EPSILON, "{:?} != {:?}", actual, expected);
    assert!((actual.height - expected.height).abs() < EPSILON, "{:?} != {:?}", actual, expected);
}

// =============================================================================
// MATCHER
// =============================================================================

mod matcher_tests {
    use super::*;

    #[test]
    fn test_single_word_match() {
        let doc = hello_world();
        let graph = BlockGraph::build(&doc).unwrap();
        let boxes = match_words(&graph, 1, &[case_insensitive("World")]);

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].text, "World");
        assert_box(&boxes[0].bounding_box(), &BoundingBox::new(0.10, 0.16, 0.05, 0.02));
    }

    #[test]
    fn test_phrase_merges_words() {
        let doc = hello_world();
        let graph = BlockGraph::build(&doc).unwrap();
        let boxes = match_words(&graph, 1, &[case_insensitive("Hello World")]);

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].text, "Hello World");
        assert_box(&boxes[0].bounding_box(), &BoundingBox::new(0.10, 0.10, 0.11, 0.02));
    }

    #[test]
    fn test_no_patterns_no_boxes() {
        let doc = hello_world();
        let graph = BlockGraph::build(&doc).unwrap();
        assert!(match_words(&graph, 1, &[]).is_empty());
        assert!(match_document(&graph, &[]).is_empty());
    }

    #[test]
    fn test_no_match() {
        let doc = hello_world();
        let graph = BlockGraph::build(&doc).unwrap();
        assert!(match_words(&graph, 1, &[case_insensitive("goodbye")]).is_empty());
        assert!(match_words(&graph, 7, &[case_insensitive("hello")]).is_empty());
    }

    #[test]
    fn test_query_across_fixture_lines() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();

        let boxes = match_words(&graph, 1, &query_patterns("john smith").unwrap());
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].text, "John Smith");
        assert_box(&boxes[0].bounding_box(), &BoundingBox::new(0.10, 0.30, 0.14, 0.02));

        let boxes = match_words(&graph, 1, &query_patterns("$5.00").unwrap());
        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].text, "$5.00");
    }

    #[test]
    fn test_partial_word_highlights_whole_word() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();
        let boxes = match_words(&graph, 1, &query_patterns("birt").unwrap());

        assert_eq!(boxes.len(), 1);
        assert_eq!(boxes[0].text, "Birth");
    }

    #[test]
    fn test_entity_values_in_reading_order() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();

        let groups = page_entity_groups(&graph, 1, NlpService::ComprehendMedical);
        let patterns = literal_patterns(&groups[0].value).unwrap();
        let texts: Vec<String> = match_words(&graph, 1, &patterns).into_iter().map(|b| b.text).collect();

        assert_eq!(texts, ["John Smith", "01/02/1980"]);
    }

    #[test]
    fn test_match_document_pages() {
        let doc = load_fixture("multipage.json");
        let graph = BlockGraph::build(&doc).unwrap();
        let hits = match_document(&graph, &query_patterns("jane doe").unwrap());

        let pages: Vec<u32> = hits.iter().map(|(page, _)| *page).collect();
        assert_eq!(pages, [1, 2]);
        assert!(hits.iter().all(|(_, boxes)| boxes.len() == 1 && boxes[0].text == "Jane Doe"));
    }

    #[test]
    fn test_highlights_stay_on_page() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();
        let patterns = [case_insensitive(r"\w+")];

        for highlight in match_words(&graph, 1, &patterns) {
            assert!(highlight.bounding_box().is_normalized(), "{:?}", highlight);
        }
    }
}

// =============================================================================
// EXCLUSION LISTS
// =============================================================================

mod exclusion_tests {
    use super::*;

    #[test]
    fn test_exclusion_list_matches() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();
        let list = ExclusionList {
            name: "PII".to_string(),
            items: vec![ExclusionItem::regex(r"\d{2}/\d{2}/\d{4}"), ExclusionItem::string("WIDGET")],
        };

        let texts: Vec<String> = match_words(&graph, 1, &list.patterns().unwrap())
            .into_iter()
            .map(|b| b.text)
            .collect();
        assert_eq!(texts, ["01/02/1980", "Widget"]);
    }
}

// =============================================================================
// SESSION
// =============================================================================

mod session_tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_session_notifies_host_on_change() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();
        let notified = Rc::new(Cell::new(0));

        let mut session = SearchSession::new();
        let counter = Rc::clone(&notified);
        session.on_change(move |_| counter.set(counter.get() + 1));

        assert!(session.refresh(&graph, 1, &query_patterns("hello").unwrap()));
        assert!(session.refresh(&graph, 1, &query_patterns("world").unwrap()));
        assert!(!session.refresh(&graph, 1, &query_patterns("WORLD").unwrap()));
        assert!(session.refresh(&graph, 1, &query_patterns("").unwrap()));
        assert_eq!(notified.get(), 3);
        assert!(session.highlights().is_empty());
    }
}
