//! Integration tests for document loading, the block index and its cache.

use std::sync::Arc;

use blockview::config::EngineConfig;
use blockview::graph::BlockGraph;
use blockview::index::{IndexCache, SnapshotKey};
use blockview::model::{BlockType, Document};
use blockview::views::{document_key_value_pairs, document_lines, page_lines, page_tables};
use blockview::Error;

fn fixture_json(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).expect("fixture readable")
}

fn load_fixture(name: &str) -> Document {
    Document::from_json(&fixture_json(name)).expect("fixture parses")
}

// =============================================================================
// LOADING
// =============================================================================

mod loading_tests {
    use super::*;

    #[test]
    fn test_from_reader_matches_from_json() {
        let json = fixture_json("invoice.json");
        let from_str = Document::from_json(&json).unwrap();
        let from_reader = Document::from_reader(json.as_bytes()).unwrap();
        assert_eq!(from_str, from_reader);
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixture_json("multipage.json").as_bytes()).unwrap();

        let reader = std::io::BufReader::new(std::fs::File::open(file.path()).unwrap());
        let doc = Document::from_reader(reader).unwrap();
        assert_eq!(doc.id, "doc-clinic");
        assert!(doc.comprehend_pii_response.is_some());
    }

    #[test]
    fn test_missing_blocks_is_malformed() {
        let json = r#"{"id": "d", "textractResponse": {"DocumentMetadata": {"Pages": 1}}}"#;
        assert!(matches!(Document::from_json(json), Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_missing_page_metadata_is_malformed() {
        let json = r#"{"id": "d", "textractResponse": {"Blocks": [
            {"BlockType": "PAGE", "Id": "p", "Relationships": [{"Type": "CHILD", "Ids": ["l"]}],
             "Geometry": {"BoundingBox": {"Top": 0, "Left": 0, "Width": 1, "Height": 1}}},
            {"BlockType": "LINE", "Id": "l", "Text": "Hello World",
             "Relationships": [{"Type": "CHILD", "Ids": ["w1", "w2"]}],
             "Geometry": {"BoundingBox": {"Top": 0.1, "Left": 0.1, "Width": 0.3, "Height": 0.02}}},
            {"BlockType": "WORD", "Id": "w1", "Text": "Hello",
             "Geometry": {"BoundingBox": {"Top": 0.1, "Left": 0.1, "Width": 0.1, "Height": 0.02}}},
            {"BlockType": "WORD", "Id": "w2", "Text": "World",
             "Geometry": {"BoundingBox": {"Top": 0.1, "Left": 0.25, "Width": 0.1, "Height": 0.02}}}
        ]}}"#;
        match Document::from_json(json) {
            Err(Error::MalformedDocument(msg)) => assert!(msg.contains("DocumentMetadata"), "{}", msg),
            other => panic!("expected a malformed document, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_json_is_a_json_error() {
        assert!(matches!(Document::from_json(r#"{"id": "d""#), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_analysis_fails_fast() {
        let doc = Document::from_json(r#"{"id": "pending"}"#).unwrap();
        let err = BlockGraph::build(&doc).unwrap_err();
        assert!(matches!(err, Error::MissingAnalysis { ref document_id } if document_id == "pending"));

        let mut cache = IndexCache::new();
        assert!(BlockGraph::new(&doc, &mut cache).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_unsupported_blocks_are_indexed() {
        let doc = load_fixture("invoice.json");
        let graph = BlockGraph::build(&doc).unwrap();

        let merged = graph.block("merged-1").unwrap();
        assert_eq!(merged.block_type, BlockType::Unsupported);
        assert_eq!(graph.blocks_of_type(BlockType::Unsupported).count(), 1);
    }
}

// =============================================================================
// CHUNKED DOCUMENTS
// =============================================================================

mod chunked_tests {
    use super::*;

    #[test]
    fn test_numeric_version_stamp() {
        let doc = load_fixture("chunked.json");
        assert_eq!(doc.fetched_at, "1700000000");
        assert_eq!(SnapshotKey::of(&doc), SnapshotKey::new("doc-chunked", "1700000000"));
    }

    #[test]
    fn test_page_count_from_first_chunk() {
        let doc = load_fixture("chunked.json");
        let graph = BlockGraph::build(&doc).unwrap();

        assert!(graph.index().is_chunked());
        assert_eq!(graph.page_count(), 1);
        assert_eq!(graph.index().max_page(), Some(2));

        let lines = document_lines(&graph);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "First chunk");
    }

    #[test]
    fn test_later_chunks_are_reachable() {
        let doc = load_fixture("chunked.json");
        let graph = BlockGraph::build(&doc).unwrap();

        let lines = page_lines(&graph, 2);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Second chunk");
        assert_eq!(graph.block("c1-w2").unwrap().text(), "chunk");
    }
}

// =============================================================================
// CACHE
// =============================================================================

mod cache_tests {
    use super::*;

    #[test]
    fn test_cache_hit_shares_index() {
        let doc = load_fixture("invoice.json");
        let mut cache = IndexCache::new();

        let first = BlockGraph::new(&doc, &mut cache).unwrap();
        let second = BlockGraph::new(&doc, &mut cache).unwrap();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(first.index().len(), second.index().len());
    }

    #[test]
    fn test_views_identical_across_cache_hits() {
        let doc = load_fixture("invoice.json");
        let mut cache = IndexCache::new();

        let cold = BlockGraph::new(&doc, &mut cache).unwrap();
        let warm = BlockGraph::new(&doc, &mut cache).unwrap();
        let fresh = BlockGraph::build(&doc).unwrap();

        assert_eq!(document_key_value_pairs(&cold), document_key_value_pairs(&warm));
        assert_eq!(page_tables(&warm, 1), page_tables(&fresh, 1));
        assert_eq!(document_lines(&cold), document_lines(&fresh));
    }

    #[test]
    fn test_refetch_replaces_snapshot() {
        let mut doc = load_fixture("invoice.json");
        let mut cache = IndexCache::new();
        let old = cache.get_or_build(&doc).unwrap();

        doc.fetched_at = "2020-06-02T10:00:00.000Z".to_string();
        let new = cache.get_or_build(&doc).unwrap();

        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&SnapshotKey::of(&doc)));
        assert_eq!(cache.invalidate("doc-invoice"), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_from_config() {
        let mut cache = IndexCache::with_config(EngineConfig::new().with_index_cache_capacity(2));
        for name in ["invoice.json", "multipage.json", "chunked.json"] {
            let doc = load_fixture(name);
            BlockGraph::new(&doc, &mut cache).unwrap();
        }

        assert_eq!(cache.len(), 2);
        assert!(!cache.contains(&SnapshotKey::new("doc-invoice", "2020-06-01T10:00:00.000Z")));
    }

    #[test]
    fn test_graph_outlives_eviction() {
        let invoice = load_fixture("invoice.json");
        let clinic = load_fixture("multipage.json");
        let mut cache = IndexCache::with_config(EngineConfig::new().with_index_cache_capacity(1));

        let graph = BlockGraph::new(&invoice, &mut cache).unwrap();
        BlockGraph::new(&clinic, &mut cache).unwrap();

        assert!(!cache.contains(&SnapshotKey::of(&invoice)));
        assert_eq!(page_lines(&graph, 1)[0].text, "Hello World");
    }
}
