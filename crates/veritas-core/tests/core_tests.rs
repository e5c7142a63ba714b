use std::fs;
use tempfile::TempDir;

use veritas_core::chunker::{split, Chunker, ChunkingConfig};
use veritas_core::source::FileSource;
use veritas_core::traits::DocumentSource;
use veritas_core::types::{Document, QueryConfig, SearchStrategy, SearchType};
use veritas_core::Error;

fn chars(s: &str) -> Vec<char> { s.chars().collect() }

fn char_range(chunk: &veritas_core::types::DocumentChunk) -> (usize, usize) {
    (chunk.metadata["start_char"].parse().unwrap(), chunk.metadata["end_char"].parse().unwrap())
}

#[test]
fn split_covers_text_with_exact_overlap() {
    let text = "Employees accrue vacation monthly. Unused days roll over up to a cap. Requests go through the HR portal.";
    for (size, overlap) in [(10, 0), (10, 3), (7, 6), (200, 20), (1, 0)] {
        let chunks = split(text, size, overlap).expect("split");
        let all = chars(text);
        assert!(!chunks.is_empty());
        let (first_start, _) = char_range(&chunks[0]);
        let (_, last_end) = char_range(chunks.last().unwrap());
        assert_eq!(first_start, 0, "size={size} overlap={overlap}");
        assert_eq!(last_end, all.len(), "size={size} overlap={overlap}");
        for pair in chunks.windows(2) {
            let (a_start, a_end) = char_range(&pair[0]);
            let (b_start, _) = char_range(&pair[1]);
            assert_eq!(a_end - a_start, size, "non-final windows are full");
            assert_eq!(a_end - b_start, overlap, "consecutive windows share exactly the overlap");
            let a = chars(&pair[0].content);
            let b = chars(&pair[1].content);
            assert_eq!(&a[a.len() - overlap..], &b[..overlap]);
        }
        for c in &chunks {
            let (s, e) = char_range(c);
            assert_eq!(c.content, all[s..e].iter().collect::<String>());
        }
    }
}

#[test]
fn split_handles_multibyte_text() {
    let text = "Política de férias: 15 dias úteis — aprovação do gestor.";
    let chunks = split(text, 8, 2).expect("split");
    let rebuilt: String = chunks
        .iter()
        .enumerate()
        .map(|(i, c)| if i == 0 { c.content.clone() } else { c.content.chars().skip(2).collect() })
        .collect();
    assert_eq!(rebuilt, text);
}

#[test]
fn split_short_and_empty_text() {
    let chunks = split("Short text", 200, 20).expect("split");
    assert_eq!(chunks.len(), 1, "text shorter than a window becomes one chunk");
    assert_eq!(chunks[0].content, "Short text");
    assert!(split("", 200, 20).expect("split").is_empty());
}

#[test]
fn split_rejects_bad_window_parameters() {
    assert!(matches!(split("abc", 0, 0), Err(Error::Config(_))));
    assert!(matches!(split("abc", 10, 10), Err(Error::Config(_))));
    assert!(matches!(split("abc", 10, 12), Err(Error::Config(_))));
    assert!(matches!(ChunkingConfig::new(5, 4), Ok(_)));
}

#[test]
fn split_is_deterministic_and_labels_chunks() {
    let chunker = Chunker::new(ChunkingConfig::new(12, 4).unwrap()).unwrap();
    let doc = Document { doc_id: "policies".into(), source: "/tmp/policies.txt".into(), text: "Remote work requires manager approval in writing.".into() };
    let a = chunker.split_document(&doc);
    let b = chunker.split_document(&doc);
    assert_eq!(a, b);
    let total = a.len().to_string();
    for (i, c) in a.iter().enumerate() {
        assert_eq!(c.id, format!("policies:{i}"));
        assert_eq!(c.metadata["source"], "/tmp/policies.txt");
        assert_eq!(c.metadata["chunk_index"], i.to_string());
        assert_eq!(c.metadata["total_chunks"], total);
    }
}

#[test]
fn file_source_reads_single_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("companypolicies.txt");
    fs::write(&path, "Employees get 15 vacation days").unwrap();

    let docs = FileSource::new().read(path.to_str().unwrap()).expect("read");
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].doc_id, "companypolicies");
    assert_eq!(docs[0].text, "Employees get 15 vacation days");
}

#[test]
fn file_source_walks_txt_files_in_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir_all(dir.join("hr")).unwrap();
    fs::write(dir.join("b.txt"), "bravo").unwrap();
    fs::write(dir.join("hr/a.txt"), "alpha").unwrap();
    fs::write(dir.join("notes.md"), "ignored").unwrap();
    fs::write(dir.join("latin1.txt"), [0x63, 0x61, 0x66, 0xe9]).unwrap();

    let source = FileSource::with_base_dir(dir);
    let docs = source.read(".").expect("read dir");
    let ids: Vec<&str> = docs.iter().map(|d| d.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "latin1"]);
    assert!(docs[2].text.starts_with("caf"), "invalid utf-8 decoded lossily");
}

#[test]
fn file_source_missing_path_fails() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.txt");
    assert!(FileSource::new().read(missing.to_str().unwrap()).is_err());
    let empty = tmp.path().join("empty");
    fs::create_dir_all(&empty).unwrap();
    assert!(FileSource::new().read(empty.to_str().unwrap()).is_err());
}

#[test]
fn query_config_validation() {
    assert!(matches!(QueryConfig::similarity(0, None), Err(Error::InvalidParameter(_))));
    assert!(matches!(QueryConfig::similarity(4, Some(1.5)), Err(Error::InvalidParameter(_))));
    assert!(matches!(QueryConfig::similarity(4, Some(f32::NAN)), Err(Error::InvalidParameter(_))));
    assert!(matches!(QueryConfig::mmr(5, 4, 0.5), Err(Error::InvalidParameter(_))));
    assert!(matches!(QueryConfig::mmr(4, 20, -0.1), Err(Error::InvalidParameter(_))));

    let cfg = QueryConfig::mmr(4, 20, 0.25).unwrap();
    assert_eq!(cfg.search_type(), SearchType::Mmr);
    assert_eq!(cfg.strategy(), SearchStrategy::Mmr { fetch_k: 20, lambda_mult: 0.25 });
    let params = cfg.parameters();
    assert_eq!((params.k, params.fetch_k, params.score_threshold), (4, Some(20), None));

    let default = QueryConfig::default();
    assert_eq!((default.k(), default.search_type()), (4, SearchType::Similarity));
}

#[test]
fn query_config_serializes_but_only_constructors_build_it() {
    let cfg = QueryConfig::mmr(4, 20, 0.25).unwrap();
    let json = serde_json::to_value(cfg).expect("serialize");
    assert_eq!(json, serde_json::json!({"k": 4, "strategy": {"search_type": "mmr", "fetch_k": 20, "lambda_mult": 0.25}}));

    // an unvalidated shape can only come in as parameters to a constructor
    assert!(matches!(QueryConfig::from_parts(SearchType::Mmr, 4, None, 2, 0.25), Err(Error::InvalidParameter(_))));
}

#[test]
fn search_type_parsing() {
    assert_eq!("similarity".parse::<SearchType>().unwrap(), SearchType::Similarity);
    assert_eq!(" MMR ".parse::<SearchType>().unwrap(), SearchType::Mmr);
    match "similarity_score_threshold".parse::<SearchType>() {
        Err(Error::UnsupportedSearchType(name)) => assert_eq!(name, "similarity_score_threshold"),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(SearchType::ALL.map(|t| t.to_string()), ["similarity", "mmr"]);
}
