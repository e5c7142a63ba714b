use std::net::TcpListener;
use std::time::Duration;

use veritas_core::config::EmbeddingSettings;
use veritas_core::traits::Embedder;
use veritas_embed::ollama::{EmbedRequest, EmbedResponse};
use veritas_embed::{get_default_embedder, HashEmbedder, OllamaEmbedder};

fn cosine(a: &[f32], b: &[f32]) -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() }

#[test]
fn hash_embedder_shapes_and_determinism() {
    std::env::set_var("VERITAS_USE_FAKE_EMBEDDINGS", "1");

    let embedder = get_default_embedder(&EmbeddingSettings::default()).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 1024, "embedding dim is 1024");

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }

    let q = embedder.embed_query("hello world").expect("embed_query");
    assert_eq!(&q, v1, "query and document embeddings agree");
}

#[test]
fn hash_embedder_ranks_shared_vocabulary_higher() {
    let embedder = HashEmbedder::new(1024);
    let q = embedder.embed_text("How many vacation days?");
    let vacation = embedder.embed_text("Employees get 15 vacation days");
    let remote = embedder.embed_text("Remote work requires manager approval");
    let expenses = embedder.embed_text("Expense reports due within 30 days");
    assert!(cosine(&q, &vacation) > cosine(&q, &expenses));
    assert!(cosine(&q, &expenses) > cosine(&q, &remote));
    assert!(cosine(&q, &vacation) < 0.99);
}

#[test]
fn hash_embedder_is_case_and_punctuation_insensitive() {
    let embedder = HashEmbedder::new(64);
    assert_eq!(embedder.embed_text("Vacation, DAYS!"), embedder.embed_text("vacation days"));
    assert!(embedder.embed_text("").iter().all(|x| *x == 0.0));
}

#[test]
fn embed_request_and_response_wire_format() {
    let input = vec!["a".to_string(), "b".to_string()];
    let body = serde_json::to_value(EmbedRequest { model: "nomic-embed-text", input: &input }).expect("serialize");
    assert_eq!(body, serde_json::json!({"model": "nomic-embed-text", "input": ["a", "b"]}));

    let parsed: EmbedResponse = serde_json::from_str(r#"{"model":"nomic-embed-text","embeddings":[[0.1,0.2],[0.3,0.4]]}"#).expect("parse");
    assert_eq!(parsed.embeddings, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
}

#[test]
fn ollama_embedder_deadline_expires() {
    // accepts the connection but never answers
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}", listener.local_addr().expect("addr"));
    let embedder = OllamaEmbedder::new(&url, "nomic-embed-text", Some(Duration::from_millis(200))).expect("client");
    assert_eq!(embedder.endpoint(), format!("{url}/api/embed"));

    let err = embedder.embed_batch(&["hello".to_string()]).unwrap_err();
    assert!(format!("{err:#}").contains("deadline"), "unexpected error: {err:#}");
    drop(listener);
}

#[test]
fn ollama_embedder_unreachable_server_fails() {
    let port = TcpListener::bind("127.0.0.1:0").expect("bind").local_addr().expect("addr").port();
    let embedder = OllamaEmbedder::new(&format!("http://127.0.0.1:{port}/"), "nomic-embed-text", Some(Duration::from_secs(5))).expect("client");
    assert!(embedder.embed_query("hello").is_err());
    assert!(embedder.embed_batch(&[]).expect("empty batch").is_empty());
}
