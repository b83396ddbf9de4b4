//! End-to-end tests against a fake embeddings endpoint.
//!
//! The mock answers with a vector chosen by the request's `input`, so the
//! engine runs exactly as it would against the real API.

use std::path::Path;

use notesim_engine::{EngineConfig, EngineOutput, SimilarNotes, VaultEvent};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_embedding(server: &MockServer, input: &str, embedding: &[f32]) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({ "input": input })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "embedding": embedding, "index": 0 }],
            "model": "test-model"
        })))
        .mount(server)
        .await;
}

async fn mount_failure(server: &MockServer, input: &str) {
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({ "input": input })))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(server)
        .await;
}

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

fn engine_for(server: &MockServer, vault: &Path, api_key: &str) -> SimilarNotes {
    let config = EngineConfig::new(vault)
        .with_api_key(api_key)
        .with_base_url(server.uri())
        .with_model("test-model")
        .with_top_n(3);
    SimilarNotes::from_config(config)
}

#[tokio::test]
async fn test_rebuild_and_query_through_http() {
    let server = MockServer::start().await;
    mount_embedding(&server, "alpha", &[1.0, 0.0]).await;
    mount_embedding(&server, "beta", &[0.0, 1.0]).await;
    mount_embedding(&server, "gamma", &[1.0, 0.0]).await;
    mount_embedding(&server, "query", &[1.0, 0.0]).await;

    let vault = TempDir::new().unwrap();
    write(vault.path(), "A.md", "alpha");
    write(vault.path(), "B.md", "beta");
    write(vault.path(), "C.md", "gamma");

    let mut engine = engine_for(&server, vault.path(), "sk-test");
    assert_eq!(engine.rebuild().await.unwrap(), 3);

    let results = engine.query("query", 3).await;
    let ranked: Vec<_> = results.iter().map(|r| (r.id.as_str(), r.score)).collect();
    assert_eq!(ranked, vec![("A.md", 1.0), ("C.md", 1.0), ("B.md", 0.0)]);

    assert_eq!(engine.query("query", 2).await.len(), 2);
}

#[tokio::test]
async fn test_failed_embedding_leaves_note_unmatchable() {
    let server = MockServer::start().await;
    mount_embedding(&server, "alpha", &[1.0, 0.0]).await;
    mount_failure(&server, "broken").await;
    mount_embedding(&server, "query", &[1.0, 0.0]).await;

    let vault = TempDir::new().unwrap();
    write(vault.path(), "A.md", "alpha");
    write(vault.path(), "D.md", "broken");

    let mut engine = engine_for(&server, vault.path(), "sk-test");
    engine.rebuild().await.unwrap();

    assert_eq!(engine.stats().unavailable, 1);
    let results = engine.query("query", 10).await;
    let ranked: Vec<_> = results.iter().map(|r| (r.id.as_str(), r.score)).collect();
    assert_eq!(ranked, vec![("A.md", 1.0), ("D.md", 0.0)]);

    // Fixing the note re-embeds it on the next change event.
    write(vault.path(), "D.md", "alpha");
    let output = engine
        .handle_event(VaultEvent::modified(vault.path().join("D.md")))
        .await
        .unwrap();
    assert!(matches!(output, EngineOutput::Indexed { .. }));
    assert_eq!(engine.stats().unavailable, 0);
}

#[tokio::test]
async fn test_missing_api_key_indexes_without_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let vault = TempDir::new().unwrap();
    write(vault.path(), "A.md", "alpha");
    write(vault.path(), "B.md", "beta");

    let mut engine = engine_for(&server, vault.path(), "");
    assert_eq!(engine.rebuild().await.unwrap(), 2);
    assert_eq!(engine.stats().unavailable, 2);

    let results = engine.query("anything", 5).await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.score == 0.0));
}
