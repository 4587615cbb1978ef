//! End-to-end session tests against a mocked extraction backend.

use std::sync::Arc;
use std::time::Duration;

use doculens::backend::HttpBackend;
use doculens::config::Config;
use doculens::session::{
    ArtifactKind, AskOutcome, ChatSession, DocumentSource, DocumentStatus, IngestionSession,
    TempFilePreview, TurnRole,
};
use httpmock::{Method::POST, MockServer};
use serde_json::json;

fn backend_for(server: &MockServer) -> Arc<HttpBackend> {
    let config = Config {
        backend_url: server.base_url(),
        request_timeout: None,
    };
    Arc::new(HttpBackend::new(&config).expect("backend client"))
}

fn ingestion_session(server: &MockServer) -> IngestionSession {
    IngestionSession::new(backend_for(server), Box::new(TempFilePreview))
}

fn pdf(name: &str) -> DocumentSource {
    DocumentSource {
        file_name: name.into(),
        bytes: b"%PDF-1.7 fake document".to_vec(),
    }
}

#[tokio::test]
async fn submitted_document_reaches_ready_with_one_table_artifact() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(json!({
                "csvs": [["u1", "u2", "d1"]],
                "images": []
            }));
        })
        .await;

    let session = ingestion_session(&server);
    let id = session.submit(pdf("report.pdf")).await;
    mock.assert();

    let doc = session.document(id).expect("document present");
    assert_eq!(doc.status, DocumentStatus::Ready);
    assert_eq!(doc.artifacts.len(), 1);
    assert_eq!(doc.artifacts[0].kind, ArtifactKind::Table);
    assert_eq!(doc.artifacts[0].data_url.as_deref(), Some("u1"));
    assert_eq!(doc.artifacts[0].render_url.as_deref(), Some("u2"));
    assert_eq!(doc.artifacts[0].description, "d1");
    assert!(
        !doc.artifacts
            .iter()
            .any(|artifact| artifact.kind == ArtifactKind::Chart)
    );

    let preview = doc.preview_path.expect("preview derived");
    assert!(preview.exists());
    session.discard(id);
    assert!(!preview.exists());
}

#[tokio::test]
async fn backend_failure_marks_document_failed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(502).body("bad gateway");
        })
        .await;

    let session = ingestion_session(&server);
    let id = session.submit(pdf("report.pdf")).await;

    let doc = session.document(id).expect("document present");
    assert_eq!(doc.status, DocumentStatus::Failed);
    assert!(doc.artifacts.is_empty());
    let failure = doc.failure.expect("failure reason");
    assert!(failure.contains("502"), "reason was: {failure}");
}

#[tokio::test]
async fn malformed_tuple_on_the_wire_fails_the_document() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200).json_body(json!({
                "csvs": [["only", "two"]],
                "images": [["u1", "u2", "d1"]]
            }));
        })
        .await;

    let session = ingestion_session(&server);
    let id = session.submit(pdf("report.pdf")).await;

    let doc = session.document(id).expect("document present");
    assert_eq!(doc.status, DocumentStatus::Failed);
    // All-or-nothing: the valid images entry must not leak through.
    assert!(doc.artifacts.is_empty());
}

#[tokio::test]
async fn discard_during_upload_wins_over_the_late_result() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200)
                .delay(Duration::from_millis(200))
                .json_body(json!({ "csvs": [["u1", "u2", "d1"]], "images": [] }));
        })
        .await;

    let session = Arc::new(ingestion_session(&server));
    let submit = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.submit(pdf("report.pdf")).await }
    });

    let id = loop {
        let docs = session.documents();
        if let Some(doc) = docs.first() {
            if doc.status == DocumentStatus::Uploading {
                break doc.id;
            }
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    };

    assert!(session.discard(id));
    let returned = submit.await.expect("submit task");
    assert_eq!(returned, id);
    assert!(session.documents().is_empty());
}

#[tokio::test]
async fn batch_upload_distributes_payloads_in_request_order() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload-multiple");
            then.status(200).json_body(json!({
                "documents": [
                    { "csvs": [["a1", "a2", "first"]], "images": [] },
                    { "csvs": [], "images": [["b1", "b2", "second"]] }
                ]
            }));
        })
        .await;

    let session = ingestion_session(&server);
    let ids = session.submit_batch(vec![pdf("a.pdf"), pdf("b.pdf")]).await;
    mock.assert();
    assert_eq!(ids.len(), 2);

    let first = session.document(ids[0]).expect("first document");
    assert_eq!(first.status, DocumentStatus::Ready);
    assert_eq!(first.artifacts[0].kind, ArtifactKind::Table);
    assert_eq!(first.artifacts[0].description, "first");

    let second = session.document(ids[1]).expect("second document");
    assert_eq!(second.status, DocumentStatus::Ready);
    assert_eq!(second.artifacts[0].kind, ArtifactKind::Chart);
    assert_eq!(second.artifacts[0].description, "second");
}

#[tokio::test]
async fn chat_round_trip_appends_both_turns() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ask")
                .json_body(json!({ "question": "What is the total revenue?" }));
            then.status(200)
                .json_body(json!({ "answer": "About 4.2 million." }));
        })
        .await;

    let session = ChatSession::new(backend_for(&server));
    let outcome = session.ask("What is the total revenue?").await;
    mock.assert();
    assert_eq!(outcome, AskOutcome::Answered);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, TurnRole::User);
    assert_eq!(transcript[0].text, "What is the total revenue?");
    assert_eq!(transcript[1].role, TurnRole::Assistant);
    assert_eq!(transcript[1].text, "About 4.2 million.");
}

#[tokio::test]
async fn chat_backend_error_preserves_the_question_in_the_transcript() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/ask");
            then.status(500).body("retrieval index unavailable");
        })
        .await;

    let session = ChatSession::new(backend_for(&server));
    let outcome = session.ask("What is the total revenue?").await;
    assert_eq!(outcome, AskOutcome::Failed);

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].role, TurnRole::User);
    assert_eq!(transcript[0].text, "What is the total revenue?");
    assert_eq!(transcript[1].role, TurnRole::Assistant);
    assert!(
        transcript[1].text.contains("could not answer"),
        "error turn was: {}",
        transcript[1].text
    );
}

#[tokio::test]
async fn blank_question_issues_no_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/ask");
            then.status(200).json_body(json!({ "answer": "unused" }));
        })
        .await;

    let session = ChatSession::new(backend_for(&server));
    assert_eq!(session.ask("   ").await, AskOutcome::RejectedEmpty);
    assert!(session.transcript().is_empty());
    mock.assert_hits(0);
}
