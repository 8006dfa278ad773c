//! End-to-end pipeline scenarios against a scripted provider.

use crate::rag::fallback::context_fallback;
use crate::rag::generate::{GenerationClient, GenerationSettings};
use crate::rag::intake::AskRequest;
use crate::rag::orchestrator::Orchestrator;
use crate::rag::quota::SharedQuota;
use crate::rag::search::{KeywordRetriever, Retriever};
use crate::rag::types::{AnswerPayload, AnswerSource, Context, ResponseStatus, MAX_ANSWER_CHARS};
use crate::rag::validate::validate;
use crate::rag::VirtualTa;
use crate::store::ContentStore;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use vta_core::QuotaReset;
use vta_llm::{MockClient, MockReply};
use vta_prompt::default_answer_prompt;

fn pipeline(mock: Arc<MockClient>, daily_limit: u32, min_delay: Duration) -> VirtualTa {
    let settings = GenerationSettings {
        retry_backoff: Duration::from_millis(5),
        ..GenerationSettings::new("mock")
    };
    VirtualTa::with_generator(
        Arc::new(ContentStore::builtin()),
        Some(GenerationClient::new(mock, default_answer_prompt(), settings)),
        SharedQuota::new(daily_limit, min_delay, QuotaReset::Lifetime),
    )
}

fn offline_pipeline() -> VirtualTa {
    VirtualTa::with_generator(
        Arc::new(ContentStore::builtin()),
        None,
        SharedQuota::new(50, Duration::ZERO, QuotaReset::Lifetime),
    )
}

fn expected_context_fallback(question: &str) -> AnswerPayload {
    let context =
        KeywordRetriever::new(Arc::new(ContentStore::builtin())).score_and_select(question);
    context_fallback(question, &context)
}

fn assert_contract(payload: &AnswerPayload) {
    let len = payload.answer.chars().count();
    assert!(len >= 1 && len <= MAX_ANSWER_CHARS, "answer length {}", len);
    assert!(!payload.links.is_empty());
    for link in &payload.links {
        assert!(link.url.starts_with("http"), "bad url {}", link.url);
        assert!(!link.text.is_empty());
    }
}

#[tokio::test]
async fn test_python_setup_without_generation() {
    let response = offline_pipeline()
        .ask(&AskRequest::new("How do I set up my Python virtual environment?"))
        .await;

    assert_eq!(response.status, ResponseStatus::Ok);
    assert!(response.payload.answer.contains("python -m venv tds_env"));
    assert!(response.payload.links[0]
        .url
        .starts_with("https://discourse.onlinedegree.iitm.ac.in/"));
}

#[tokio::test]
async fn test_empty_question_rejected_without_calls() {
    let mock = Arc::new(MockClient::new());
    let ta = pipeline(mock.clone(), 50, Duration::ZERO);

    let response = ta.handle_json(r#"{"question": ""}"#).await;

    assert_eq!(response.status, ResponseStatus::ClientError);
    assert_eq!(
        response.payload.answer,
        "Please provide a question for the TDS Virtual TA."
    );
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_long_question_rejected_without_calls() {
    let mock = Arc::new(MockClient::new());
    let ta = pipeline(mock.clone(), 50, Duration::ZERO);

    let body = json!({ "question": "a".repeat(1001) }).to_string();
    let response = ta.handle_json(&body).await;

    assert_eq!(response.status, ResponseStatus::ClientError);
    assert!(response.payload.answer.contains("too long"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_quota_error_falls_back_after_one_call() {
    let mock = Arc::new(MockClient::always(MockReply::error(
        "Gemini API error (429 Too Many Requests): Resource has been exhausted",
    )));
    let ta = pipeline(mock.clone(), 50, Duration::ZERO);
    let question = "Which model should I use for GA5 question 8?";

    let response = ta.ask(&AskRequest::new(question)).await;

    assert_eq!(mock.call_count(), 1);
    assert_eq!(response.status, ResponseStatus::Ok);
    assert_eq!(response.payload, expected_context_fallback(question));
}

#[tokio::test]
async fn test_image_description_reaches_prompt() {
    let mock = Arc::new(MockClient::new());
    let ta = pipeline(mock.clone(), 50, Duration::ZERO);

    let mut png = b"\x89PNG\r\n\x1a\n".to_vec();
    png.extend_from_slice(&[7u8; 120]);
    let request = AskRequest::new("What does this error mean?").with_image(STANDARD.encode(&png));

    let response = ta.ask(&request).await;
    let prompt = mock.last_prompt().unwrap();

    assert_eq!(response.status, ResponseStatus::Ok);
    assert!(prompt.contains("PNG"));
    assert!(prompt.contains("128 bytes"));
}

#[test]
fn test_oversized_answer_truncated() {
    let payload = validate(&json!({
        "answer": "x".repeat(2500),
        "links": [{"url": "https://discourse.onlinedegree.iitm.ac.in/", "text": "Forum"}]
    }));

    assert_eq!(payload.answer.chars().count(), 2000);
    assert!(payload.answer.ends_with("..."));
}

#[tokio::test]
async fn test_budget_spent_never_calls_provider() {
    let mock = Arc::new(MockClient::new());
    let ta = pipeline(mock.clone(), 2, Duration::ZERO);
    let question = "How do I submit the assignment?";

    for _ in 0..2 {
        ta.ask(&AskRequest::new(question)).await;
    }
    let third = ta.ask(&AskRequest::new(question)).await;

    assert_eq!(mock.call_count(), 2);
    assert_eq!(third.payload, expected_context_fallback(question));

    let health = ta.health().await;
    assert_eq!(health.generation.request_count, 2);
    assert_eq!(health.generation.daily_limit, 2);
}

#[tokio::test]
async fn test_provider_calls_respect_min_delay() {
    let delay = Duration::from_millis(120);
    let mock = Arc::new(MockClient::new());
    let ta = pipeline(mock.clone(), 50, delay);

    ta.ask(&AskRequest::new("python setup")).await;
    ta.ask(&AskRequest::new("git commit")).await;

    let instants = mock.call_instants();
    assert_eq!(instants.len(), 2);
    let gap = instants[1].duration_since(instants[0]);
    assert!(gap >= delay, "gap was {:?}", gap);
}

#[tokio::test]
async fn test_concurrent_retries_respect_min_delay() {
    let delay = Duration::from_millis(200);
    let mock = Arc::new(
        MockClient::always(MockReply::error(
            "Gemini API error (503 Service Unavailable): busy",
        ))
        .with_latency(Duration::from_millis(150)),
    );
    let settings = GenerationSettings {
        retry_backoff: Duration::from_millis(50),
        ..GenerationSettings::new("mock")
    };
    let orchestrator = Orchestrator::new(
        Some(GenerationClient::new(mock.clone(), default_answer_prompt(), settings)),
        SharedQuota::new(50, delay, QuotaReset::Lifetime),
    );
    let context = Context::from_text("Course Material - Git\nContent: Commit often.");

    let (first, second) = tokio::join!(
        orchestrator.respond("How do I commit?", &context, None),
        orchestrator.respond("How do I push?", &context, None),
    );

    assert_eq!(first.source, AnswerSource::ContextFallback);
    assert_eq!(second.source, AnswerSource::ContextFallback);

    let mut instants = mock.call_instants();
    instants.sort();
    assert_eq!(instants.len(), 4);
    for pair in instants.windows(2) {
        let gap = pair[1].duration_since(pair[0]);
        assert!(gap >= delay, "gap was {:?}", gap);
    }
}

#[tokio::test]
async fn test_contract_holds_for_any_provider_reply() {
    let replies = vec![
        MockReply::text(""),
        MockReply::text("word ".repeat(2000)),
        MockReply::text("x".repeat(5000)),
        MockReply::error("connection refused"),
        MockReply::text("Currently unable to process."),
        MockReply::text("Use pandas.read_csv to load the file."),
    ];
    let questions = [
        "What is pandas?",
        "python api error",
        "GA5 deadline",
        "?",
        "Comment créer un environnement virtuel ?",
    ];

    for reply in replies {
        let mock = Arc::new(MockClient::always(reply));
        let ta = pipeline(mock, 50, Duration::ZERO);
        for question in questions {
            let response = ta.ask(&AskRequest::new(question)).await;
            assert_eq!(response.status, ResponseStatus::Ok);
            assert_contract(&response.payload);
        }
    }
}

#[tokio::test]
async fn test_non_ascii_preserved_in_json() {
    let mock = Arc::new(MockClient::always(MockReply::text(
        "Réponse : utilisez venv, c'est très simple.",
    )));
    let ta = pipeline(mock, 50, Duration::ZERO);

    let response = ta.ask(&AskRequest::new("Comment créer un venv ?")).await;
    let json = serde_json::to_string(&response.payload).unwrap();

    assert!(json.contains("Réponse : utilisez venv, c'est très simple."));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let response = offline_pipeline().handle_json("{\"question\": ").await;
    assert_eq!(response.status, ResponseStatus::ClientError);
    assert_eq!(response.status.code(), 400);
}
