//! Integration tests for the submission workflow
//!
//! Runs the workflow against a mock generator service: validation, the
//! multipart request, rendering and export of the returned questions.

use chrono::NaiveDate;
use httpmock::prelude::*;
use interview_assistant::{
    Attachment, ExportFormat, Field, FieldErrorKind, FormInput, HttpGenerator,
    SubmissionWorkflow, WorkflowError, WorkflowState,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// TEST HELPERS
// ============================================================================

const GENERATE: &str = "/api/v1/generate-questions";

fn form() -> FormInput {
    FormInput {
        resume: Some(Attachment::new(
            "jane-doe.txt",
            "text/plain",
            b"Jane Doe\nSenior backend engineer, 8 years of Go and Rust".to_vec(),
        )),
        job_description: "We are hiring a backend engineer to build low-latency payment APIs in Rust."
            .to_string(),
        round_type: "technical".to_string(),
        difficulty: "advanced".to_string(),
        num_questions: "2".to_string(),
        focus_areas: "Rust, distributed systems".to_string(),
        api_key: "AIzaSyD-0123456789abcdefghijk".to_string(),
    }
}

/// Two questions: the first with every optional field, the second bare
fn payload() -> serde_json::Value {
    json!({
        "questions": [
            {
                "question": "How would you make a payment API idempotent?",
                "category": "Technical",
                "difficulty": "advanced",
                "context": "Resume mentions payment processing at scale",
                "follow_up_questions": [
                    "Where do you store idempotency keys?",
                    "How long do you keep them?"
                ],
                "expected_topics": ["idempotency keys", "retries", "exactly-once"]
            },
            {
                "question": "Walk me through debugging a deadlock in async Rust.",
                "category": "Problem Solving",
                "difficulty": "advanced",
                "follow_up_questions": null,
                "expected_topics": []
            }
        ],
        "total_questions": 2,
        "round_type": "technical",
        "difficulty": "advanced",
        "metadata": {
            "model": "gemini-2.5-flash",
            "temperature": 0.7,
            "resume_sections": 4
        }
    })
}

fn workflow_for(server: &MockServer) -> SubmissionWorkflow {
    let generator = HttpGenerator::new(&server.base_url(), Duration::from_secs(5)).unwrap();
    SubmissionWorkflow::new(Arc::new(generator))
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, 5).unwrap()
}

// ============================================================================
// END-TO-END
// ============================================================================

#[tokio::test]
async fn test_generate_render_export() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(GENERATE)
                .body_contains("name=\"resume\"; filename=\"jane-doe.txt\"")
                .body_contains("name=\"round_type\"")
                .body_contains("Rust, distributed systems");
            then.status(200).json_body(payload());
        })
        .await;

    let workflow = workflow_for(&server);
    let result = workflow.generate(&form()).await.unwrap();
    mock.assert_async().await;

    assert_eq!(workflow.state(), WorkflowState::Rendered);
    assert_eq!(result.total_questions, 2);
    assert_eq!(result.model_name(), "gemini-2.5-flash");
    assert!(result.questions[1].follow_up_questions.is_empty());

    let rendered = console::strip_ansi_codes(&workflow.render(&result)).to_string();
    let exported = workflow.export(date()).unwrap();

    // every question text reproduced verbatim and in order
    for text in [&rendered, &exported] {
        let first = text.find("How would you make a payment API idempotent?").unwrap();
        let second = text
            .find("Walk me through debugging a deadlock in async Rust.")
            .unwrap();
        assert!(first < second);
    }

    assert_eq!(exported.matches("\nQuestion ").count(), 2);
    assert!(exported.contains("Question 1 (Technical)"));
    assert!(exported.contains("Question 2 (Problem Solving)"));
    assert_eq!(exported.matches("Follow-up Questions:").count(), 1);
    assert_eq!(exported.matches("Expected Topics:").count(), 1);
    assert!(exported.contains("Expected Topics: idempotency keys, retries, exactly-once"));
    assert!(exported.contains("- Generated: 2024-11-05"));

    let second_card = &exported[exported.find("Question 2 (").unwrap()..];
    assert!(!second_card.contains("Follow-up Questions:"));
    assert!(!second_card.contains("Expected Topics:"));
    assert!(!second_card.contains("Context:"));
}

#[tokio::test]
async fn test_export_file_round_trips_as_json() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE);
            then.status(200).json_body(payload());
        })
        .await;

    let workflow = workflow_for(&server);
    let result = workflow.generate(&form()).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = workflow
        .export_to_file(dir.path(), ExportFormat::Json, date())
        .unwrap();
    assert_eq!(path.file_name().unwrap(), "interview-questions-2024-11-05.json");

    let saved = interview_assistant::GenerationResult::from_slice(&std::fs::read(&path).unwrap())
        .unwrap();
    assert_eq!(&saved, result.as_ref());
    // unknown metadata keys survive
    assert_eq!(
        saved.metadata.unwrap().extra.get("resume_sections"),
        Some(&json!(4))
    );
}

// ============================================================================
// FAILURES
// ============================================================================

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE);
            then.status(200).json_body(payload());
        })
        .await;

    let mut input = form();
    input.resume = None;
    input.num_questions = "0".to_string();
    input.api_key = "short".to_string();

    let workflow = workflow_for(&server);
    match workflow.generate(&input).await {
        Err(WorkflowError::Invalid(report)) => {
            assert_eq!(report.len(), 3);
            assert_eq!(
                report.get(Field::Resume).map(|v| v.kind),
                Some(FieldErrorKind::MissingField)
            );
            assert_eq!(
                report.get(Field::NumQuestions).map(|v| v.kind),
                Some(FieldErrorKind::OutOfRange)
            );
            assert_eq!(
                report.get(Field::ApiKey).map(|v| v.kind),
                Some(FieldErrorKind::TooShort)
            );
        }
        other => panic!("expected Invalid, got {:?}", other),
    }

    mock.assert_hits_async(0).await;
    assert!(matches!(
        workflow.export(date()),
        Err(WorkflowError::NothingToExport)
    ));
}

#[tokio::test]
async fn test_server_error_detail_is_reported() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE);
            then.status(500)
                .json_body(json!({ "detail": "Resume parsing error: unreadable file" }));
        })
        .await;

    let workflow = workflow_for(&server);
    match workflow.generate(&form()).await {
        Err(WorkflowError::GenerationFailed(msg)) => {
            assert_eq!(msg, "Resume parsing error: unreadable file")
        }
        other => panic!("expected GenerationFailed, got {:?}", other),
    }
    assert_eq!(workflow.state(), WorkflowState::Failed);
    assert!(workflow.current_result().is_none());
}

#[tokio::test]
async fn test_server_error_without_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE);
            then.status(502).body("Bad Gateway");
        })
        .await;

    let workflow = workflow_for(&server);
    let err = workflow.generate(&form()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to generate questions");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_success_body_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE);
            then.status(200)
                .json_body(json!({ "questions": [{ "question": "Missing the rest" }] }));
        })
        .await;

    let workflow = workflow_for(&server);
    assert!(matches!(
        workflow.generate(&form()).await,
        Err(WorkflowError::GenerationFailed(_))
    ));
    assert!(workflow.current_result().is_none());
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    // nothing listens on the discard port
    let generator = HttpGenerator::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let workflow = SubmissionWorkflow::new(Arc::new(generator));

    assert!(matches!(
        workflow.generate(&form()).await,
        Err(WorkflowError::TransportError(_))
    ));
    assert!(!workflow.is_submitting());
}

// ============================================================================
// CONCURRENCY
// ============================================================================

#[tokio::test]
async fn test_concurrent_submission_issues_one_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path(GENERATE);
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(payload());
        })
        .await;

    let workflow = workflow_for(&server);
    let input = form();

    // join! polls the first future first, so it holds the flag
    let (first, second) = tokio::join!(workflow.generate(&input), workflow.generate(&input));

    assert!(first.is_ok());
    assert!(matches!(second, Err(WorkflowError::AlreadyInProgress)));
    mock.assert_hits_async(1).await;
    assert_eq!(workflow.state(), WorkflowState::Rendered);
}
