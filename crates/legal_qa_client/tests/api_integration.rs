//! Integration tests for the HTTP API client against an in-process fake backend.
//! No mocks of the client itself: every call goes over a real socket.

mod common;

use common::{free_port, BackendState, FakeBackend, FakeSession};
use legal_qa_client::messages::{AnalysisType, AnswerStyle, Role};
use legal_qa_client::{ApiClient, ApiError};

#[tokio::test]
async fn status_of_ready_backend_carries_system_info() {
    let backend = FakeBackend::start(BackendState::ready()).await;
    let client = ApiClient::new(backend.url());

    let status = client.system_status().await.expect("status should succeed");
    assert!(status.ready);
    let info = status.info.expect("ready backend sends info");
    assert_eq!(info.llm_model.as_deref(), Some("qwen2.5"));
    assert_eq!(info.vector_count, Some(4573));
    assert_eq!(info.agents_status, Some(true));
    assert_eq!(info.capabilities, vec!["multi-turn dialogue"]);
}

#[tokio::test]
async fn not_ready_backend_is_an_answer_not_an_error() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let client = ApiClient::new(backend.url());

    let status = client.system_status().await.expect("status should succeed");
    assert!(!status.ready);
    assert_eq!(status.message.as_deref(), Some("Indexes still loading"));
    assert!(status.info.is_none());

    let health = client.health().await.expect("health should succeed");
    assert_eq!(health.status, "initializing");
    assert!(!health.system_ready);
}

#[tokio::test]
async fn question_without_session_gets_a_new_one() {
    let backend = FakeBackend::start(BackendState::ready()).await;
    let client = ApiClient::new(backend.url());

    let answer = client
        .ask_question("What is a tort?", AnswerStyle::Detailed, None)
        .await
        .expect("question should succeed");
    assert_eq!(answer.answer, "Answer: What is a tort?");
    assert_eq!(answer.session_id, "session-1");
    assert_eq!(answer.execution_time, Some(1.25));
    assert_eq!(answer.answer_style, Some(AnswerStyle::Detailed));

    let sent = backend.questions();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["answer_style"], "detailed");
    assert!(sent[0]["session_id"].is_null());
}

#[tokio::test]
async fn rejected_question_carries_server_message() {
    let backend = FakeBackend::start(BackendState {
        fail_questions: true,
        ..BackendState::ready()
    })
    .await;
    let client = ApiClient::new(backend.url());

    let err = client
        .ask_question("anything", AnswerStyle::Professional, Some("s-1"))
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected(message) => assert_eq!(message, "model offline"),
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn unavailable_backend_maps_detail_into_status_error() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let client = ApiClient::new(backend.url());

    let err = client
        .ask_question("anything", AnswerStyle::Professional, None)
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "System not ready");
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn session_lifecycle() {
    let backend = FakeBackend::start(
        BackendState::ready()
            .with_session(FakeSession::new("old", "Lease").with_turn("Can I sublet?", "Usually.")),
    )
    .await;
    let client = ApiClient::new(backend.url());

    let created = client
        .create_session("New conversation")
        .await
        .expect("create should succeed");
    assert_eq!(created.session_id, "session-1");
    assert_eq!(created.title.as_deref(), Some("New conversation"));

    let sessions = client.list_sessions().await.expect("list should succeed");
    let ids: Vec<&str> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["old", "session-1"]);
    assert_eq!(sessions[0].message_count, 2);

    let switched = client.switch_session("old").await.expect("switch should succeed");
    assert_eq!(switched.session_id, "old");

    let history = client
        .session_messages("old")
        .await
        .expect("messages should load");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "Can I sublet?");
    assert_eq!(history[1].role, Role::Assistant);

    assert!(client
        .session_messages("session-1")
        .await
        .expect("messages should load")
        .is_empty());
}

#[tokio::test]
async fn switching_to_unknown_session_is_rejected() {
    let backend = FakeBackend::start(BackendState::ready()).await;
    let client = ApiClient::new(backend.url());

    let err = client.switch_session("ghost").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(_)), "got {:?}", err);
    assert_eq!(backend.count("POST /api/session/ghost/switch"), 1);
}

#[tokio::test]
async fn summary_and_analysis() {
    let backend = FakeBackend::start(BackendState::ready()).await;
    let client = ApiClient::new(backend.url());

    let summary = client
        .conversation_summary()
        .await
        .expect("summary should succeed");
    assert_eq!(
        summary.summary.as_deref(),
        Some("You asked 0 question(s) about contract law.")
    );

    let analysis = client
        .analyze_content("Article 5", AnalysisType::LawAnalysis)
        .await
        .expect("analysis should succeed");
    assert_eq!(
        analysis.analysis.as_deref(),
        Some("[law_analysis] reviewed 9 characters")
    );
    assert_eq!(analysis.content_length, Some(9));

    let err = client
        .analyze_content("   ", AnalysisType::LegalContent)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected(ref m) if m == "Content must not be empty"));
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    let client = ApiClient::new(format!("http://127.0.0.1:{}", free_port()));
    let err = client.system_status().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)), "got {:?}", err);
}
