//! HTTP client for the Q&A backend: one async method per endpoint, single
//! attempt, no retries.

use std::time::Duration;

use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::messages::{
    Analysis, AnalysisType, AnalyzeRequest, Answer, AnswerStyle, CreateSessionRequest,
    CreatedSession, Envelope, ErrorBody, Health, HistoryMessage, QuestionRequest, SessionInfo,
    SessionList, SessionMessages, Summary, SwitchedSession, SystemInfo, SystemStatus,
};

/// Request failure, as seen by the controller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The server answered `success: false`.
    #[error("{0}")]
    Rejected(String),
    #[error("response is missing {0}")]
    MissingData(&'static str),
}

/// Client bound to one backend base URL (e.g. `http://127.0.0.1:8000`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/system/status`. A not-ready backend is a normal answer, not an error.
    pub async fn system_status(&self) -> Result<SystemStatus, ApiError> {
        let envelope: Envelope<SystemInfo> = self.get(&["api", "system", "status"]).await?;
        let ready = envelope.success && envelope.status.as_deref() == Some("ready");
        Ok(SystemStatus {
            ready,
            message: envelope.message,
            info: envelope.data,
        })
    }

    /// `GET /health`. Plain JSON, no envelope.
    pub async fn health(&self) -> Result<Health, ApiError> {
        let url = self.endpoint(&["health"])?;
        log::debug!("GET {}", url);
        let response = self.http.get(url).timeout(self.timeout).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// `POST /api/question`.
    pub async fn ask_question(
        &self,
        question: &str,
        answer_style: AnswerStyle,
        session_id: Option<&str>,
    ) -> Result<Answer, ApiError> {
        let body = QuestionRequest {
            question,
            answer_style,
            session_id,
        };
        let envelope = self.post(&["api", "question"], Some(&body)).await?;
        unwrap_data(envelope, "answer", "Question failed")
    }

    /// `POST /api/session/create`.
    pub async fn create_session(&self, title: &str) -> Result<CreatedSession, ApiError> {
        let body = CreateSessionRequest { title };
        let envelope = self.post(&["api", "session", "create"], Some(&body)).await?;
        unwrap_data(envelope, "session", "Failed to create session")
    }

    /// `GET /api/sessions`.
    pub async fn list_sessions(&self) -> Result<Vec<SessionInfo>, ApiError> {
        let envelope: Envelope<SessionList> = self.get(&["api", "sessions"]).await?;
        Ok(unwrap_data(envelope, "sessions", "Failed to list sessions")?.sessions)
    }

    /// `POST /api/session/{id}/switch`.
    pub async fn switch_session(&self, session_id: &str) -> Result<SwitchedSession, ApiError> {
        let envelope = self
            .post::<(), _>(&["api", "session", session_id, "switch"], None)
            .await?;
        unwrap_data(envelope, "session", "Session not found")
    }

    /// `GET /api/session/{id}/messages`, in server order.
    pub async fn session_messages(
        &self,
        session_id: &str,
    ) -> Result<Vec<HistoryMessage>, ApiError> {
        let envelope: Envelope<SessionMessages> = self
            .get(&["api", "session", session_id, "messages"])
            .await?;
        Ok(unwrap_data(envelope, "messages", "Failed to load messages")?.messages)
    }

    /// `GET /api/conversation/summary`.
    pub async fn conversation_summary(&self) -> Result<Summary, ApiError> {
        let envelope = self.get(&["api", "conversation", "summary"]).await?;
        unwrap_data(envelope, "summary", "Failed to summarize conversation")
    }

    /// `POST /api/content/analyze`.
    pub async fn analyze_content(
        &self,
        content: &str,
        analysis_type: AnalysisType,
    ) -> Result<Analysis, ApiError> {
        let body = AnalyzeRequest {
            content,
            analysis_type,
        };
        let envelope = self.post(&["api", "content", "analyze"], Some(&body)).await?;
        unwrap_data(envelope, "analysis", "Content analysis failed")
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Envelope<T>, ApiError> {
        let url = self.endpoint(segments)?;
        log::debug!("GET {}", url);
        let response = self.http.get(url).timeout(self.timeout).send().await?;
        read_envelope(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Envelope<T>, ApiError> {
        let url = self.endpoint(segments)?;
        log::debug!("POST {}", url);
        let mut request = self.http.post(url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        read_envelope(request.send().await?).await
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: ErrorBody = response.json().await.unwrap_or_default();
    let message = body.into_message().unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<Envelope<T>, ApiError> {
    let response = check_status(response).await?;
    Ok(response.json().await?)
}

fn unwrap_data<T>(envelope: Envelope<T>, what: &'static str, fallback: &str) -> Result<T, ApiError> {
    if !envelope.success {
        return Err(ApiError::Rejected(
            envelope.message.unwrap_or_else(|| fallback.to_string()),
        ));
    }
    envelope.data.ok_or(ApiError::MissingData(what))
}
