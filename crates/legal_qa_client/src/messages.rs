//! JSON wire types for the Q&A backend's HTTP API.
//!
//! Every endpoint answers with the same envelope: a `success` flag plus either
//! a `data` payload or a `message` string. Payload fields are mostly optional;
//! the client checks presence, not schema.

use serde::{Deserialize, Serialize};

/// Tone of the generated answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStyle {
    #[default]
    Professional,
    Simple,
    Detailed,
}

impl AnswerStyle {
    pub const ALL: [AnswerStyle; 3] = [
        AnswerStyle::Professional,
        AnswerStyle::Simple,
        AnswerStyle::Detailed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnswerStyle::Professional => "professional",
            AnswerStyle::Simple => "simple",
            AnswerStyle::Detailed => "detailed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Template the backend applies when analysing free text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    #[default]
    LegalContent,
    Conversation,
    SessionInsights,
    LawAnalysis,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 4] = [
        AnalysisType::LegalContent,
        AnalysisType::Conversation,
        AnalysisType::SessionInsights,
        AnalysisType::LawAnalysis,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisType::LegalContent => "legal_content",
            AnalysisType::Conversation => "conversation",
            AnalysisType::SessionInsights => "session_insights",
            AnalysisType::LawAnalysis => "law_analysis",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

// ── Requests ────────────────────────────────────────────────────────────

/// Client → server: `POST /api/question`.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
    pub answer_style: AnswerStyle,
    pub session_id: Option<&'a str>,
}

/// Client → server: `POST /api/session/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub title: &'a str,
}

/// Client → server: `POST /api/content/analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub content: &'a str,
    pub analysis_type: AnalysisType,
}

// ── Responses ───────────────────────────────────────────────────────────

/// Response envelope shared by every `/api/*` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Error body for non-2xx replies (`{"detail": "..."}`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.detail.or(self.message)
    }
}

/// `data` of `GET /api/system/status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SystemInfo {
    pub ready: Option<bool>,
    pub system_name: Option<String>,
    pub version: Option<String>,
    pub llm_model: Option<String>,
    pub embedding_model: Option<String>,
    pub vector_count: Option<u64>,
    pub tools_count: Option<u64>,
    pub agents_status: Option<bool>,
    pub startup_time: Option<String>,
    pub llm_backend: Option<String>,
    pub vector_db: Option<String>,
    pub capabilities: Vec<String>,
}

/// Outcome of a status probe: readiness plus whatever the server said.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStatus {
    pub ready: bool,
    pub message: Option<String>,
    pub info: Option<SystemInfo>,
}

/// `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub system_ready: bool,
}

/// `data` of `POST /api/question`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub session_id: String,
    #[serde(default)]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub answer_style: Option<AnswerStyle>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `data` of `POST /api/session/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedSession {
    pub session_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// `data` of `POST /api/session/{id}/switch`.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchedSession {
    pub session_id: String,
}

/// One entry of `GET /api/sessions`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_activity: String,
}

/// `data` of `GET /api/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionList {
    #[serde(default)]
    pub sessions: Vec<SessionInfo>,
}

/// One stored turn from `GET /api/session/{id}/messages`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryMessage {
    #[serde(rename = "type")]
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `data` of `GET /api/session/{id}/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionMessages {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

/// `data` of `GET /api/conversation/summary`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Summary {
    pub summary: Option<String>,
    pub message_count: Option<u64>,
}

/// `data` of `POST /api/content/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Analysis {
    pub analysis: Option<String>,
    pub analysis_type: Option<String>,
    pub content_length: Option<u64>,
}
