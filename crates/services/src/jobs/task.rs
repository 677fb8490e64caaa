use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One upload's end-to-end processing record. Lives in the in-memory job
/// store for the lifetime of the process; not persisted across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub status: TaskStatus,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultBundle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether the initial result bundle came from the cache rather than a
    /// fresh pipeline run.
    #[serde(default)]
    pub cached: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Uploaded,
    Converting,
    Transcribing,
    Summarizing,
    GeneratingNotes,
    Completed,
    Error,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Uploaded => "uploaded",
            TaskStatus::Converting => "converting",
            TaskStatus::Transcribing => "transcribing",
            TaskStatus::Summarizing => "summarizing",
            TaskStatus::GeneratingNotes => "generating_notes",
            TaskStatus::Completed => "completed",
            TaskStatus::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Error)
    }
}

/// Everything one full pipeline run produces for a lecture. Flashcards and
/// mindmap start empty and are filled in by the on-demand endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultBundle {
    pub transcript: Transcript,
    pub summary: String,
    pub notes: String,
    #[serde(default)]
    pub flashcards: Vec<Flashcard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mindmap: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}
