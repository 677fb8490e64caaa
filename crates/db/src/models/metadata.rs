use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Per-lecture study material: transcript, notes, chat history and
/// reviewed flashcards, keyed by the lecture's URL path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureMetadata {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub url_path: String,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub chat: Vec<ChatMessage>,
    #[serde(default)]
    pub flashcards: Vec<StoredFlashcard>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFlashcard {
    pub question: String,
    pub answer: String,
    pub last_reviewed: DateTime,
}

impl LectureMetadata {
    pub const COLLECTION: &'static str = "metadata";
}
