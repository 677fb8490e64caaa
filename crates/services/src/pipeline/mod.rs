pub mod ffmpeg;
pub mod gemini;
pub mod speech;

use std::path::Path;

use async_trait::async_trait;
use lectio_config::Settings;
use thiserror::Error;

use crate::jobs::{Flashcard, Transcript};

pub use ffmpeg::MediaConverter;
pub use gemini::GeminiClient;
pub use speech::SpeechClient;

#[derive(Debug, Error)]
pub enum StageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ffmpeg failed ({status}): {stderr}")]
    Ffmpeg { status: String, stderr: String },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{service} error {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },
    #[error("Unexpected {service} response: {detail}")]
    InvalidResponse {
        service: &'static str,
        detail: String,
    },
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Transcription failed")]
    EmptyTranscript,
}

/// The external collaborators the job runner drives a task through.
/// Each call is fallible and possibly slow; the runner owns the policy for
/// which failures are hard and which degrade gracefully.
#[async_trait]
pub trait PipelineStages: Send + Sync {
    /// Extract the audio track of `video` into `audio`.
    async fn convert(&self, video: &Path, audio: &Path) -> Result<(), StageError>;

    /// Speech-to-text on the extracted audio.
    async fn transcribe(&self, audio: &Path) -> Result<Transcript, StageError>;

    async fn summarize(&self, transcript: &str) -> Result<String, StageError>;

    /// Markdown lecture notes.
    async fn generate_notes(&self, text: &str) -> Result<String, StageError>;

    async fn generate_flashcards(&self, text: &str) -> Result<Vec<Flashcard>, StageError>;

    async fn generate_mindmap(&self, text: &str) -> Result<serde_json::Value, StageError>;
}

/// Production stages: ffmpeg subprocess, Google Speech, Gemini.
pub struct LiveStages {
    converter: MediaConverter,
    speech: SpeechClient,
    gemini: GeminiClient,
}

impl LiveStages {
    pub fn new(settings: &Settings) -> Self {
        Self {
            converter: MediaConverter::new(settings.ffmpeg.bin.clone()),
            speech: SpeechClient::new(settings.speech.clone()),
            gemini: GeminiClient::new(settings.gemini.clone()),
        }
    }
}

#[async_trait]
impl PipelineStages for LiveStages {
    async fn convert(&self, video: &Path, audio: &Path) -> Result<(), StageError> {
        self.converter.extract_audio(video, audio).await
    }

    async fn transcribe(&self, audio: &Path) -> Result<Transcript, StageError> {
        self.speech.transcribe(audio).await
    }

    async fn summarize(&self, transcript: &str) -> Result<String, StageError> {
        self.gemini.summarize(transcript).await
    }

    async fn generate_notes(&self, text: &str) -> Result<String, StageError> {
        self.gemini.generate_notes(text).await
    }

    async fn generate_flashcards(&self, text: &str) -> Result<Vec<Flashcard>, StageError> {
        self.gemini.generate_flashcards(text).await
    }

    async fn generate_mindmap(&self, text: &str) -> Result<serde_json::Value, StageError> {
        self.gemini.generate_mindmap(text).await
    }
}
