use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use lectio_services::jobs::{Flashcard, Transcript};
use lectio_services::pipeline::{PipelineStages, StageError};

/// In-process replacement for the external pipeline services. Behavior is
/// scripted per test; call counters let tests assert which stages ran.
pub struct MockStages {
    transcript_text: Mutex<String>,
    convert_delay: Mutex<Option<Duration>>,
    fail_convert: AtomicBool,
    fail_flashcards: AtomicBool,
    pub convert_calls: AtomicUsize,
    pub transcribe_calls: AtomicUsize,
    pub flashcard_calls: AtomicUsize,
    pub mindmap_calls: AtomicUsize,
}

impl MockStages {
    pub fn new() -> Self {
        Self {
            transcript_text: Mutex::new(
                "photosynthesis converts light energy into chemical energy".to_string(),
            ),
            convert_delay: Mutex::new(None),
            fail_convert: AtomicBool::new(false),
            fail_flashcards: AtomicBool::new(false),
            convert_calls: AtomicUsize::new(0),
            transcribe_calls: AtomicUsize::new(0),
            flashcard_calls: AtomicUsize::new(0),
            mindmap_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_transcript(self, text: &str) -> Self {
        *self.transcript_text.lock().unwrap() = text.to_string();
        self
    }

    /// Slows the convert stage down so tests can observe in-flight tasks.
    pub fn with_convert_delay(self, delay: Duration) -> Self {
        *self.convert_delay.lock().unwrap() = Some(delay);
        self
    }

    pub fn failing_convert(self) -> Self {
        self.fail_convert.store(true, Ordering::SeqCst);
        self
    }

    pub fn failing_flashcards(self) -> Self {
        self.fail_flashcards.store(true, Ordering::SeqCst);
        self
    }
}

impl Default for MockStages {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PipelineStages for MockStages {
    async fn convert(&self, _video: &Path, _audio: &Path) -> Result<(), StageError> {
        self.convert_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.convert_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_convert.load(Ordering::SeqCst) {
            return Err(StageError::Ffmpeg {
                status: "exit status: 1".to_string(),
                stderr: "Invalid data found when processing input".to_string(),
            });
        }
        Ok(())
    }

    async fn transcribe(&self, _audio: &Path) -> Result<Transcript, StageError> {
        self.transcribe_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Transcript {
            text: self.transcript_text.lock().unwrap().clone(),
            confidence: Some(0.93),
            duration_secs: Some(42.0),
        })
    }

    async fn summarize(&self, _transcript: &str) -> Result<String, StageError> {
        Ok("A lecture on photosynthesis.".to_string())
    }

    async fn generate_notes(&self, _text: &str) -> Result<String, StageError> {
        Ok("# Photosynthesis\n\n- light reactions\n- Calvin cycle".to_string())
    }

    async fn generate_flashcards(&self, _text: &str) -> Result<Vec<Flashcard>, StageError> {
        self.flashcard_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_flashcards.load(Ordering::SeqCst) {
            return Err(StageError::Upstream {
                service: "gemini",
                status: 429,
                body: "quota exceeded".to_string(),
            });
        }
        Ok(vec![
            Flashcard {
                question: "What does photosynthesis convert?".to_string(),
                answer: "Light energy into chemical energy.".to_string(),
            },
            Flashcard {
                question: "Where do the light reactions happen?".to_string(),
                answer: "In the thylakoid membrane.".to_string(),
            },
        ])
    }

    async fn generate_mindmap(&self, _text: &str) -> Result<serde_json::Value, StageError> {
        self.mindmap_calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({
            "title": "Photosynthesis",
            "children": [
                { "title": "Light reactions", "children": [] },
                { "title": "Calvin cycle", "children": [] }
            ]
        }))
    }
}
