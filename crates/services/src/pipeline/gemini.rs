use lectio_config::GeminiSettings;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::StageError;
use crate::jobs::Flashcard;

const GEMINI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini client for summary, notes, flashcard and mind-map generation.
pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub async fn summarize(&self, transcript: &str) -> Result<String, StageError> {
        let prompt = format!(
            "Write a short summary (3-5 sentences) of the following lecture \
             transcription. Capture the topic and the main points only, in plain text.\n\n\
             Transcription:\n{transcript}"
        );
        self.generate(&prompt).await
    }

    pub async fn generate_notes(&self, text: &str) -> Result<String, StageError> {
        let prompt = format!(
            "You are an AI that generates detailed, structured, and accurate lecture notes \
             from transcriptions. Minimum 2-3 page response is required. The format must be \
             markdown that can be embedded into a website. Add proper line breaks and bullet \
             points for lists, subtopics, and lines to look it good. You may add information \
             that is not present in the transcription, but ensure it is relevant and accurate.\n\n\
             Generate detailed and structured lecture notes from the following transcription:\n\
             {text}\n\n\
             Please follow these guidelines:\n\
             - Organize the notes into clear sections (e.g., Introduction, Key Concepts, Examples, Summary)\n\
             - Include definitions, explanations, and key points made by the lecturer\n\
             - Ensure the notes are comprehensive, accurate, and coherent\n\
             - Break down complex ideas into simpler terms\n\
             - Use bullet points for lists and subtopics\n\
             - If possible, highlight any key takeaways or important conclusions\n\
             - Maintain the authenticity of the information provided in the transcription"
        );
        self.generate(&prompt).await
    }

    pub async fn generate_flashcards(&self, text: &str) -> Result<Vec<Flashcard>, StageError> {
        let prompt = format!(
            "Generate 10 meaningful flashcards from the following transcript. \
             Each flashcard should have a question on the front and the answer on the back. \
             The questions should test understanding of key concepts, definitions, and \
             important points. Format the response as a JSON array of objects with \
             'question' and 'answer' fields. Return ONLY the JSON, no markdown fences.\n\n\
             Transcript:\n{text}\n\n\
             Guidelines:\n\
             - Create questions that test understanding, not just recall\n\
             - Include a mix of definition, concept, and application questions\n\
             - Keep answers concise but complete\n\
             - Ensure questions are clear and unambiguous\n\
             - Focus on the most important concepts from the transcript"
        );
        let raw = self.generate(&prompt).await?;
        parse_flashcards(&raw)
    }

    pub async fn generate_mindmap(&self, text: &str) -> Result<serde_json::Value, StageError> {
        let prompt = format!(
            "Build a mind map of the following lecture transcript. Return ONLY a JSON \
             object (no markdown fences) of the shape \
             {{\"title\": string, \"children\": [{{\"title\": string, \"children\": [...]}}]}} \
             with 2-3 levels of depth covering the main topics and subtopics.\n\n\
             Transcript:\n{text}"
        );
        let raw = self.generate(&prompt).await?;
        serde_json::from_str(strip_code_fences(&raw)).map_err(|e| StageError::InvalidResponse {
            service: "gemini",
            detail: format!("mindmap is not valid JSON: {e}"),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, StageError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(StageError::NotConfigured("Gemini API key"))?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "maxOutputTokens": self.settings.max_output_tokens },
        });

        let resp = self
            .client
            .post(format!(
                "{GEMINI_BASE}/models/{}:generateContent",
                self.settings.model
            ))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StageError::Upstream {
                service: "gemini",
                status,
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(StageError::InvalidResponse {
                service: "gemini",
                detail: "no text in response".to_string(),
            });
        }

        info!(model = %self.settings.model, chars = text.len(), "Gemini generation complete");
        Ok(text)
    }
}

fn parse_flashcards(raw: &str) -> Result<Vec<Flashcard>, StageError> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|e| StageError::InvalidResponse {
        service: "gemini",
        detail: format!("flashcards are not valid JSON: {e}"),
    })
}

/// Models often wrap JSON in ```json fences despite instructions not to.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence, then the closing fence.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim().trim_end_matches("```").trim()
}
