use std::path::Path;
use std::time::Duration;

use base64::Engine;
use lectio_config::SpeechSettings;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::StageError;
use crate::jobs::Transcript;

const SPEECH_BASE: &str = "https://speech.googleapis.com/v1p1beta1";
const OPERATION_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Google Cloud Speech-to-Text client. Short audio is sent inline with the
/// recognize request; when a GCS bucket is configured the audio is uploaded
/// there first and transcribed with the long-running API.
pub struct SpeechClient {
    client: Client,
    settings: SpeechSettings,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
    result_end_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    transcript: Option<String>,
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    response: Option<RecognizeResponse>,
    error: Option<OperationError>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    code: Option<i64>,
    message: Option<String>,
}

impl SpeechClient {
    pub fn new(settings: SpeechSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    pub async fn transcribe(&self, audio: &Path) -> Result<Transcript, StageError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(StageError::NotConfigured("Speech API key"))?;

        let bytes = tokio::fs::read(audio).await?;
        info!(audio = %audio.display(), size = bytes.len(), "Transcribing audio");

        let config = json!({
            "encoding": "MP3",
            "languageCode": self.settings.language,
            "enableAutomaticPunctuation": true,
        });

        let response = match (&self.settings.gcs_bucket, &self.settings.gcs_access_token) {
            (Some(bucket), Some(token)) => {
                let uri = self.upload_to_gcs(bucket, token, audio, bytes).await?;
                self.long_running_recognize(api_key, config, &uri).await?
            }
            _ => {
                let content = base64::engine::general_purpose::STANDARD.encode(&bytes);
                self.inline_recognize(api_key, config, content).await?
            }
        };

        Ok(collect_transcript(response))
    }

    async fn inline_recognize(
        &self,
        api_key: &str,
        config: serde_json::Value,
        content: String,
    ) -> Result<RecognizeResponse, StageError> {
        let resp = self
            .client
            .post(format!("{SPEECH_BASE}/speech:recognize"))
            .query(&[("key", api_key)])
            .json(&json!({ "config": config, "audio": { "content": content } }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StageError::Upstream {
                service: "speech",
                status,
                body,
            });
        }

        Ok(resp.json().await?)
    }

    async fn long_running_recognize(
        &self,
        api_key: &str,
        config: serde_json::Value,
        uri: &str,
    ) -> Result<RecognizeResponse, StageError> {
        let resp = self
            .client
            .post(format!("{SPEECH_BASE}/speech:longrunningrecognize"))
            .query(&[("key", api_key)])
            .json(&json!({ "config": config, "audio": { "uri": uri } }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StageError::Upstream {
                service: "speech",
                status,
                body,
            });
        }

        let mut op: Operation = resp.json().await?;
        while !op.done {
            tokio::time::sleep(OPERATION_POLL_INTERVAL).await;
            debug!(operation = %op.name, "Polling transcription operation");
            let resp = self
                .client
                .get(format!("{SPEECH_BASE}/operations/{}", op.name))
                .query(&[("key", api_key)])
                .send()
                .await?;
            op = resp.json().await?;
        }

        if let Some(err) = op.error {
            return Err(StageError::Upstream {
                service: "speech",
                status: err.code.unwrap_or(0) as u16,
                body: err.message.unwrap_or_default(),
            });
        }

        op.response.ok_or(StageError::InvalidResponse {
            service: "speech",
            detail: "operation finished without a response".to_string(),
        })
    }

    async fn upload_to_gcs(
        &self,
        bucket: &str,
        token: &str,
        audio: &Path,
        bytes: Vec<u8>,
    ) -> Result<String, StageError> {
        let object = audio
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.mp3", uuid::Uuid::new_v4()));

        let resp = self
            .client
            .post(format!(
                "https://storage.googleapis.com/upload/storage/v1/b/{bucket}/o"
            ))
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .bearer_auth(token)
            .header("content-type", "audio/mpeg")
            .body(bytes)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(StageError::Upstream {
                service: "gcs",
                status,
                body,
            });
        }

        info!(%bucket, %object, "Uploaded audio to GCS");
        Ok(format!("gs://{bucket}/{object}"))
    }
}

fn collect_transcript(response: RecognizeResponse) -> Transcript {
    let mut text = String::new();
    let mut confidences = Vec::new();
    let mut duration_secs = None;

    for result in &response.results {
        if let Some(alt) = result.alternatives.first() {
            if let Some(t) = &alt.transcript {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(t.trim());
            }
            if let Some(c) = alt.confidence {
                confidences.push(c);
            }
        }
        if let Some(end) = &result.result_end_time {
            // Durations come back as "123.450s".
            if let Ok(secs) = end.trim_end_matches('s').parse::<f64>() {
                duration_secs = Some(secs);
            }
        }
    }

    let confidence = if confidences.is_empty() {
        None
    } else {
        Some(confidences.iter().sum::<f64>() / confidences.len() as f64)
    };

    Transcript {
        text,
        confidence,
        duration_secs,
    }
}
