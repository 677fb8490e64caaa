use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub jobs: JobSettings,
    pub ffmpeg: FfmpegSettings,
    pub speech: SpeechSettings,
    pub gemini: GeminiSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Maximum accepted upload body size in megabytes.
    pub max_upload_mb: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub upload_dir: String,
    pub output_dir: String,
    pub cache_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobSettings {
    /// Number of pipeline workers pulling from the processing queue.
    pub workers: usize,
    /// Capacity of the processing queue; uploads beyond this wait to enqueue.
    pub queue_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FfmpegSettings {
    pub bin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechSettings {
    pub api_key: Option<String>,
    pub language: String,
    /// GCS bucket for long-audio transcription. When unset, audio is sent
    /// inline with the recognize request.
    pub gcs_bucket: Option<String>,
    /// OAuth bearer token used for GCS object uploads.
    pub gcs_access_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub max_output_tokens: u32,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("LECTIO"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 5001)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("app.max_upload_mb", 512)?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "lectio")?
            .set_default("storage.upload_dir", "uploads")?
            .set_default("storage.output_dir", "outputs")?
            .set_default("storage.cache_dir", "cache")?
            .set_default("jobs.workers", 4)?
            .set_default("jobs.queue_capacity", 64)?
            .set_default("ffmpeg.bin", "ffmpeg")?
            .set_default("speech.api_key", None::<String>)?
            .set_default("speech.language", "en-US")?
            .set_default("speech.gcs_bucket", None::<String>)?
            .set_default("speech.gcs_access_token", None::<String>)?
            .set_default("gemini.api_key", None::<String>)?
            .set_default("gemini.model", "gemini-1.5-pro")?
            .set_default("gemini.max_output_tokens", 8192)?
            .build()?;

        config.try_deserialize()
    }
}
