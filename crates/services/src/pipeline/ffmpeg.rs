use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use super::StageError;

/// Video-to-audio conversion via an ffmpeg subprocess.
pub struct MediaConverter {
    bin: String,
}

impl MediaConverter {
    pub fn new(bin: String) -> Self {
        Self { bin }
    }

    /// Extracts the audio track of `video` into `audio` as mp3.
    pub async fn extract_audio(&self, video: &Path, audio: &Path) -> Result<(), StageError> {
        info!(video = %video.display(), audio = %audio.display(), "Extracting audio");

        let output = Command::new(&self.bin)
            .arg("-y")
            .arg("-i")
            .arg(video)
            .arg("-vn")
            .arg("-acodec")
            .arg("libmp3lame")
            .arg("-q:a")
            .arg("2")
            .arg(audio)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // ffmpeg logs everything to stderr; keep only the tail, the
            // actual error is at the end.
            let tail: String = stderr
                .lines()
                .rev()
                .take(5)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect::<Vec<_>>()
                .join("\n");
            return Err(StageError::Ffmpeg {
                status: output.status.to_string(),
                stderr: tail,
            });
        }

        debug!(audio = %audio.display(), "Audio extraction complete");
        Ok(())
    }
}
