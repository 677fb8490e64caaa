use std::path::PathBuf;
use std::sync::Arc;

use lectio_config::JobSettings;
use tokio::sync::{Mutex, mpsc};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::store::JobStore;
use super::task::{ResultBundle, TaskStatus};
use crate::cache::ResultCache;
use crate::pipeline::{PipelineStages, StageError};

/// One enqueued upload, ready for processing.
#[derive(Debug)]
pub struct ProcessingJob {
    pub task_id: Uuid,
    pub filename: String,
    pub video_path: PathBuf,
    pub audio_path: PathBuf,
}

/// Bounded pool of pipeline workers fed by a channel. Uploads enqueue and
/// return immediately; workers drive each task through the stages strictly
/// in order, updating the job store after every transition.
#[derive(Clone)]
pub struct JobRunner {
    tx: mpsc::Sender<ProcessingJob>,
}

impl JobRunner {
    pub fn spawn(
        settings: &JobSettings,
        store: Arc<JobStore>,
        cache: Arc<ResultCache>,
        stages: Arc<dyn PipelineStages>,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<ProcessingJob>(settings.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        for worker in 0..settings.workers.max(1) {
            let rx = Arc::clone(&rx);
            let store = Arc::clone(&store);
            let cache = Arc::clone(&cache);
            let stages = Arc::clone(&stages);

            tokio::spawn(async move {
                loop {
                    // Hold the receiver lock only while dequeuing so other
                    // workers keep pulling during long pipeline runs.
                    let job = { rx.lock().await.recv().await };
                    match job {
                        Some(job) => process(&store, &cache, stages.as_ref(), job).await,
                        None => {
                            info!(worker, "Job queue closed, worker exiting");
                            break;
                        }
                    }
                }
            });
        }

        Self { tx }
    }

    /// Enqueues a job; waits for queue space but never for processing.
    pub async fn submit(&self, job: ProcessingJob) -> Result<(), ProcessingJob> {
        self.tx.send(job).await.map_err(|e| e.0)
    }
}

async fn process(
    store: &JobStore,
    cache: &ResultCache,
    stages: &dyn PipelineStages,
    job: ProcessingJob,
) {
    let task_id = job.task_id;
    info!(%task_id, filename = %job.filename, "Processing task");

    match run_pipeline(store, cache, stages, &job).await {
        Ok(()) => info!(%task_id, "Task completed"),
        Err(err) => {
            error!(%task_id, error = %err, "Task failed");
            store.fail(task_id, err.to_string());
        }
    }

    // Cleanup runs on success and error alike.
    for path in [&job.video_path, &job.audio_path] {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(%task_id, path = %path.display(), error = %e, "Failed to remove transient file");
            }
        }
    }
}

async fn run_pipeline(
    store: &JobStore,
    cache: &ResultCache,
    stages: &dyn PipelineStages,
    job: &ProcessingJob,
) -> Result<(), StageError> {
    let id = job.task_id;

    store.set_status(id, TaskStatus::Converting);
    stages.convert(&job.video_path, &job.audio_path).await?;

    store.set_status(id, TaskStatus::Transcribing);
    let transcript = stages.transcribe(&job.audio_path).await?;
    // Downstream stages cannot produce anything meaningful from an empty
    // transcript, so this is a hard failure rather than an empty result.
    if transcript.text.trim().is_empty() {
        return Err(StageError::EmptyTranscript);
    }

    store.set_status(id, TaskStatus::Summarizing);
    let summary = stages.summarize(&transcript.text).await?;

    store.set_status(id, TaskStatus::GeneratingNotes);
    // Notes are best-effort enrichment: a failure degrades the notes field
    // but still completes the task. The transcript is the load-bearing
    // artifact.
    let notes = match stages.generate_notes(&transcript.text).await {
        Ok(notes) => notes,
        Err(e) => {
            warn!(task_id = %id, error = %e, "Notes generation failed, degrading");
            format!("Error generating notes: {e}")
        }
    };

    let bundle = ResultBundle {
        transcript,
        summary,
        notes,
        flashcards: Vec::new(),
        mindmap: None,
    };

    cache.store(&job.filename, &bundle).await;
    store.complete(id, bundle);
    Ok(())
}
