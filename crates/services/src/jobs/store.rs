use dashmap::DashMap;
use serde_json::Value;
use uuid::Uuid;

use super::task::{Flashcard, ResultBundle, Task, TaskStatus};

/// In-memory task map. Every mutation of a task happens under that task's
/// entry lock, so a reader never observes a half-applied update such as
/// `status == completed` with `results` still absent.
pub struct JobStore {
    tasks: DashMap<Uuid, Task>,
}

impl JobStore {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }

    /// Registers a fresh upload in the `uploaded` state.
    pub fn create(&self, filename: String) -> Task {
        let task = Task {
            id: Uuid::new_v4(),
            status: TaskStatus::Uploaded,
            filename,
            results: None,
            error: None,
            cached: false,
        };
        self.tasks.insert(task.id, task.clone());
        task
    }

    /// Registers a cache hit: the task is born completed, owning its own
    /// copy of the cached bundle.
    pub fn create_cached(&self, filename: String, bundle: ResultBundle) -> Task {
        let task = Task {
            id: Uuid::new_v4(),
            status: TaskStatus::Completed,
            filename,
            results: Some(bundle),
            error: None,
            cached: true,
        };
        self.tasks.insert(task.id, task.clone());
        task
    }

    pub fn get(&self, id: Uuid) -> Option<Task> {
        self.tasks.get(&id).map(|t| t.clone())
    }

    pub fn all(&self) -> Vec<Task> {
        self.tasks.iter().map(|t| t.clone()).collect()
    }

    pub fn set_status(&self, id: Uuid, status: TaskStatus) {
        if let Some(mut task) = self.tasks.get_mut(&id) {
            task.status = status;
        }
    }

    /// Status and results are set in one write.
    pub fn complete(&self, id: Uuid, bundle: ResultBundle) {
        if let Some(mut task) = self.tasks.get_mut(&id) {
            task.status = TaskStatus::Completed;
            task.results = Some(bundle);
            task.error = None;
        }
    }

    pub fn fail(&self, id: Uuid, error: String) {
        if let Some(mut task) = self.tasks.get_mut(&id) {
            task.status = TaskStatus::Error;
            task.error = Some(error);
            task.results = None;
        }
    }

    /// Overwrites the flashcards of a completed task's bundle. Returns the
    /// updated bundle, or None when the task or its results are missing.
    pub fn update_flashcards(&self, id: Uuid, flashcards: Vec<Flashcard>) -> Option<ResultBundle> {
        let mut task = self.tasks.get_mut(&id)?;
        let results = task.results.as_mut()?;
        results.flashcards = flashcards;
        Some(results.clone())
    }

    /// Overwrites the mindmap of a completed task's bundle. Returns the
    /// updated bundle, or None when the task or its results are missing.
    pub fn update_mindmap(&self, id: Uuid, mindmap: Value) -> Option<ResultBundle> {
        let mut task = self.tasks.get_mut(&id)?;
        let results = task.results.as_mut()?;
        results.mindmap = Some(mindmap);
        Some(results.clone())
    }
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new()
    }
}
