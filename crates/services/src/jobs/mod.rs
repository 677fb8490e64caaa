pub mod runner;
pub mod store;
pub mod task;

pub use runner::{JobRunner, ProcessingJob};
pub use store::JobStore;
pub use task::{Flashcard, ResultBundle, Task, TaskStatus, Transcript};
