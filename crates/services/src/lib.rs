pub mod auth;
pub mod cache;
pub mod dao;
pub mod jobs;
pub mod pipeline;

pub use auth::AuthService;
pub use cache::ResultCache;
pub use dao::*;
pub use jobs::{JobRunner, JobStore};
pub use pipeline::{LiveStages, PipelineStages, StageError};
