use lectio_config::Settings;
use lectio_services::{
    AuthService, JobRunner, JobStore, ResultCache,
    dao::{history::HistoryDao, metadata::MetadataDao, user::UserDao},
    pipeline::{LiveStages, PipelineStages},
};
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub metadata: Arc<MetadataDao>,
    pub history: Arc<HistoryDao>,
    pub jobs: Arc<JobStore>,
    pub cache: Arc<ResultCache>,
    pub stages: Arc<dyn PipelineStages>,
    pub runner: JobRunner,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let stages: Arc<dyn PipelineStages> = Arc::new(LiveStages::new(&settings));
        Self::with_stages(db, settings, stages)
    }

    /// Builds the state with caller-supplied pipeline stages. Tests use this
    /// to swap the external services for in-process mocks.
    pub fn with_stages(
        db: Database,
        settings: Settings,
        stages: Arc<dyn PipelineStages>,
    ) -> Self {
        let auth = Arc::new(AuthService::new());
        let users = Arc::new(UserDao::new(&db));
        let metadata = Arc::new(MetadataDao::new(&db));
        let history = Arc::new(HistoryDao::new(&db));
        let jobs = Arc::new(JobStore::new());
        let cache = Arc::new(ResultCache::new(settings.storage.cache_dir.clone()));
        let runner = JobRunner::spawn(
            &settings.jobs,
            Arc::clone(&jobs),
            Arc::clone(&cache),
            Arc::clone(&stages),
        );

        Self {
            db,
            settings,
            auth,
            users,
            metadata,
            history,
            jobs,
            cache,
            stages,
            runner,
        }
    }
}
