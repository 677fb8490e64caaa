use bson::{DateTime, oid::ObjectId};
use lectio_db::models::HistoryEntry;
use mongodb::Database;

use super::base::{BaseDao, DaoResult};

pub struct HistoryDao {
    pub base: BaseDao<HistoryEntry>,
}

impl HistoryDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, HistoryEntry::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        metadata_id: ObjectId,
    ) -> DaoResult<HistoryEntry> {
        let entry = HistoryEntry {
            id: None,
            user: user_id,
            metadata: metadata_id,
            timestamp: DateTime::now(),
        };

        let id = self.base.insert_one(&entry).await?;
        self.base.find_by_id(id).await
    }
}
