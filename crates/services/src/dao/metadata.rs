use bson::{DateTime, doc, oid::ObjectId};
use lectio_db::models::{ChatMessage, LectureMetadata, StoredFlashcard};
use mongodb::Database;

use super::base::{BaseDao, DaoResult};

pub struct MetadataDao {
    pub base: BaseDao<LectureMetadata>,
}

impl MetadataDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, LectureMetadata::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        url_path: String,
        transcript: String,
        notes: String,
    ) -> DaoResult<LectureMetadata> {
        let now = DateTime::now();
        let metadata = LectureMetadata {
            id: None,
            url_path,
            transcript,
            notes,
            chat: Vec::new(),
            flashcards: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&metadata).await?;
        self.base.find_by_id(id).await
    }

    pub async fn add_chat_message(
        &self,
        metadata_id: ObjectId,
        question: String,
        answer: String,
    ) -> DaoResult<bool> {
        let entry = ChatMessage {
            question,
            answer,
            timestamp: DateTime::now(),
        };
        self.base
            .update_by_id(
                metadata_id,
                doc! { "$push": { "chat": bson::to_bson(&entry)? } },
            )
            .await
    }

    pub async fn add_flashcard(
        &self,
        metadata_id: ObjectId,
        question: String,
        answer: String,
    ) -> DaoResult<bool> {
        let card = StoredFlashcard {
            question,
            answer,
            last_reviewed: DateTime::now(),
        };
        self.base
            .update_by_id(
                metadata_id,
                doc! { "$push": { "flashcards": bson::to_bson(&card)? } },
            )
            .await
    }
}
