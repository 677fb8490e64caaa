use bson::{DateTime, doc, oid::ObjectId};
use lectio_db::models::{User, UserRole};
use mongodb::Database;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        firstname: String,
        lastname: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            firstname,
            lastname,
            email: email.to_lowercase(),
            password_hash: Some(password_hash),
            profile_pic: "default-profile.png".to_string(),
            role,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email.to_lowercase() })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn push_history(&self, user_id: ObjectId, history_id: ObjectId) -> DaoResult<bool> {
        self.base
            .update_by_id(user_id, doc! { "$push": { "history": history_id } })
            .await
    }
}
