use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default = "default_profile_pic")]
    pub profile_pic: String,
    #[serde(default)]
    pub role: UserRole,
    /// History entry ids, most recent last.
    #[serde(default)]
    pub history: Vec<ObjectId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Student,
    Professor,
}

fn default_profile_pic() -> String {
    "default-profile.png".to_string()
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
