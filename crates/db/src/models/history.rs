use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Links a user to a lecture they processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub metadata: ObjectId,
    pub timestamp: DateTime,
}

impl HistoryEntry {
    pub const COLLECTION: &'static str = "history";
}
