use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A login session.
///
/// The opaque token travels as a bearer credential; a request presenting an
/// unknown or missing token is treated as anonymous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}
