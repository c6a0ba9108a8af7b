use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A public news entry.
///
/// News items have no owner in the authorization sense: anyone, including
/// anonymous visitors, can read them. `date` is the publication date the
/// home listing sorts on (newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub date: DateTime<Utc>,
}

/// Input for publishing a news item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNewsInput {
    pub title: String,
    pub text: String,
    /// Publication date. Defaults to now.
    pub date: Option<DateTime<Utc>>,
}

/// A reader comment on one news item.
///
/// Owned by exactly one author; only the author may edit or delete it.
/// Comments under a news item are listed oldest-first by `created`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub news_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

/// The comment form as submitted (and as rendered back on the detail page).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Detail-page payload: the news item, its ordered comments, and — for
/// authenticated requesters only — an empty comment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsDetail {
    pub news: NewsItem,
    pub comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<CommentForm>,
}
