use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: String,
    pub content: String,
    pub user: String,
    #[serde(default)]
    pub user_image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub num_votes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerComment {
    pub id: String,
    pub content: String,
    pub user: String,
    #[serde(default)]
    pub user_image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub num_votes: i32,
}
