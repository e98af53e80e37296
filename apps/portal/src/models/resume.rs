use serde::{Deserialize, Serialize};

/// A stored resume submission as returned by the upsert call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub role: String,
    pub experience: String,
    pub location: String,
    #[serde(default)]
    pub additional_info: Option<String>,
}
