//! Typed boundary to the portal's data layer.
//!
//! All remote reads and writes go through [`PortalApi`]. The wire format
//! belongs to the remote service; [`http::HttpPortalApi`] is the client
//! for its JSON-over-HTTP procedures.

pub mod http;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::PortalError;
use crate::models::answer::{Answer, AnswerComment};
use crate::models::question::{Question, QuestionType, SortOrder, SortType};
use crate::models::resume::ResumeRecord;
use crate::models::Page;

pub mod procedures {
    pub const GET_QUESTIONS_BY_FILTER: &str = "questions.questions.getQuestionsByFilter";
    pub const CREATE_QUESTION: &str = "questions.questions.user.create";
    pub const GET_RELATED_QUESTIONS: &str = "questions.questions.getRelatedQuestions";
    pub const GET_QUESTION_BY_ID: &str = "questions.questions.getQuestionById";
    pub const CREATE_ENCOUNTER: &str = "questions.questions.encounters.user.create";
    pub const GET_AGGREGATED_ENCOUNTERS: &str =
        "questions.questions.encounters.getAggregatedEncounters";
    pub const GET_ANSWER_BY_ID: &str = "questions.answers.getAnswerById";
    pub const GET_ANSWER_COMMENTS: &str = "questions.answers.comments.getAnswerComments";
    pub const CREATE_ANSWER_COMMENT: &str = "questions.answers.comments.user.create";
    pub const UPSERT_RESUME: &str = "resumes.resume.user.upsert";
    pub const FIND_ALL_RESUMES: &str = "resumes.resume.findAll";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsByFilterInput {
    pub city_ids: Vec<String>,
    pub company_ids: Vec<String>,
    pub country_ids: Vec<String>,
    pub state_ids: Vec<String>,
    pub question_types: Vec<QuestionType>,
    pub roles: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    pub sort_order: SortOrder,
    pub sort_type: SortType,
    pub limit: u32,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionInput {
    pub company_id: String,
    pub content: String,
    pub question_type: QuestionType,
    pub role: String,
    pub country_id: String,
    pub state_id: Option<String>,
    pub city_id: Option<String>,
    pub seen_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEncounterInput {
    pub question_id: String,
    pub company_id: String,
    pub role: String,
    pub country_id: String,
    pub state_id: Option<String>,
    pub city_id: Option<String>,
    pub seen_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerCommentsInput {
    pub answer_id: String,
    pub sort_order: SortOrder,
    pub sort_type: SortType,
    pub limit: u32,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    pub answer_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpsertInput {
    /// Present when updating an existing submission.
    pub id: Option<String>,
    pub title: String,
    pub role: String,
    pub experience: String,
    pub location: String,
    pub additional_info: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterRecord {
    pub id: String,
    pub question_id: String,
    pub seen_at: DateTime<Utc>,
}

/// Remote operations the portal front end consumes.
/// Implementations report transport and server failures as [`PortalError`].
#[async_trait]
pub trait PortalApi: Send + Sync {
    async fn get_questions_by_filter(
        &self,
        input: &QuestionsByFilterInput,
    ) -> Result<Page<Question>, PortalError>;

    async fn create_question(&self, input: &CreateQuestionInput) -> Result<Question, PortalError>;

    async fn get_related_questions(&self, content: &str) -> Result<Vec<Question>, PortalError>;

    async fn create_encounter(
        &self,
        input: &CreateEncounterInput,
    ) -> Result<EncounterRecord, PortalError>;

    async fn get_answer_by_id(&self, answer_id: &str) -> Result<Answer, PortalError>;

    async fn get_answer_comments(
        &self,
        input: &AnswerCommentsInput,
    ) -> Result<Page<AnswerComment>, PortalError>;

    async fn create_answer_comment(
        &self,
        input: &CreateCommentInput,
    ) -> Result<AnswerComment, PortalError>;

    async fn upsert_resume(&self, input: &ResumeUpsertInput) -> Result<ResumeRecord, PortalError>;
}
