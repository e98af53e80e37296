//! In-memory stand-ins for the remote seams, shared by unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::{
    AnswerCommentsInput, CreateCommentInput, CreateEncounterInput, CreateQuestionInput,
    EncounterRecord, PortalApi, QuestionsByFilterInput, ResumeUpsertInput,
};
use crate::errors::PortalError;
use crate::models::answer::{Answer, AnswerComment};
use crate::models::question::{AggregatedEncounters, Question, QuestionType};
use crate::models::resume::ResumeRecord;
use crate::models::Page;
use crate::state::PortalState;
use crate::storage::{FileStorage, FileUpload};

pub fn question(id: &str) -> Question {
    Question {
        id: id.to_string(),
        content: format!("Question {id}"),
        question_type: QuestionType::Coding,
        seen_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        received_count: 1,
        num_votes: 0,
        num_answers: 0,
        aggregated_question_encounters: AggregatedEncounters::default(),
    }
}

/// Serves two question pages chained by cursor and records every call.
/// Calls starting with one of `failing` are recorded, then answered with a 500.
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    pub failing: Vec<&'static str>,
}

impl FakeApi {
    pub fn failing(prefixes: &[&'static str]) -> Self {
        Self {
            failing: prefixes.to_vec(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), PortalError> {
        let fails = self.failing.iter().any(|p| call.starts_with(p));
        self.calls.lock().unwrap().push(call);
        if fails {
            return Err(PortalError::Api {
                status: 500,
                message: "INTERNAL_SERVER_ERROR: unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PortalApi for FakeApi {
    async fn get_questions_by_filter(
        &self,
        input: &QuestionsByFilterInput,
    ) -> Result<Page<Question>, PortalError> {
        self.record(format!("questions cursor={:?}", input.cursor))?;
        Ok(match input.cursor.as_deref() {
            None => Page::new(vec![question("q1"), question("q2")], Some("c2".to_string())),
            Some("c2") => Page::new(vec![question("q3")], None),
            Some(other) => panic!("unexpected cursor {other}"),
        })
    }

    async fn create_question(&self, input: &CreateQuestionInput) -> Result<Question, PortalError> {
        self.record(format!("create {}", input.content))?;
        Ok(question("new"))
    }

    async fn get_related_questions(&self, content: &str) -> Result<Vec<Question>, PortalError> {
        self.record(format!("related {content}"))?;
        Ok(vec![question("similar")])
    }

    async fn create_encounter(
        &self,
        input: &CreateEncounterInput,
    ) -> Result<EncounterRecord, PortalError> {
        self.record(format!("encounter {}", input.question_id))?;
        Ok(EncounterRecord {
            id: "e1".to_string(),
            question_id: input.question_id.clone(),
            seen_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
    }

    async fn get_answer_by_id(&self, answer_id: &str) -> Result<Answer, PortalError> {
        self.record(format!("answer {answer_id}"))?;
        Ok(Answer {
            id: answer_id.to_string(),
            content: "Answer".to_string(),
            user: "ada".to_string(),
            user_image: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            num_votes: 0,
        })
    }

    async fn get_answer_comments(
        &self,
        input: &AnswerCommentsInput,
    ) -> Result<Page<AnswerComment>, PortalError> {
        self.record(format!("comments {} cursor={:?}", input.answer_id, input.cursor))?;
        let comment = |id: &str| AnswerComment {
            id: id.to_string(),
            content: format!("Comment {id}"),
            user: "ada".to_string(),
            user_image: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            num_votes: 0,
        };
        Ok(match input.cursor.as_deref() {
            None => Page::new(vec![comment("k1")], Some("k-next".to_string())),
            _ => Page::new(vec![comment("k2")], None),
        })
    }

    async fn create_answer_comment(
        &self,
        input: &CreateCommentInput,
    ) -> Result<AnswerComment, PortalError> {
        self.record(format!("comment {} {}", input.answer_id, input.content))?;
        Ok(AnswerComment {
            id: "k-new".to_string(),
            content: input.content.clone(),
            user: "ada".to_string(),
            user_image: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            num_votes: 0,
        })
    }

    async fn upsert_resume(&self, input: &ResumeUpsertInput) -> Result<ResumeRecord, PortalError> {
        self.record(format!(
            "upsert {} {} {}",
            input.id.as_deref().unwrap_or("new"),
            input.title,
            input.url
        ))?;
        Ok(ResumeRecord {
            id: input.id.clone().unwrap_or_else(|| "r1".to_string()),
            title: input.title.clone(),
            url: input.url.clone(),
            role: input.role.clone(),
            experience: input.experience.clone(),
            location: input.location.clone(),
            additional_info: input.additional_info.clone(),
        })
    }
}

/// Storage that either succeeds with a fixed URL or fails, recording calls.
pub struct FakeStorage {
    pub fail: bool,
    pub uploads: Mutex<Vec<String>>,
}

impl FakeStorage {
    pub fn new(fail: bool) -> Self {
        Self {
            fail,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl FileStorage for FakeStorage {
    async fn upload(&self, key: &str, file: &FileUpload) -> Result<String, PortalError> {
        self.uploads
            .lock()
            .unwrap()
            .push(format!("{key}/{}", file.name));
        if self.fail {
            return Err(PortalError::Storage("bucket unavailable".to_string()));
        }
        Ok(format!("https://files.example/{key}/{}", file.name))
    }
}

pub fn state_with(api: Arc<FakeApi>, storage: Arc<FakeStorage>) -> PortalState {
    PortalState::new(api, storage, 3_000_000)
}
