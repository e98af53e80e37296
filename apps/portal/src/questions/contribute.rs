//! Contribute-a-question flow with the similar-question duplicate check.

use chrono::{Datelike, NaiveDate};
use serde_json::json;
use tracing::{info, warn};

use crate::api::{procedures, CreateEncounterInput, CreateQuestionInput, EncounterRecord};
use crate::errors::{FieldError, PortalError};
use crate::models::question::{Location, Question, QuestionType};
use crate::state::PortalState;

pub const CONFIRM_NEW_LABEL: &str = "I have checked that my question is new";
pub const CONFIRM_NEW_LABEL_STALE: &str =
    "I have checked that my question is new (Refresh similar questions to proceed)";

/// Where the draft stands relative to the last similar-question lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateCheck {
    /// No lookup has been run.
    Idle,
    /// Results arrived for exactly the current draft.
    Checked { content: String },
    /// The draft changed after the lookup ran against `last_checked`.
    Stale { last_checked: String },
}

/// Tracks the draft text, the duplicate-check state and the
/// "my question is new" confirmation that depends on it.
#[derive(Debug, Clone)]
pub struct SimilarQuestionCheck {
    draft: String,
    state: DuplicateCheck,
    /// Text of the lookup in flight, if any.
    pending: Option<String>,
    similar: Option<Vec<Question>>,
    confirmed_new: bool,
}

impl Default for SimilarQuestionCheck {
    fn default() -> Self {
        Self {
            draft: String::new(),
            state: DuplicateCheck::Idle,
            pending: None,
            similar: None,
            confirmed_new: false,
        }
    }
}

impl SimilarQuestionCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn state(&self) -> &DuplicateCheck {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Results of the last completed lookup.
    pub fn similar_questions(&self) -> Option<&[Question]> {
        self.similar.as_deref()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text == self.draft {
            return;
        }
        self.draft = text;
        self.confirmed_new = false;
        if let DuplicateCheck::Checked { content } = &self.state {
            self.state = DuplicateCheck::Stale {
                last_checked: content.clone(),
            };
        }
    }

    /// A lookup is only useful when the draft has not been checked yet.
    pub fn can_refresh(&self) -> bool {
        !self.draft.trim().is_empty() && !self.is_confirmation_enabled()
    }

    /// Starts a lookup for the current draft. Returns the text to look up.
    /// The state only becomes `Checked` once results for it arrive.
    pub fn refresh(&mut self) -> Option<String> {
        if !self.can_refresh() {
            return None;
        }
        self.pending = Some(self.draft.clone());
        self.pending.clone()
    }

    /// Accepts lookup results computed for `content`.
    /// Results for anything but the pending lookup of the current draft are dropped.
    pub fn receive_results(&mut self, content: &str, results: Vec<Question>) -> bool {
        if self.pending.as_deref() != Some(content) || self.draft != content {
            warn!("Discarding similar-question results for outdated draft text");
            return false;
        }
        self.pending = None;
        self.state = DuplicateCheck::Checked {
            content: content.to_string(),
        };
        self.similar = Some(results);
        self.confirmed_new = false;
        true
    }

    /// Abandons the pending lookup for `content`, leaving the state as it was.
    pub fn lookup_failed(&mut self, content: &str) {
        if self.pending.as_deref() == Some(content) {
            self.pending = None;
        }
    }

    pub fn is_confirmation_enabled(&self) -> bool {
        matches!(&self.state, DuplicateCheck::Checked { content } if *content == self.draft)
    }

    pub fn confirmation_label(&self) -> &'static str {
        if self.is_confirmation_enabled() {
            CONFIRM_NEW_LABEL
        } else {
            CONFIRM_NEW_LABEL_STALE
        }
    }

    /// Ticks or clears the confirmation. Ignored while the control is disabled.
    pub fn set_confirmed_new(&mut self, confirmed: bool) -> bool {
        if !self.is_confirmation_enabled() {
            return false;
        }
        self.confirmed_new = confirmed;
        true
    }

    pub fn is_confirmed_new(&self) -> bool {
        self.confirmed_new && self.is_confirmation_enabled()
    }

    /// Refreshes and fetches similar questions for the current draft.
    pub async fn run(&mut self, state: &PortalState) -> Result<bool, PortalError> {
        let Some(content) = self.refresh() else {
            return Ok(false);
        };
        let results = state
            .cache
            .fetch(
                procedures::GET_RELATED_QUESTIONS,
                &json!({ "content": content }),
                || state.api.get_related_questions(&content),
            )
            .await;
        match results {
            Ok(results) => Ok(self.receive_results(&content, results)),
            Err(e) => {
                self.lookup_failed(&content);
                Err(e)
            }
        }
    }
}

/// Company, role, location and month of a reported encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncounterDetails {
    pub company_id: String,
    pub role: String,
    pub location: Location,
    pub seen_at: NaiveDate,
}

/// Records that the contributor saw an existing question instead of adding a new one.
pub async fn record_encounter(
    state: &PortalState,
    question_id: &str,
    details: &EncounterDetails,
) -> Result<EncounterRecord, PortalError> {
    let mut errors = Vec::new();
    if details.company_id.trim().is_empty() {
        errors.push(FieldError::new("company", "Company is required"));
    }
    if details.role.trim().is_empty() {
        errors.push(FieldError::new("role", "Role is required"));
    }
    if !errors.is_empty() {
        return Err(PortalError::Validation(errors));
    }

    let record = state
        .api
        .create_encounter(&CreateEncounterInput {
            question_id: question_id.to_string(),
            company_id: details.company_id.clone(),
            role: details.role.clone(),
            country_id: details.location.country_id.clone(),
            state_id: details.location.state_id.clone(),
            city_id: details.location.city_id.clone(),
            seen_at: start_of_month(details.seen_at),
        })
        .await?;

    state.cache.invalidate(procedures::GET_AGGREGATED_ENCOUNTERS);
    state.cache.invalidate(procedures::GET_QUESTION_BY_ID);
    info!("Recorded encounter {} for question {question_id}", record.id);
    Ok(record)
}

/// The contribute form. Field setters are the only way state changes.
#[derive(Debug, Clone)]
pub struct ContributeQuestionForm {
    question_type: QuestionType,
    check: SimilarQuestionCheck,
    location: Option<Location>,
    seen_at: NaiveDate,
    company_id: Option<String>,
    role: Option<String>,
}

impl ContributeQuestionForm {
    /// Empty form; the seen-at month defaults to the month of `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            question_type: QuestionType::Coding,
            check: SimilarQuestionCheck::new(),
            location: None,
            seen_at: start_of_month(today),
            company_id: None,
            role: None,
        }
    }

    pub fn check(&self) -> &SimilarQuestionCheck {
        &self.check
    }

    pub fn check_mut(&mut self) -> &mut SimilarQuestionCheck {
        &mut self.check
    }

    pub fn seen_at(&self) -> NaiveDate {
        self.seen_at
    }

    pub fn set_question_type(&mut self, question_type: QuestionType) {
        self.question_type = question_type;
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.check.set_draft(content);
    }

    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }

    pub fn set_company(&mut self, company_id: Option<String>) {
        self.company_id = company_id;
    }

    pub fn set_role(&mut self, role: Option<String>) {
        self.role = role;
    }

    /// Month/year picker change. Rejects impossible months.
    pub fn set_month(&mut self, year: i32, month: u32) -> Result<(), PortalError> {
        let date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            PortalError::Validation(vec![FieldError::new("date", "Invalid month")])
        })?;
        self.seen_at = date;
        Ok(())
    }

    /// Builds the create request, or lists every missing field.
    pub fn validate(&self) -> Result<CreateQuestionInput, PortalError> {
        let mut errors = Vec::new();
        let content = self.check.draft().trim();
        if content.is_empty() {
            errors.push(FieldError::new("questionContent", "Question prompt is required"));
        }
        if self.location.is_none() {
            errors.push(FieldError::new("location", "Location is required"));
        }
        let company_id = non_empty(&self.company_id);
        if company_id.is_none() {
            errors.push(FieldError::new("company", "Company is required"));
        }
        let role = non_empty(&self.role);
        if role.is_none() {
            errors.push(FieldError::new("role", "Role is required"));
        }
        if !self.check.is_confirmed_new() {
            errors.push(FieldError::new(
                "checkedSimilar",
                "Confirm that your question is new after refreshing similar questions",
            ));
        }

        match (&self.location, company_id, role) {
            (Some(location), Some(company_id), Some(role)) if errors.is_empty() => {
                Ok(CreateQuestionInput {
                    company_id: company_id.to_string(),
                    content: content.to_string(),
                    question_type: self.question_type,
                    role: role.to_string(),
                    country_id: location.country_id.clone(),
                    state_id: location.state_id.clone(),
                    city_id: location.city_id.clone(),
                    seen_at: self.seen_at,
                })
            }
            _ => Err(PortalError::Validation(errors)),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.validate().is_ok()
    }

    /// Creates the question and invalidates every question list.
    pub async fn submit(&self, state: &PortalState) -> Result<Question, PortalError> {
        let input = self.validate()?;
        let question = state.api.create_question(&input).await?;
        state.cache.invalidate(procedures::GET_QUESTIONS_BY_FILTER);
        info!("Contributed question {}", question.id);
        Ok(question)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
