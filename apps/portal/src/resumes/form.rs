use tracing::{error, info};

use crate::api::{procedures, ResumeUpsertInput};
use crate::errors::{FieldError, PortalError};
use crate::models::resume::ResumeRecord;
use crate::resumes::upload::check_resume_file;
use crate::resumes::RESUME_STORAGE_KEY;
use crate::state::PortalState;
use crate::storage::FileUpload;

pub const GUIDELINES_REQUIRED: &str =
    "Please tick the checkbox after reading through the guidelines.";

/// Details of a resume being edited. Their presence makes the form an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingResume {
    pub resume_id: String,
    pub title: String,
    pub role: String,
    pub experience: String,
    pub location: String,
    pub additional_info: Option<String>,
    pub url: String,
}

impl From<&ResumeRecord> for ExistingResume {
    fn from(record: &ResumeRecord) -> Self {
        Self {
            resume_id: record.id.clone(),
            title: record.title.clone(),
            role: record.role.clone(),
            experience: record.experience.clone(),
            location: record.location.clone(),
            additional_info: record.additional_info.clone(),
            url: record.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// New resume stored; the caller navigates to [`crate::resumes::RESUMES_PATH`].
    Created(ResumeRecord),
    /// Existing resume updated; the caller closes the form.
    Updated(ResumeRecord),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearAction {
    /// Unsaved edits exist; ask before calling [`ResumeForm::reset`].
    Confirm,
    Close,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Fields {
    title: String,
    role: String,
    experience: String,
    location: String,
    additional_info: String,
    guidelines_accepted: bool,
}

impl Fields {
    fn from_existing(existing: Option<&ExistingResume>) -> Self {
        match existing {
            None => Self::default(),
            Some(e) => Self {
                title: e.title.clone(),
                role: e.role.clone(),
                experience: e.experience.clone(),
                location: e.location.clone(),
                additional_info: e.additional_info.clone().unwrap_or_default(),
                guidelines_accepted: false,
            },
        }
    }
}

/// Resume create/update form.
///
/// Submission uploads the file first (only when a new one was dropped) and
/// writes the metadata record with the returned URL. A failed upload stops
/// the submission before any record is written.
#[derive(Debug, Clone)]
pub struct ResumeForm {
    existing: Option<ExistingResume>,
    fields: Fields,
    file: Option<FileUpload>,
    file_dirty: bool,
    dirty: bool,
    file_error: Option<String>,
    loading: bool,
    max_bytes: u64,
}

impl ResumeForm {
    pub fn new(max_bytes: u64) -> Self {
        Self::with_existing(None, max_bytes)
    }

    pub fn edit(existing: ExistingResume, max_bytes: u64) -> Self {
        Self::with_existing(Some(existing), max_bytes)
    }

    fn with_existing(existing: Option<ExistingResume>, max_bytes: u64) -> Self {
        Self {
            fields: Fields::from_existing(existing.as_ref()),
            existing,
            file: None,
            file_dirty: false,
            dirty: false,
            file_error: None,
            loading: false,
            max_bytes,
        }
    }

    pub fn is_new(&self) -> bool {
        self.existing.is_none()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn file(&self) -> Option<&FileUpload> {
        self.file.as_ref()
    }

    /// Inline error shown under the drop zone.
    pub fn file_error(&self) -> Option<&str> {
        self.file_error.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }

    pub fn set_title(&mut self, value: &str) {
        self.fields.title = value.trim().to_string();
        self.dirty = true;
    }

    pub fn set_role(&mut self, value: &str) {
        self.fields.role = value.trim().to_string();
        self.dirty = true;
    }

    pub fn set_experience(&mut self, value: &str) {
        self.fields.experience = value.trim().to_string();
        self.dirty = true;
    }

    pub fn set_location(&mut self, value: &str) {
        self.fields.location = value.trim().to_string();
        self.dirty = true;
    }

    pub fn set_additional_info(&mut self, value: &str) {
        self.fields.additional_info = value.trim().to_string();
        self.dirty = true;
    }

    pub fn set_guidelines_accepted(&mut self, accepted: bool) {
        self.fields.guidelines_accepted = accepted;
        self.dirty = true;
    }

    /// Handles files dropped on the upload zone. A rejected drop keeps the
    /// previously accepted file.
    pub fn on_file_drop(&mut self, files: Vec<FileUpload>) -> Result<(), PortalError> {
        match check_resume_file(files, self.max_bytes) {
            Ok(file) => {
                self.file = Some(file);
                self.file_dirty = true;
                self.dirty = true;
                self.file_error = None;
                Ok(())
            }
            Err(rejection) => {
                let message = rejection.to_string();
                self.file_error = Some(message.clone());
                Err(PortalError::FileRejected(message))
            }
        }
    }

    pub fn validate(&self) -> Result<(), PortalError> {
        let mut errors = Vec::new();
        let required = [
            ("title", &self.fields.title, "Title cannot be empty"),
            ("role", &self.fields.role, "Role cannot be empty"),
            ("experience", &self.fields.experience, "Experience cannot be empty"),
            ("location", &self.fields.location, "Location cannot be empty"),
        ];
        for (field, value, message) in required {
            if value.is_empty() {
                errors.push(FieldError::new(field, message));
            }
        }
        if self.is_new() {
            if self.file.is_none() {
                errors.push(FieldError::new("file", "Resume cannot be empty!"));
            }
            if !self.fields.guidelines_accepted {
                errors.push(FieldError::new("isChecked", GUIDELINES_REQUIRED));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PortalError::Validation(errors))
        }
    }

    pub async fn submit(&mut self, state: &PortalState) -> Result<SubmitOutcome, PortalError> {
        self.validate()?;
        self.loading = true;
        let result = self.upload_and_upsert(state).await;
        self.loading = false;

        let record = result?;
        let created = self.is_new();
        // The saved record is the baseline for later saves and resets.
        self.existing = Some(ExistingResume::from(&record));
        self.file_dirty = false;
        self.dirty = false;
        if created {
            state.cache.invalidate(procedures::FIND_ALL_RESUMES);
            info!("Submitted resume {}", record.id);
            Ok(SubmitOutcome::Created(record))
        } else {
            info!("Updated resume {}", record.id);
            Ok(SubmitOutcome::Updated(record))
        }
    }

    async fn upload_and_upsert(&self, state: &PortalState) -> Result<ResumeRecord, PortalError> {
        let mut url = self
            .existing
            .as_ref()
            .map(|e| e.url.clone())
            .unwrap_or_default();

        if self.file_dirty {
            if let Some(file) = &self.file {
                url = state
                    .storage
                    .upload(RESUME_STORAGE_KEY, file)
                    .await
                    .map_err(|e| {
                        error!("Resume upload failed: {e}");
                        e
                    })?;
            }
        }

        let additional_info = Some(self.fields.additional_info.clone()).filter(|s| !s.is_empty());
        let input = ResumeUpsertInput {
            id: self.existing.as_ref().map(|e| e.resume_id.clone()),
            title: self.fields.title.clone(),
            role: self.fields.role.clone(),
            experience: self.fields.experience.clone(),
            location: self.fields.location.clone(),
            additional_info,
            url,
        };
        state.api.upsert_resume(&input).await.map_err(|e| {
            error!("Resume upsert failed: {e}");
            e
        })
    }

    pub fn on_clear(&self) -> ClearAction {
        if self.dirty {
            ClearAction::Confirm
        } else {
            ClearAction::Close
        }
    }

    /// Discards edits and the pending file, back to the opening values.
    pub fn reset(&mut self) {
        self.fields = Fields::from_existing(self.existing.as_ref());
        self.file = None;
        self.file_dirty = false;
        self.dirty = false;
        self.file_error = None;
    }
}
