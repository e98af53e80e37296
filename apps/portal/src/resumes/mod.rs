//! Resume submission: file checks and the create/update form.

pub mod form;
pub mod upload;

pub use form::{ClearAction, ExistingResume, ResumeForm, SubmitOutcome};
pub use upload::{check_resume_file, FileRejection};

/// Storage key every resume binary is uploaded under.
pub const RESUME_STORAGE_KEY: &str = "resumes";

/// Where a successful new submission navigates to.
pub const RESUMES_PATH: &str = "/resumes";
