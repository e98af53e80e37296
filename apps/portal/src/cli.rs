//! Command-line arguments for the portal client.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "portal",
    version,
    about = "Interview portal client - browse questions, comment, contribute and submit resumes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse questions for a filter URL, e.g. "/questions/browse?companies=1_Google".
    Browse(BrowseArgs),

    /// Show an answer with its comments, optionally posting one.
    Comments(CommentsArgs),

    /// Check a question draft against similar questions and contribute it.
    Contribute(ContributeArgs),

    /// Upload a PDF resume and create or update its record.
    SubmitResume(SubmitResumeArgs),

    /// Search the job title list.
    JobTitles {
        /// Case-insensitive label fragment (empty lists every title).
        #[arg(default_value = "")]
        query: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortOrderArg {
    Asc,
    Desc,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortTypeArg {
    Top,
    New,
}

#[derive(Parser)]
pub struct BrowseArgs {
    /// Page location holding the filter query string.
    #[arg(long, default_value = "/questions/browse")]
    pub url: String,

    /// How many pages to load ("load more" clicks plus one).
    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Toggle a company on, as `{id}_{label}`.
    #[arg(long = "company", value_name = "SLUG")]
    pub companies: Vec<String>,

    /// Toggle a role slug on.
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    #[arg(long, value_enum)]
    pub sort_order: Option<SortOrderArg>,

    #[arg(long, value_enum)]
    pub sort_type: Option<SortTypeArg>,

    /// Drop every filter before loading.
    #[arg(long)]
    pub clear: bool,
}

#[derive(Parser)]
pub struct CommentsArgs {
    #[arg(value_name = "ANSWER_ID")]
    pub answer_id: String,

    #[arg(long, value_enum, default_value = "desc")]
    pub sort_order: SortOrderArg,

    #[arg(long, value_enum, default_value = "new")]
    pub sort_type: SortTypeArg,

    #[arg(long, default_value_t = 1)]
    pub pages: u32,

    /// Post this comment before listing.
    #[arg(long, value_name = "TEXT")]
    pub post: Option<String>,
}

#[derive(Parser)]
pub struct ContributeArgs {
    /// Question prompt.
    #[arg(long)]
    pub content: String,

    /// CODING, SYSTEM_DESIGN, BEHAVIORAL or THEORY.
    #[arg(long = "type", default_value = "CODING")]
    pub question_type: String,

    #[arg(long = "company", value_name = "COMPANY_ID")]
    pub company_id: String,

    #[arg(long)]
    pub role: String,

    /// Location as `countryId-stateId-cityId-id-label-value`.
    #[arg(long)]
    pub location: String,

    /// Month seen as YYYY-MM (defaults to the current month).
    #[arg(long, value_name = "YYYY-MM")]
    pub seen: Option<String>,

    /// Confirm the question is new and submit it after the similarity check.
    #[arg(long, conflicts_with = "encounter")]
    pub confirm_new: bool,

    /// Record an encounter of this existing question instead of creating one.
    #[arg(long, value_name = "QUESTION_ID")]
    pub encounter: Option<String>,
}

#[derive(Parser)]
pub struct SubmitResumeArgs {
    /// PDF to upload. Optional when updating an existing resume.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub role: String,

    #[arg(long)]
    pub experience: String,

    #[arg(long)]
    pub location: String,

    #[arg(long)]
    pub additional_info: Option<String>,

    /// Tick "I have read and will follow the guidelines stated."
    #[arg(long)]
    pub accept_guidelines: bool,

    /// Update this resume instead of creating one.
    #[arg(long, value_name = "RESUME_ID", requires = "url")]
    pub resume_id: Option<String>,

    /// Current file URL of the resume being updated.
    #[arg(long)]
    pub url: Option<String>,
}
