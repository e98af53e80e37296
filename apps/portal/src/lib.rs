//! Client core of the interview portal: URL-persisted question filters,
//! the contribute flow, answer comments and resume submission.

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod filters;
pub mod job_titles;
pub mod models;
pub mod pagination;
pub mod questions;
pub mod resumes;
pub mod state;
pub mod storage;

#[cfg(test)]
mod test_support;
