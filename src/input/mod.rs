//! Input records and file loading
//! Handles record file detection, parsing and caching

pub mod file_detector;
pub mod manager;
pub mod records;

pub use records::{CandidateProfile, JobPosting, UserSkill};
