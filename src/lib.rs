//! Skill matching library: canonicalization, fuzzy matching, job scoring
//! and skill gap analysis over versioned reference tables

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod reference;

pub use config::Config;
pub use error::{Result, SkillMatchError};
pub use input::{CandidateProfile, JobPosting, UserSkill};
pub use processing::engine::SkillEngine;
pub use reference::{ReferenceTables, TableStore};
