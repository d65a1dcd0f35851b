//! Skill canonicalization, matching, scoring and gap analysis

pub mod canonicalizer;
pub mod engine;
pub mod fuzzy_matcher;
pub mod gap_analyzer;
pub mod match_scorer;
