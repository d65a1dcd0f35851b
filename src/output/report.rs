//! Report structures wrapping engine results for presentation

use crate::input::records::{CandidateProfile, JobPosting};
use crate::processing::engine::{GapReport, RankedCandidate, RankedJob};
use crate::processing::gap_analyzer::{SkillGap, TrainingRecommendation};
use crate::processing::match_scorer::MatchResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the formatters know how to render
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Match(MatchReport),
    Gaps(GapAnalysisReport),
    Ranking(RankingReport),
    Candidates(CandidateRankingReport),
}

impl Report {
    pub fn metadata(&self) -> &ReportMetadata {
        match self {
            Report::Match(report) => &report.metadata,
            Report::Gaps(report) => &report.metadata,
            Report::Ranking(report) => &report.metadata,
            Report::Candidates(report) => &report.metadata,
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Version of this tool
    pub tool_version: String,

    /// Version of the reference tables used
    pub tables_version: String,

    /// Total processing time
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(tables_version: &str, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            tables_version: tables_version.to_string(),
            processing_time_ms,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub candidate: String,
    pub job: String,
    pub result: MatchResult,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysisReport {
    pub candidate: String,
    pub jobs: Vec<String>,
    pub gaps: Vec<SkillGap>,
    pub recommendations: Vec<TrainingRecommendation>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingReport {
    pub candidate: String,
    pub ranked: Vec<RankedJob>,
    pub metadata: ReportMetadata,
}

/// Candidates ranked for a single job
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRankingReport {
    pub job: String,
    pub ranked: Vec<RankedCandidate>,
    pub metadata: ReportMetadata,
}

fn candidate_label(profile: &CandidateProfile) -> String {
    profile.id.clone().unwrap_or_else(|| "candidate".to_string())
}

impl MatchReport {
    pub fn new(profile: &CandidateProfile, job: &JobPosting, result: MatchResult, metadata: ReportMetadata) -> Self {
        Self {
            candidate: candidate_label(profile),
            job: job.label().to_string(),
            result,
            metadata,
        }
    }
}

impl GapAnalysisReport {
    pub fn new(profile: &CandidateProfile, jobs: &[JobPosting], report: GapReport, metadata: ReportMetadata) -> Self {
        Self {
            candidate: candidate_label(profile),
            jobs: jobs.iter().map(|job| job.label().to_string()).collect(),
            gaps: report.gaps,
            recommendations: report.recommendations,
            metadata,
        }
    }
}

impl RankingReport {
    pub fn new(profile: &CandidateProfile, ranked: Vec<RankedJob>, metadata: ReportMetadata) -> Self {
        Self {
            candidate: candidate_label(profile),
            ranked,
            metadata,
        }
    }
}

impl CandidateRankingReport {
    pub fn new(job: &JobPosting, ranked: Vec<RankedCandidate>, metadata: ReportMetadata) -> Self {
        Self {
            job: job.label().to_string(),
            ranked,
            metadata,
        }
    }
}
