//! Engine tying canonicalization, scoring and gap analysis to one table snapshot

use crate::config::{Config, RecommendationConfig, ScoringConfig};
use crate::input::records::{CandidateProfile, JobPosting};
use crate::processing::canonicalizer::{Canonicalizer, SkillToken};
use crate::processing::fuzzy_matcher::{self, BestMatch};
use crate::processing::gap_analyzer::{GapAnalyzer, SkillGap, TrainingRecommendation};
use crate::processing::match_scorer::{MatchResult, MatchScorer};
use crate::reference::tables::ReferenceTables;
use log::info;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Stateless entry point for every operation. Cheap to clone and safe to
/// share across threads; every call sees the table snapshot it was built with.
#[derive(Debug, Clone)]
pub struct SkillEngine {
    canonicalizer: Canonicalizer,
    scorer: MatchScorer,
    gap_analyzer: GapAnalyzer,
}

/// One job scored against a profile, in ranking order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedJob {
    /// Position of the job in the input list
    pub index: usize,
    pub job_id: Option<String>,
    pub title: String,
    pub result: MatchResult,
}

/// One candidate scored against a job, in ranking order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub index: usize,
    pub candidate_id: Option<String>,
    pub result: MatchResult,
}

/// Gaps plus the training that closes them
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GapReport {
    pub gaps: Vec<SkillGap>,
    pub recommendations: Vec<TrainingRecommendation>,
}

impl SkillEngine {
    pub fn new(tables: Arc<ReferenceTables>, scoring: ScoringConfig, recommendations: RecommendationConfig) -> Self {
        let canonicalizer = Canonicalizer::new(tables);
        Self {
            scorer: MatchScorer::new(canonicalizer.clone(), scoring),
            gap_analyzer: GapAnalyzer::new(canonicalizer.clone(), recommendations),
            canonicalizer,
        }
    }

    pub fn from_config(tables: Arc<ReferenceTables>, config: &Config) -> Self {
        Self::new(tables, config.scoring.clone(), config.recommendations.clone())
    }

    /// Engine over the embedded tables with default settings
    pub fn with_defaults() -> crate::Result<Self> {
        let tables = Arc::new(ReferenceTables::embedded()?);
        Ok(Self::new(tables, ScoringConfig::default(), RecommendationConfig::default()))
    }

    pub fn tables(&self) -> &Arc<ReferenceTables> {
        self.canonicalizer.tables()
    }

    pub fn canonicalize(&self, raw: &str) -> SkillToken {
        self.canonicalizer.canonicalize(raw)
    }

    pub fn categorize(&self, token: &SkillToken) -> BTreeSet<String> {
        self.canonicalizer.categorize(token)
    }

    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        fuzzy_matcher::similarity(a, b)
    }

    pub fn best_match<'a, S: AsRef<str>>(&self, skill: &str, candidates: &'a [S]) -> BestMatch<'a> {
        fuzzy_matcher::best_match(skill, candidates)
    }

    pub fn score_skills<U: AsRef<str>, R: AsRef<str>>(&self, user_skills: &[U], required_skills: &[R]) -> u8 {
        self.scorer.score_skills(user_skills, required_skills)
    }

    pub fn compute_job_match(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult {
        self.scorer.compute_job_match(profile, job)
    }

    pub fn analyze_skill_gaps(&self, profile: &CandidateProfile, jobs: &[JobPosting]) -> Vec<SkillGap> {
        self.gap_analyzer.analyze_skill_gaps(profile, jobs)
    }

    pub fn recommend_training(&self, gaps: &[SkillGap]) -> Vec<TrainingRecommendation> {
        self.gap_analyzer.recommend_training(gaps)
    }

    /// Gap analysis followed by recommendations
    pub fn gap_report(&self, profile: &CandidateProfile, jobs: &[JobPosting]) -> GapReport {
        let gaps = self.analyze_skill_gaps(profile, jobs);
        let recommendations = self.recommend_training(&gaps);
        GapReport { gaps, recommendations }
    }

    /// Score a profile against many jobs in parallel, best match first
    pub fn rank_jobs(&self, profile: &CandidateProfile, jobs: &[JobPosting]) -> Vec<RankedJob> {
        self.rank_jobs_with(profile, jobs, |_| {})
    }

    /// Like `rank_jobs`, calling `on_scored` as each job finishes
    pub fn rank_jobs_with<F>(&self, profile: &CandidateProfile, jobs: &[JobPosting], on_scored: F) -> Vec<RankedJob>
    where
        F: Fn(&RankedJob) + Sync + Send,
    {
        let start = Instant::now();
        let mut ranked: Vec<RankedJob> = jobs
            .par_iter()
            .enumerate()
            .map(|(index, job)| {
                let entry = RankedJob {
                    index,
                    job_id: job.id.clone(),
                    title: job.label().to_string(),
                    result: self.compute_job_match(profile, job),
                };
                on_scored(&entry);
                entry
            })
            .collect();

        // collect keeps input order, so the stable sort breaks ties by position
        ranked.sort_by_key(|entry| std::cmp::Reverse(entry.result.match_score));
        info!("Ranked {} jobs in {}ms", ranked.len(), start.elapsed().as_millis());
        ranked
    }

    /// Score many profiles against one job in parallel, best match first
    pub fn rank_candidates(&self, job: &JobPosting, profiles: &[CandidateProfile]) -> Vec<RankedCandidate> {
        let start = Instant::now();
        let mut ranked: Vec<RankedCandidate> = profiles
            .par_iter()
            .enumerate()
            .map(|(index, profile)| RankedCandidate {
                index,
                candidate_id: profile.id.clone(),
                result: self.compute_job_match(profile, job),
            })
            .collect();

        ranked.sort_by_key(|entry| std::cmp::Reverse(entry.result.match_score));
        info!("Ranked {} candidates in {}ms", ranked.len(), start.elapsed().as_millis());
        ranked
    }
}
