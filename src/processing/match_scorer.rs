//! Skill match scoring for one candidate against one job

use crate::config::ScoringConfig;
use crate::input::records::{CandidateProfile, JobPosting};
use crate::processing::canonicalizer::{Canonicalizer, SkillToken};
use crate::processing::fuzzy_matcher::best_match;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Score returned for location and salary when either side is unknown
const NEUTRAL_SCORE: u8 = 50;

/// A required skill covered by a similar, non-identical user skill
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialMatch {
    pub skill: SkillToken,
    pub matched_against: SkillToken,
    pub score: f64,
}

/// Itemized fit of one profile against one job. `match_score` is the skill
/// score only; the auxiliary sub-scores are left for the caller to blend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_score: u8,
    pub matched_skills: Vec<SkillToken>,
    pub missing_skills: Vec<SkillToken>,
    pub partial_matches: Vec<PartialMatch>,
    pub skills_match: u8,
    pub experience_match: u8,
    pub location_match: u8,
    pub salary_match: u8,
}

/// Intermediate skill breakdown shared by `score_skills` and `compute_job_match`
#[derive(Debug, Clone, PartialEq)]
pub struct SkillBreakdown {
    pub score: u8,
    pub exact_match_score: f64,
    pub partial_match_score: f64,
    pub category_coverage: f64,
    pub matched: Vec<SkillToken>,
    pub missing: Vec<SkillToken>,
    pub partial: Vec<PartialMatch>,
}

#[derive(Debug, Clone)]
pub struct MatchScorer {
    canonicalizer: Canonicalizer,
    scoring: ScoringConfig,
}

impl MatchScorer {
    pub fn new(canonicalizer: Canonicalizer, scoring: ScoringConfig) -> Self {
        Self {
            canonicalizer,
            scoring,
        }
    }

    /// 0-100 skill score of `user_skills` against `required_skills`
    pub fn score_skills<U, R>(&self, user_skills: &[U], required_skills: &[R]) -> u8
    where
        U: AsRef<str>,
        R: AsRef<str>,
    {
        self.skill_breakdown(user_skills, required_skills).score
    }

    pub fn skill_breakdown<U, R>(&self, user_skills: &[U], required_skills: &[R]) -> SkillBreakdown
    where
        U: AsRef<str>,
        R: AsRef<str>,
    {
        let user = self.canonicalizer.canonicalize_all(user_skills);
        let required = self.canonicalizer.canonicalize_all(required_skills);
        self.breakdown_tokens(&user, &required)
    }

    fn breakdown_tokens(&self, user: &[SkillToken], required: &[SkillToken]) -> SkillBreakdown {
        if required.is_empty() {
            return SkillBreakdown {
                score: 100,
                exact_match_score: 1.0,
                partial_match_score: 1.0,
                category_coverage: 1.0,
                matched: Vec::new(),
                missing: Vec::new(),
                partial: Vec::new(),
            };
        }
        if user.is_empty() {
            return SkillBreakdown {
                score: 0,
                exact_match_score: 0.0,
                partial_match_score: 0.0,
                category_coverage: 0.0,
                matched: Vec::new(),
                missing: required.to_vec(),
                partial: Vec::new(),
            };
        }

        let user_set: HashSet<&SkillToken> = user.iter().collect();
        let mut matched = Vec::new();
        let mut missing = Vec::new();
        let mut partial = Vec::new();

        for skill in required {
            if user_set.contains(skill) {
                matched.push(skill.clone());
                continue;
            }

            let best = best_match(skill.as_str(), user);
            match best.index {
                Some(index) if best.score > self.scoring.partial_threshold => {
                    partial.push(PartialMatch {
                        skill: skill.clone(),
                        matched_against: user[index].clone(),
                        score: best.score,
                    });
                }
                _ => missing.push(skill.clone()),
            }
        }

        let total = required.len() as f64;
        let exact_match_score = matched.len() as f64 / total;
        // exact hits count as full-strength matches here, so an all-exact
        // profile reaches 100
        let partial_match_score =
            (matched.len() as f64 + partial.iter().map(|p| p.score).sum::<f64>()) / total;

        let required_categories = self.canonicalizer.categorize_all(required);
        let covered_categories: BTreeSet<String> = self
            .canonicalizer
            .categorize_all(user.iter().chain(partial.iter().map(|p| &p.skill)));
        let category_coverage = if required_categories.is_empty() {
            0.0
        } else {
            required_categories.intersection(&covered_categories).count() as f64
                / required_categories.len() as f64
        };

        let combined = self.scoring.exact_weight * exact_match_score
            + self.scoring.partial_weight * partial_match_score
            + self.scoring.category_weight * category_coverage;
        let score = to_percentage(combined);

        debug!(
            "Skill score {} (exact {:.2}, partial {:.2}, categories {:.2})",
            score, exact_match_score, partial_match_score, category_coverage
        );

        SkillBreakdown {
            score,
            exact_match_score,
            partial_match_score,
            category_coverage,
            matched,
            missing,
            partial,
        }
    }

    /// Full match result for a profile against a job
    pub fn compute_job_match(&self, profile: &CandidateProfile, job: &JobPosting) -> MatchResult {
        let breakdown = self.skill_breakdown(&profile.skill_names(), &job.required_skills);

        MatchResult {
            match_score: breakdown.score,
            matched_skills: breakdown.matched,
            missing_skills: breakdown.missing,
            partial_matches: breakdown.partial,
            skills_match: breakdown.score,
            experience_match: experience_score(profile.experience_years, job.experience_years),
            location_match: location_score(profile.location.as_deref(), job.location.as_deref(), job.remote),
            salary_match: salary_score(profile.salary_expectation, job.salary_min, job.salary_max),
        }
    }
}

fn to_percentage(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Ratio of the candidate's years to the required years, capped at 100
pub fn experience_score(user_years: Option<f64>, required_years: Option<f64>) -> u8 {
    let required = match required_years {
        Some(years) if years > 0.0 => years,
        _ => return 100,
    };
    match user_years {
        Some(years) if years > 0.0 => to_percentage((years / required).min(1.0)),
        _ => 0,
    }
}

/// 100 for remote jobs, or when the locations (or their leading city parts)
/// are equal ignoring case; otherwise 50
pub fn location_score(user_location: Option<&str>, job_location: Option<&str>, remote: bool) -> u8 {
    let normalize = |s: &str| s.trim().to_lowercase();
    let job = job_location.map(normalize).filter(|s| !s.is_empty());
    if remote || job.as_deref() == Some("remote") {
        return 100;
    }

    let user = user_location.map(normalize).filter(|s| !s.is_empty());
    match (user, job) {
        (Some(user), Some(job)) if user == job || same_leading_place(&user, &job) => 100,
        _ => NEUTRAL_SCORE,
    }
}

/// First comma-separated part, e.g. the city in "berlin, germany"
fn leading_place(location: &str) -> &str {
    location.split(',').next().unwrap_or(location).trim()
}

fn same_leading_place(a: &str, b: &str) -> bool {
    let place = leading_place(a);
    !place.is_empty() && place == leading_place(b)
}

/// 100 inside the range or below its minimum, linear falloff above the maximum
pub fn salary_score(expectation: Option<f64>, min: Option<f64>, max: Option<f64>) -> u8 {
    let expectation = match expectation {
        Some(value) if value > 0.0 => value,
        _ => return NEUTRAL_SCORE,
    };

    match (min, max) {
        (None, None) => NEUTRAL_SCORE,
        (_, Some(max)) if max > 0.0 && expectation > max => {
            let overshoot = (expectation - max) / max;
            to_percentage((1.0 - overshoot).max(0.0))
        }
        _ => 100,
    }
}
