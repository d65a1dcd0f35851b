//! Skill gap analysis and training recommendations

use crate::config::RecommendationConfig;
use crate::input::records::{CandidateProfile, JobPosting, UserSkill};
use crate::processing::canonicalizer::{Canonicalizer, SkillToken};
use crate::reference::tables::{Course, CourseLevel, Demand};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Level assumed for a skill listed without a proficiency
pub const DEFAULT_LISTED_LEVEL: u8 = 65;
/// Level assumed for a skill the user does not list
pub const BASELINE_LEVEL: u8 = 30;
/// Target for skills the user already has
pub const HELD_TARGET_LEVEL: u8 = 85;
/// Target for skills the user lacks
pub const MISSING_TARGET_LEVEL: u8 = 90;
/// 1-5 ordinal proficiency mapped onto the 0-100 scale
pub const ORDINAL_LEVELS: [u8; 6] = [0, 20, 40, 60, 75, 90];

pub const DEFAULT_SALARY_INCREASE: &str = "+5%";
pub const FALLBACK_RELEVANCE: u8 = 80;
const MAX_RELEVANCE: i32 = 99;
const COURSE_RANK_PENALTY: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Importance {
    /// First three required skills are High, next three Medium, the rest Low
    pub fn from_position(position: usize) -> Self {
        match position {
            0..=2 => Importance::High,
            3..=5 => Importance::Medium,
            _ => Importance::Low,
        }
    }

    fn relevance_boost(self) -> i32 {
        match self {
            Importance::High => 10,
            Importance::Medium => 5,
            Importance::Low => 0,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Importance::High => write!(f, "High"),
            Importance::Medium => write!(f, "Medium"),
            Importance::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGap {
    pub skill: SkillToken,
    pub current_level: u8,
    pub target_level: u8,
    pub importance: Importance,
    pub demand: Demand,
    pub avg_salary_increase: String,
}

impl SkillGap {
    /// target - current; negative when the user already exceeds the target
    pub fn deficit(&self) -> i32 {
        i32::from(self.target_level) - i32::from(self.current_level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRecommendation {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub duration: String,
    pub level: CourseLevel,
    pub rating: f32,
    pub relevance: u8,
    pub target_skills: Vec<SkillToken>,
}

impl TrainingRecommendation {
    fn from_course(course: &Course, relevance: u8, target_skills: Vec<SkillToken>) -> Self {
        Self {
            id: course.id.clone(),
            title: course.title.clone(),
            provider: course.provider.clone(),
            duration: course.duration.clone(),
            level: course.level,
            rating: course.rating,
            relevance,
            target_skills,
        }
    }
}

/// Normalize a listed proficiency onto 0-100
pub fn normalize_level(level: Option<f64>) -> u8 {
    match level {
        None => DEFAULT_LISTED_LEVEL,
        Some(value) if value <= 5.0 => {
            let index = value.round().max(0.0) as usize;
            ORDINAL_LEVELS[index.min(ORDINAL_LEVELS.len() - 1)]
        }
        Some(value) => value.round().clamp(0.0, 100.0) as u8,
    }
}

#[derive(Debug, Clone)]
pub struct GapAnalyzer {
    canonicalizer: Canonicalizer,
    settings: RecommendationConfig,
}

impl GapAnalyzer {
    pub fn new(canonicalizer: Canonicalizer, settings: RecommendationConfig) -> Self {
        Self {
            canonicalizer,
            settings,
        }
    }

    /// Canonical skill -> 0-100 level. A skill listed twice keeps its higher level.
    pub fn user_levels(&self, skills: &[UserSkill]) -> HashMap<SkillToken, u8> {
        let mut levels = HashMap::new();
        for skill in skills {
            let token = self.canonicalizer.canonicalize(skill.name());
            if token.is_empty() {
                continue;
            }
            let level = normalize_level(skill.level());
            levels
                .entry(token)
                .and_modify(|existing: &mut u8| *existing = (*existing).max(level))
                .or_insert(level);
        }
        levels
    }

    /// Gaps for every skill the jobs require, largest deficit first
    pub fn analyze_skill_gaps(&self, profile: &CandidateProfile, jobs: &[JobPosting]) -> Vec<SkillGap> {
        let required: Vec<&String> = jobs.iter().flat_map(|job| job.required_skills.iter()).collect();
        let required = self.canonicalizer.canonicalize_all(&required);
        let levels = self.user_levels(&profile.skills);
        let tables = self.canonicalizer.tables();

        let mut gaps: Vec<SkillGap> = required
            .into_iter()
            .enumerate()
            .map(|(position, skill)| {
                let held = levels.get(&skill).copied();
                let demand = tables.demand_for(skill.as_str()).unwrap_or(Demand::Medium);
                let avg_salary_increase = tables
                    .salary_increase_for(skill.as_str())
                    .unwrap_or(DEFAULT_SALARY_INCREASE)
                    .to_string();
                SkillGap {
                    current_level: held.unwrap_or(BASELINE_LEVEL),
                    target_level: if held.is_some() { HELD_TARGET_LEVEL } else { MISSING_TARGET_LEVEL },
                    importance: Importance::from_position(position),
                    demand,
                    avg_salary_increase,
                    skill,
                }
            })
            .collect();

        // stable: equal deficits keep their required-skill order
        gaps.sort_by_key(|gap| std::cmp::Reverse(gap.deficit()));
        debug!("Identified {} skill gaps across {} jobs", gaps.len(), jobs.len());
        gaps
    }

    /// Courses for the top gaps, most relevant first
    pub fn recommend_training(&self, gaps: &[SkillGap]) -> Vec<TrainingRecommendation> {
        let tables = self.canonicalizer.tables();
        let mut recommendations: Vec<TrainingRecommendation> = Vec::new();
        let mut by_id: HashMap<String, usize> = HashMap::new();

        for gap in gaps.iter().take(self.settings.max_gaps) {
            let courses = tables.courses_for(gap.skill.as_str());
            for (course_index, course) in courses.iter().take(self.settings.courses_per_skill).enumerate() {
                let raw = gap.deficit() + gap.importance.relevance_boost()
                    - course_index as i32 * COURSE_RANK_PENALTY;
                let relevance = raw.clamp(0, MAX_RELEVANCE) as u8;

                match by_id.get(&course.id) {
                    Some(&existing) => {
                        let entry = &mut recommendations[existing];
                        entry.relevance = entry.relevance.max(relevance);
                        if !entry.target_skills.contains(&gap.skill) {
                            entry.target_skills.push(gap.skill.clone());
                        }
                    }
                    None => {
                        by_id.insert(course.id.clone(), recommendations.len());
                        recommendations.push(TrainingRecommendation::from_course(
                            course,
                            relevance,
                            vec![gap.skill.clone()],
                        ));
                    }
                }
            }
        }

        if recommendations.is_empty() {
            warn!("No catalog courses for the top skill gaps, using fallback recommendation");
            recommendations.push(TrainingRecommendation::from_course(
                tables.fallback_course(),
                FALLBACK_RELEVANCE,
                gaps.iter().take(self.settings.max_gaps).map(|g| g.skill.clone()).collect(),
            ));
        }

        recommendations.sort_by_key(|rec| std::cmp::Reverse(rec.relevance));
        recommendations
    }
}
