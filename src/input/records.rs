//! Candidate profile and job posting records supplied by the host application

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

/// A skill as listed on a profile: a bare name or a name with a proficiency
/// level (1-5 ordinal or 0-100 scale).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserSkill {
    Named(String),
    Rated { name: String, level: f64 },
}

impl UserSkill {
    pub fn name(&self) -> &str {
        match self {
            UserSkill::Named(name) => name,
            UserSkill::Rated { name, .. } => name,
        }
    }

    pub fn level(&self) -> Option<f64> {
        match self {
            UserSkill::Named(_) => None,
            UserSkill::Rated { level, .. } => Some(*level),
        }
    }
}

impl From<&str> for UserSkill {
    fn from(name: &str) -> Self {
        UserSkill::Named(name.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_user_skills")]
    pub skills: Vec<UserSkill>,
    #[serde(default)]
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary_expectation: Option<f64>,
}

impl CandidateProfile {
    pub fn with_skills<S: AsRef<str>>(skills: &[S]) -> Self {
        Self {
            id: None,
            skills: skills.iter().map(|s| UserSkill::from(s.as_ref())).collect(),
            experience_years: None,
            location: None,
            salary_expectation: None,
        }
    }

    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(UserSkill::name).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub experience_years: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
}

impl JobPosting {
    pub fn with_required<S: AsRef<str>>(skills: &[S]) -> Self {
        Self {
            id: None,
            title: None,
            required_skills: skills.iter().map(|s| s.as_ref().to_string()).collect(),
            experience_years: None,
            location: None,
            remote: false,
            salary_min: None,
            salary_max: None,
        }
    }

    /// Title if present, otherwise the id, otherwise a placeholder
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("untitled job")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserSkill {
    Named(String),
    Rated { name: String, level: Option<f64> },
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawString {
    Value(String),
    Other(IgnoredAny),
}

/// Skill lists from the outside world may carry nulls, numbers or stray
/// objects; those entries are dropped instead of failing the whole record.
fn lenient_user_skills<'de, D>(deserializer: D) -> Result<Vec<UserSkill>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawUserSkill>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            RawUserSkill::Named(name) => Some(UserSkill::Named(name)),
            RawUserSkill::Rated { name, level: Some(level) } if level.is_finite() => {
                Some(UserSkill::Rated { name, level })
            }
            RawUserSkill::Rated { name, .. } => Some(UserSkill::Named(name)),
            RawUserSkill::Other(_) => None,
        })
        .collect())
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<RawString>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            RawString::Value(value) => Some(value),
            RawString::Other(_) => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_accepts_mixed_skill_shapes() {
        let json = r#"{
            "skills": ["React", {"name": "Python", "level": 4}, null, 42, {"level": 3}, {"name": "Go"}],
            "experienceYears": 5,
            "location": "Berlin"
        }"#;
        let profile: CandidateProfile = serde_json::from_str(json).unwrap();

        assert_eq!(
            profile.skills,
            vec![
                UserSkill::Named("React".to_string()),
                UserSkill::Rated { name: "Python".to_string(), level: 4.0 },
                UserSkill::Named("Go".to_string()),
            ]
        );
        assert_eq!(profile.experience_years, Some(5.0));
        assert_eq!(profile.salary_expectation, None);
    }

    #[test]
    fn test_job_filters_non_string_requirements() {
        let json = r#"{"title": "Frontend Engineer", "requiredSkills": ["react", null, 7, "docker"], "remote": true}"#;
        let job: JobPosting = serde_json::from_str(json).unwrap();

        assert_eq!(job.required_skills, vec!["react", "docker"]);
        assert!(job.remote);
        assert_eq!(job.label(), "Frontend Engineer");
    }

    #[test]
    fn test_missing_and_null_lists_default_to_empty() {
        let profile: CandidateProfile = serde_json::from_str(r#"{"skills": null}"#).unwrap();
        assert!(profile.skills.is_empty());

        let job: JobPosting = serde_json::from_str("{}").unwrap();
        assert!(job.required_skills.is_empty());
        assert_eq!(job.label(), "untitled job");
    }
}
