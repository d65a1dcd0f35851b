//! Input manager for loading profile and job records from disk

use crate::error::{Result, SkillMatchError};
use crate::input::file_detector::FileType;
use crate::input::records::{CandidateProfile, JobPosting};
use log::info;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// `{ "jobs": [...] }` wrapper; the list is required once the key is present
#[derive(Deserialize)]
struct JobsWrapper {
    jobs: Vec<JobPosting>,
}

#[derive(Deserialize)]
struct ProfilesWrapper {
    profiles: Vec<CandidateProfile>,
}

/// Key a standalone job object must carry to be taken as a job
const REQUIRED_SKILLS_KEY: &str = "requiredSkills";

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load_profile(&mut self, path: &Path) -> Result<CandidateProfile> {
        let value = self.load_value(path).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// A profiles file holds a list, a `{ "profiles": [...] }` wrapper, or a single profile
    pub async fn load_profiles(&mut self, path: &Path) -> Result<Vec<CandidateProfile>> {
        let value = self.load_value(path).await?;
        let profiles = if value.is_array() {
            serde_json::from_value(value)?
        } else if value.get("profiles").is_some() {
            serde_json::from_value::<ProfilesWrapper>(value)?.profiles
        } else if value.is_object() {
            vec![serde_json::from_value(value)?]
        } else {
            return Err(SkillMatchError::InvalidInput(format!(
                "Expected a profile or a list of profiles in {}",
                path.display()
            )));
        };
        info!("Loaded {} profile(s) from {}", profiles.len(), path.display());
        Ok(profiles)
    }

    /// A jobs file holds a list, a `{ "jobs": [...] }` wrapper, or a single job.
    /// A single job object must name its `requiredSkills`.
    pub async fn load_jobs(&mut self, path: &Path) -> Result<Vec<JobPosting>> {
        let value = self.load_value(path).await?;
        let jobs = if value.is_array() {
            serde_json::from_value(value)?
        } else if value.get("jobs").is_some() {
            serde_json::from_value::<JobsWrapper>(value)?.jobs
        } else if value.get(REQUIRED_SKILLS_KEY).is_some() {
            vec![serde_json::from_value(value)?]
        } else {
            return Err(SkillMatchError::InvalidInput(format!(
                "Expected a job with {}, a list of jobs or a jobs wrapper in {}",
                REQUIRED_SKILLS_KEY,
                path.display()
            )));
        };
        info!("Loaded {} job(s) from {}", jobs.len(), path.display());
        Ok(jobs)
    }

    /// Load every file and concatenate the jobs in argument order
    pub async fn load_all_jobs<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<JobPosting>> {
        let mut jobs = Vec::new();
        for path in paths {
            jobs.extend(self.load_jobs(path.as_ref()).await?);
        }
        Ok(jobs)
    }

    /// Parse a JSON or TOML file into a format-neutral value
    async fn load_value(&mut self, path: &Path) -> Result<Value> {
        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Unknown {
            return Err(SkillMatchError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        let content = self.read_text(path).await?;
        match file_type {
            FileType::Toml => toml::from_str(&content).map_err(|e| {
                SkillMatchError::InvalidInput(format!("Failed to parse {}: {}", path.display(), e))
            }),
            _ => Ok(serde_json::from_str(&content)?),
        }
    }

    async fn read_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached records for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(SkillMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let text = fs::read_to_string(path).await?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SkillMatchError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
