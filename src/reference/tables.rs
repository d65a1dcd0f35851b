//! Versioned reference tables: aliases, categories, market data and the course catalog

use crate::error::{Result, SkillMatchError};
use crate::processing::canonicalizer::{clean_skill_text, resolve_alias};
use aho_corasick::AhoCorasick;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Tables shipped with the crate
pub const EMBEDDED_TABLES: &str = include_str!("../../data/reference_tables.toml");

/// Market demand for a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "snake_case"))]
pub enum Demand {
    VeryHigh,
    High,
    Medium,
    Low,
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Demand::VeryHigh => write!(f, "Very High"),
            Demand::High => write!(f, "High"),
            Demand::Medium => write!(f, "Medium"),
            Demand::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "PascalCase", deserialize = "snake_case"))]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CourseLevel::Beginner => write!(f, "Beginner"),
            CourseLevel::Intermediate => write!(f, "Intermediate"),
            CourseLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

/// A catalog course definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub duration: String,
    pub level: CourseLevel,
    pub rating: f32,
}

/// On-disk shape of the tables
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableDocument {
    version: String,
    #[serde(default)]
    aliases: Vec<(String, String)>,
    #[serde(default)]
    categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    demand: HashMap<String, Demand>,
    #[serde(default)]
    salary_increase: HashMap<String, String>,
    #[serde(default)]
    courses: HashMap<String, Vec<Course>>,
    fallback_course: Course,
}

/// One alias table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub skill: String,
}

/// A category with a precompiled substring matcher over its members
pub struct Category {
    pub name: String,
    pub members: Vec<String>,
    matcher: AhoCorasick,
}

impl Category {
    fn new(name: String, members: Vec<String>) -> Result<Self> {
        let matcher = AhoCorasick::new(&members).map_err(|e| {
            SkillMatchError::InvalidTable(format!("Failed to build matcher for category '{}': {}", name, e))
        })?;
        Ok(Self { name, members, matcher })
    }

    /// True when the token contains any member of this category
    pub fn contains(&self, token: &str) -> bool {
        self.matcher.is_match(token)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Category")
            .field("name", &self.name)
            .field("members", &self.members)
            .finish()
    }
}

/// Validated, immutable reference data. Built once, shared behind an `Arc`.
#[derive(Debug)]
pub struct ReferenceTables {
    version: String,
    aliases: Vec<AliasEntry>,
    alias_index: HashMap<String, usize>,
    categories: Vec<Category>,
    demand: HashMap<String, Demand>,
    salary_increase: HashMap<String, String>,
    courses: HashMap<String, Vec<Course>>,
    fallback_course: Course,
}

impl ReferenceTables {
    /// Parse and validate tables from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: TableDocument = toml::from_str(content)?;
        Self::from_document(document)
    }

    /// Load tables from an external file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&content)?;
        info!(
            "Loaded reference tables v{} from {}",
            tables.version,
            path.display()
        );
        Ok(tables)
    }

    /// The tables compiled into the crate
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_TABLES)
    }

    fn from_document(document: TableDocument) -> Result<Self> {
        if document.version.trim().is_empty() {
            return Err(SkillMatchError::InvalidTable("version must not be empty".to_string()));
        }

        let mut aliases = Vec::with_capacity(document.aliases.len());
        let mut alias_index = HashMap::with_capacity(document.aliases.len());
        for (alias, skill) in document.aliases {
            if alias.is_empty() || skill.is_empty() {
                return Err(SkillMatchError::InvalidTable(format!(
                    "alias entry has an empty side: '{}' -> '{}'",
                    alias, skill
                )));
            }
            if clean_skill_text(&alias) != alias {
                return Err(SkillMatchError::InvalidTable(format!(
                    "alias key '{}' is not in cleaned form (expected '{}')",
                    alias,
                    clean_skill_text(&alias)
                )));
            }
            if alias_index.contains_key(&alias) {
                return Err(SkillMatchError::InvalidTable(format!("duplicate alias key '{}'", alias)));
            }
            alias_index.insert(alias.clone(), aliases.len());
            aliases.push(AliasEntry { alias, skill });
        }

        let mut categories = Vec::with_capacity(document.categories.len());
        for (name, members) in document.categories {
            if members.iter().any(|m| m.trim().is_empty()) {
                return Err(SkillMatchError::InvalidTable(format!(
                    "category '{}' has an empty member",
                    name
                )));
            }
            categories.push(Category::new(name, members)?);
        }

        for (skill, courses) in &document.courses {
            if let Some(course) = courses.iter().find(|c| c.id.trim().is_empty() || c.title.trim().is_empty()) {
                return Err(SkillMatchError::InvalidTable(format!(
                    "course under '{}' is missing an id or title: {:?}",
                    skill, course
                )));
            }
        }
        if document.fallback_course.title.trim().is_empty() {
            return Err(SkillMatchError::InvalidTable("fallback course needs a title".to_string()));
        }

        let tables = Self {
            version: document.version,
            aliases,
            alias_index,
            categories,
            demand: document.demand,
            salary_increase: document.salary_increase,
            courses: document.courses,
            fallback_course: document.fallback_course,
        };
        tables.check_alias_targets()?;
        Ok(tables)
    }

    /// Every alias target must canonicalize to itself, otherwise
    /// canonicalization would not be idempotent.
    fn check_alias_targets(&self) -> Result<()> {
        for entry in &self.aliases {
            let cleaned = clean_skill_text(&entry.skill);
            let resolved = resolve_alias(&cleaned, self).unwrap_or(cleaned.as_str());
            if resolved != entry.skill {
                return Err(SkillMatchError::InvalidTable(format!(
                    "alias target '{}' canonicalizes to '{}'",
                    entry.skill, resolved
                )));
            }
        }
        Ok(())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn aliases(&self) -> &[AliasEntry] {
        &self.aliases
    }

    /// Exact alias lookup on an already-cleaned key
    pub fn alias_exact(&self, cleaned: &str) -> Option<&str> {
        self.alias_index
            .get(cleaned)
            .map(|&idx| self.aliases[idx].skill.as_str())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn demand_for(&self, skill: &str) -> Option<Demand> {
        self.demand.get(skill).copied()
    }

    pub fn salary_increase_for(&self, skill: &str) -> Option<&str> {
        self.salary_increase.get(skill).map(String::as_str)
    }

    pub fn courses_for(&self, skill: &str) -> &[Course] {
        self.courses.get(skill).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fallback_course(&self) -> &Course {
        &self.fallback_course
    }

    pub fn course_count(&self) -> usize {
        self.courses.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
version = "test-1"
aliases = [["reactjs", "react"], ["k8s", "kubernetes"]]

[categories]
frontend = ["react"]

[fallback_course]
id = "fallback"
title = "Problem Solving & Communication"
provider = "Coursera"
duration = "4 weeks"
level = "beginner"
rating = 4.5
"#;

    #[test]
    fn test_embedded_tables_load() {
        let tables = ReferenceTables::embedded().unwrap();
        assert!(!tables.version().is_empty());
        assert!(tables.aliases().len() > 20);
        assert!(tables.course_count() > 10);
        assert_eq!(tables.alias_exact("nodejs"), Some("node.js"));
        assert_eq!(tables.demand_for("react"), Some(Demand::VeryHigh));
        assert_eq!(tables.salary_increase_for("aws"), Some("+20%"));
    }

    #[test]
    fn test_enum_casing_parses_snake_and_serializes_pascal() {
        let tables = ReferenceTables::from_toml_str(MINIMAL).unwrap();
        assert_eq!(tables.fallback_course().level, CourseLevel::Beginner);

        assert_eq!(serde_json::to_string(&Demand::VeryHigh).unwrap(), "\"VeryHigh\"");
        assert_eq!(serde_json::to_string(&Demand::Low).unwrap(), "\"Low\"");
        assert_eq!(serde_json::to_string(&CourseLevel::Intermediate).unwrap(), "\"Intermediate\"");
    }

    #[test]
    fn test_minimal_tables() {
        let tables = ReferenceTables::from_toml_str(MINIMAL).unwrap();
        assert_eq!(tables.version(), "test-1");
        assert_eq!(tables.categories().len(), 1);
        assert!(tables.categories()[0].contains("react native"));
        assert!(tables.courses_for("react").is_empty());
        assert_eq!(tables.demand_for("react"), None);
    }

    #[test]
    fn test_malformed_toml_is_rejected() {
        let result = ReferenceTables::from_toml_str("version = ");
        assert!(matches!(result, Err(SkillMatchError::TableParse(_))));
    }

    #[test]
    fn test_uncleaned_alias_key_is_rejected() {
        let content = MINIMAL.replace("[\"reactjs\", \"react\"]", "[\"React.js\", \"react\"]");
        let result = ReferenceTables::from_toml_str(&content);
        assert!(matches!(result, Err(SkillMatchError::InvalidTable(_))));
    }

    #[test]
    fn test_non_idempotent_alias_target_is_rejected() {
        // "cpp" is cleaned to "c", so a target of "c++" can never be reached again
        let content = MINIMAL.replace("[\"k8s\", \"kubernetes\"]", "[\"cpp\", \"c++\"]");
        let result = ReferenceTables::from_toml_str(&content);
        assert!(matches!(result, Err(SkillMatchError::InvalidTable(_))));
    }

    #[test]
    fn test_duplicate_alias_is_rejected() {
        let content = MINIMAL.replace("[\"k8s\", \"kubernetes\"]", "[\"reactjs\", \"react\"]");
        let result = ReferenceTables::from_toml_str(&content);
        assert!(matches!(result, Err(SkillMatchError::InvalidTable(_))));
    }

    #[test]
    fn test_unknown_demand_level_is_rejected() {
        let content = format!("{}\n[demand]\nreact = \"sky_high\"\n", MINIMAL);
        assert!(ReferenceTables::from_toml_str(&content).is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.toml");
        std::fs::write(&path, MINIMAL).unwrap();

        let tables = ReferenceTables::from_path(&path).unwrap();
        assert_eq!(tables.version(), "test-1");

        let missing = ReferenceTables::from_path(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(SkillMatchError::Io(_))));
    }
}
