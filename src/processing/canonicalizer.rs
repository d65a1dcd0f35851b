//! Skill canonicalization: free-text skill strings to canonical tokens

use crate::reference::tables::ReferenceTables;
use log::debug;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Synthetic category for tokens no configured category claims
pub const OTHER_CATEGORY: &str = "other";

static BRACKETED_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\s*[(\[{].*$").expect("Invalid bracket regex"));

static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+v?\d+(?:\.\d+)*(?:\.x|\+)?$").expect("Invalid version regex")
});

static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s\-/]").expect("Invalid character class regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// A normalized skill name. Only the canonicalizer creates these.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SkillToken(String);

impl SkillToken {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty tokens stand for "unknown skill" and never take part in scoring
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SkillToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for SkillToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for SkillToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Lower-case, strip bracketed and version suffixes, drop characters outside
/// `[a-z0-9\s\-/]` and collapse whitespace. Repeats until nothing changes, so
/// the result is always a fixed point.
pub fn clean_skill_text(raw: &str) -> String {
    let mut current = raw.trim().to_lowercase();
    loop {
        let stripped = BRACKETED_SUFFIX.replace(&current, "");
        let stripped = VERSION_SUFFIX.replace(&stripped, "");
        let stripped = DISALLOWED_CHARS.replace_all(&stripped, "");
        let next = WHITESPACE_RUN.replace_all(stripped.trim(), " ").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Alias lookup on cleaned text: exact key first, then the first key (in
/// table order) contained in the text.
pub fn resolve_alias<'a>(cleaned: &str, tables: &'a ReferenceTables) -> Option<&'a str> {
    if cleaned.is_empty() {
        return None;
    }
    if let Some(skill) = tables.alias_exact(cleaned) {
        return Some(skill);
    }
    tables
        .aliases()
        .iter()
        .find(|entry| cleaned.contains(entry.alias.as_str()))
        .map(|entry| entry.skill.as_str())
}

/// Maps raw skill text onto canonical tokens and categories
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    tables: Arc<ReferenceTables>,
}

impl Canonicalizer {
    pub fn new(tables: Arc<ReferenceTables>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &Arc<ReferenceTables> {
        &self.tables
    }

    /// Normalize one free-text skill. Total and deterministic.
    pub fn canonicalize(&self, raw: &str) -> SkillToken {
        let cleaned = clean_skill_text(raw);
        match resolve_alias(&cleaned, &self.tables) {
            Some(skill) => {
                if skill != cleaned {
                    debug!("Canonicalized '{}' -> '{}' via alias", raw, skill);
                }
                SkillToken::new(skill.to_string())
            }
            None => SkillToken::new(cleaned),
        }
    }

    /// Canonicalize a list, dropping empty tokens and duplicates (first seen wins)
    pub fn canonicalize_all<S: AsRef<str>>(&self, raw: &[S]) -> Vec<SkillToken> {
        let mut seen = std::collections::HashSet::new();
        raw.iter()
            .map(|s| self.canonicalize(s.as_ref()))
            .filter(|token| !token.is_empty())
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }

    /// Categories whose members occur inside the token, or `{"other"}`
    pub fn categorize(&self, token: &SkillToken) -> BTreeSet<String> {
        let categories: BTreeSet<String> = self
            .tables
            .categories()
            .iter()
            .filter(|category| category.contains(token.as_str()))
            .map(|category| category.name.clone())
            .collect();

        if categories.is_empty() {
            BTreeSet::from([OTHER_CATEGORY.to_string()])
        } else {
            categories
        }
    }

    /// Union of the categories of every token
    pub fn categorize_all<'a, I>(&self, tokens: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a SkillToken>,
    {
        tokens
            .into_iter()
            .flat_map(|token| self.categorize(token))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonicalizer() -> Canonicalizer {
        Canonicalizer::new(Arc::new(ReferenceTables::embedded().unwrap()))
    }

    #[test]
    fn test_clean_skill_text() {
        assert_eq!(clean_skill_text("  Python 3.8 "), "python");
        assert_eq!(clean_skill_text("React.js 18"), "reactjs");
        assert_eq!(clean_skill_text("AWS (Certified)"), "aws");
        assert_eq!(clean_skill_text("Docker [advanced] "), "docker");
        assert_eq!(clean_skill_text("Windows 10 11"), "windows");
        assert_eq!(clean_skill_text("CI/CD"), "ci/cd");
        assert_eq!(clean_skill_text("Problem\t Solving"), "problem solving");
        assert_eq!(clean_skill_text(""), "");
        assert_eq!(clean_skill_text("2019"), "2019");
    }

    #[test]
    fn test_alias_resolution() {
        let c = canonicalizer();
        assert_eq!(c.canonicalize("Node-JS"), "node.js");
        assert_eq!(c.canonicalize("nodejs"), "node.js");
        assert_eq!(c.canonicalize("Node.js"), "node.js");
        assert_eq!(c.canonicalize("React.js 18"), "react");
        assert_eq!(c.canonicalize("K8s"), "kubernetes");
        assert_eq!(c.canonicalize("Amazon Web Services"), "aws");
        assert_eq!(c.canonicalize("Golang"), "go");
    }

    #[test]
    fn test_containment_first_match_wins() {
        let c = canonicalizer();
        // "postgres" is listed before "psql" and is contained in the text
        assert_eq!(c.canonicalize("Postgres Admin"), "postgresql");
        assert_eq!(c.canonicalize("Senior ReactJS Developer"), "react");
        assert_eq!(c.canonicalize("MongoDB Atlas"), "mongodb");
    }

    #[test]
    fn test_unknown_skill_falls_back_to_cleaned_text() {
        let c = canonicalizer();
        assert_eq!(c.canonicalize("Underwater Basket Weaving!"), "underwater basket weaving");
        assert!(c.canonicalize("   ").is_empty());
        assert!(c.canonicalize("(n/a)").is_empty());
    }

    #[test]
    fn test_idempotence_on_table_targets() {
        let c = canonicalizer();
        for entry in c.tables().aliases() {
            let once = c.canonicalize(&entry.skill);
            let twice = c.canonicalize(once.as_str());
            assert_eq!(once, twice, "target '{}' is not stable", entry.skill);
        }
    }

    #[test]
    fn test_canonicalize_all_dedupes_in_order() {
        let c = canonicalizer();
        let tokens = c.canonicalize_all(&["React", "reactjs", "", "SQL", "Node.js", "sql"]);
        let names: Vec<&str> = tokens.iter().map(SkillToken::as_str).collect();
        assert_eq!(names, vec!["react", "sql", "node.js"]);
    }

    #[test]
    fn test_categorize() {
        let c = canonicalizer();
        let react = c.canonicalize("React");
        assert!(c.categorize(&react).contains("frontend"));

        let ts = c.canonicalize("TypeScript");
        let ts_categories = c.categorize(&ts);
        assert!(ts_categories.contains("frontend"));
        assert!(ts_categories.contains("languages"));

        let unknown = c.canonicalize("basket weaving");
        assert_eq!(c.categorize(&unknown), BTreeSet::from(["other".to_string()]));
    }
}
