//! CLI interface for the skill matcher

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Record files the loaders understand
pub const RECORD_EXTENSIONS: &[&str] = &["json", "toml"];

#[derive(Parser)]
#[command(name = "skill-match")]
#[command(about = "Skill matching and career gap analysis tool")]
#[command(long_about = "Score candidate profiles against job postings, find skill gaps and recommend training using versioned reference tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a profile against a single job posting
    Match {
        /// Candidate profile (JSON, TOML)
        #[arg(short, long)]
        profile: PathBuf,

        /// Job posting (JSON, TOML)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Analyze skill gaps across one or more target jobs and recommend training
    Gaps {
        /// Candidate profile (JSON, TOML)
        #[arg(short, long)]
        profile: PathBuf,

        /// Job posting files; each may hold one job or a list
        #[arg(short, long, required = true, num_args = 1..)]
        job: Vec<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank many job postings for one profile
    Rank {
        /// Candidate profile (JSON, TOML)
        #[arg(short, long)]
        profile: PathBuf,

        /// File holding a list of job postings
        #[arg(short, long)]
        jobs: PathBuf,

        /// Only show the best N jobs
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank many candidate profiles for one job posting
    RankCandidates {
        /// Job posting (JSON, TOML)
        #[arg(short, long)]
        job: PathBuf,

        /// File holding a list of candidate profiles
        #[arg(short, long)]
        profiles: PathBuf,

        /// Only show the best N candidates
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Reference table management
    Tables {
        #[command(subcommand)]
        action: TablesAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum TablesAction {
    /// Summarize the active reference tables
    Show,

    /// Check a table file without activating it
    Validate {
        /// Table file; the configured tables are checked when omitted
        path: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.partial_threshold")
        key: String,

        /// Configuration value
        value: String,
    },
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert_eq!(parse_output_format("console"), Ok(OutputFormat::Console));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("jobs.JSON"), RECORD_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("job.toml"), RECORD_EXTENSIONS).is_ok());
        assert!(validate_file_extension(Path::new("resume.pdf"), RECORD_EXTENSIONS).is_err());
        assert!(validate_file_extension(Path::new("README"), RECORD_EXTENSIONS).is_err());
    }

    #[test]
    fn test_gaps_accepts_several_jobs() {
        let cli = Cli::try_parse_from([
            "skill-match", "gaps", "--profile", "me.json", "--job", "a.json", "b.toml",
        ])
        .unwrap();
        match cli.command {
            Commands::Gaps { job, .. } => assert_eq!(job.len(), 2),
            _ => panic!("expected gaps command"),
        }
    }

    #[test]
    fn test_rank_candidates_command() {
        let cli = Cli::try_parse_from([
            "skill-match", "rank-candidates", "--job", "job.toml", "--profiles", "team.json", "--top", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::RankCandidates { profiles, top, .. } => {
                assert_eq!(profiles, PathBuf::from("team.json"));
                assert_eq!(top, Some(3));
            }
            _ => panic!("expected rank-candidates command"),
        }
    }
}
