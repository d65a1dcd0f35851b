//! Output formatters - console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, SkillMatchError};
use crate::output::report::*;
use crate::processing::gap_analyzer::{Importance, SkillGap, TrainingRecommendation};
use crate::processing::match_scorer::MatchResult;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for formatting reports
pub trait OutputFormatter {
    fn format_report(&self, report: &Report) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for documentation and reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn join_skills<T: std::fmt::Display>(items: &[T]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            75..=89 => ("STRONG", Color::BrightGreen),
            50..=74 => ("PARTIAL", Color::Yellow),
            25..=49 => ("WEAK", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_importance(&self, importance: Importance) -> String {
        let color = match importance {
            Importance::High => Color::Red,
            Importance::Medium => Color::Yellow,
            Importance::Low => Color::Green,
        };
        self.colorize(&importance.to_string(), color)
    }

    fn format_match_result(&self, output: &mut String, result: &MatchResult) {
        output.push_str(&format!(
            "Match Score: {}% {}\n",
            result.match_score,
            self.format_score_badge(result.match_score)
        ));

        output.push_str(&self.format_header("Sub-scores", 3));
        output.push_str(&format!("  Skills:     {}%\n", result.skills_match));
        output.push_str(&format!("  Experience: {}%\n", result.experience_match));
        output.push_str(&format!("  Location:   {}%\n", result.location_match));
        output.push_str(&format!("  Salary:     {}%\n", result.salary_match));

        output.push_str(&self.format_header("Skills", 3));
        output.push_str(&format!(
            "  Matched: {}\n",
            self.colorize(&join_skills(&result.matched_skills), Color::Green)
        ));
        output.push_str(&format!(
            "  Missing: {}\n",
            self.colorize(&join_skills(&result.missing_skills), Color::Red)
        ));
        for partial in &result.partial_matches {
            output.push_str(&format!(
                "  Partial: {} ~ {} ({:.0}%)\n",
                partial.skill,
                partial.matched_against,
                partial.score * 100.0
            ));
        }
    }

    fn format_gaps(&self, output: &mut String, gaps: &[SkillGap]) {
        output.push_str(&self.format_header("Skill Gaps", 2));
        if gaps.is_empty() {
            output.push_str("  No required skills to analyze\n");
            return;
        }
        let shown = if self.detailed { gaps.len() } else { gaps.len().min(10) };
        for gap in gaps.iter().take(shown) {
            output.push_str(&format!(
                "  • {:<20} {:>3} → {:<3} importance: {:<6} demand: {:<9} salary: {}\n",
                gap.skill.as_str(),
                gap.current_level,
                gap.target_level,
                self.format_importance(gap.importance),
                gap.demand.to_string(),
                gap.avg_salary_increase
            ));
        }
        if shown < gaps.len() {
            output.push_str(&format!("  ... and {} more gaps\n", gaps.len() - shown));
        }
    }

    fn format_recommendations(&self, output: &mut String, recommendations: &[TrainingRecommendation]) {
        output.push_str(&self.format_header("Recommended Training", 2));
        for (i, rec) in recommendations.iter().enumerate() {
            output.push_str(&format!(
                "{}. {} ({})\n",
                i + 1,
                self.colorize(&rec.title, Color::Cyan),
                rec.provider
            ));
            output.push_str(&format!(
                "   Relevance: {}% | {} | {} | ★ {:.1}\n",
                rec.relevance, rec.level, rec.duration, rec.rating
            ));
            if self.detailed {
                output.push_str(&format!("   Covers: {}\n", join_skills(&rec.target_skills)));
            }
        }
    }

    fn format_metadata(&self, output: &mut String, metadata: &ReportMetadata) {
        output.push_str(&format!(
            "Generated: {} | Tables v{} | Processing time: {}ms\n",
            metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.tables_version,
            metadata.processing_time_ms
        ));
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        match report {
            Report::Match(report) => {
                output.push_str(&self.format_header("SKILL MATCH", 1));
                self.format_metadata(&mut output, &report.metadata);
                output.push_str(&format!("Candidate: {} | Job: {}\n\n", report.candidate, report.job));
                self.format_match_result(&mut output, &report.result);
            }
            Report::Gaps(report) => {
                output.push_str(&self.format_header("SKILL GAP ANALYSIS", 1));
                self.format_metadata(&mut output, &report.metadata);
                output.push_str(&format!(
                    "Candidate: {} | Jobs: {}\n",
                    report.candidate,
                    report.jobs.join(", ")
                ));
                self.format_gaps(&mut output, &report.gaps);
                self.format_recommendations(&mut output, &report.recommendations);
            }
            Report::Ranking(report) => {
                output.push_str(&self.format_header("JOB RANKING", 1));
                self.format_metadata(&mut output, &report.metadata);
                output.push_str(&format!("Candidate: {}\n\n", report.candidate));
                for (position, entry) in report.ranked.iter().enumerate() {
                    output.push_str(&format!(
                        "{:>3}. {:<40} {:>3}% {}\n",
                        position + 1,
                        entry.title,
                        entry.result.match_score,
                        self.format_score_badge(entry.result.match_score)
                    ));
                    if self.detailed && !entry.result.missing_skills.is_empty() {
                        output.push_str(&format!(
                            "     missing: {}\n",
                            join_skills(&entry.result.missing_skills)
                        ));
                    }
                }
            }
            Report::Candidates(report) => {
                output.push_str(&self.format_header("CANDIDATE RANKING", 1));
                self.format_metadata(&mut output, &report.metadata);
                output.push_str(&format!("Job: {}\n\n", report.job));
                for (position, entry) in report.ranked.iter().enumerate() {
                    let candidate = entry.candidate_id.as_deref().unwrap_or("unnamed candidate");
                    output.push_str(&format!(
                        "{:>3}. {:<40} {:>3}% {}\n",
                        position + 1,
                        candidate,
                        entry.result.match_score,
                        self.format_score_badge(entry.result.match_score)
                    ));
                    if self.detailed && !entry.result.missing_skills.is_empty() {
                        output.push_str(&format!(
                            "     missing: {}\n",
                            join_skills(&entry.result.missing_skills)
                        ));
                    }
                }
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            90..=100 => "🟢 Excellent",
            75..=89 => "🟢 Strong",
            50..=74 => "🟡 Partial",
            25..=49 => "🟠 Weak",
            _ => "🔴 Poor",
        }
    }

    fn markdown_match(output: &mut String, result: &MatchResult) {
        output.push_str(&format!(
            "**Match Score:** {}% {}\n\n",
            result.match_score,
            Self::markdown_score_badge(result.match_score)
        ));
        output.push_str("| Sub-score | Value |\n|---|---|\n");
        output.push_str(&format!("| Skills | {}% |\n", result.skills_match));
        output.push_str(&format!("| Experience | {}% |\n", result.experience_match));
        output.push_str(&format!("| Location | {}% |\n", result.location_match));
        output.push_str(&format!("| Salary | {}% |\n\n", result.salary_match));
        output.push_str(&format!("- **Matched:** {}\n", join_skills(&result.matched_skills)));
        output.push_str(&format!("- **Missing:** {}\n", join_skills(&result.missing_skills)));
        for partial in &result.partial_matches {
            output.push_str(&format!(
                "- **Partial:** {} ~ {} ({:.0}%)\n",
                partial.skill,
                partial.matched_against,
                partial.score * 100.0
            ));
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        match report {
            Report::Match(report) => {
                output.push_str(&format!("# Skill Match: {} → {}\n\n", report.candidate, report.job));
                Self::markdown_match(&mut output, &report.result);
            }
            Report::Gaps(report) => {
                output.push_str(&format!("# Skill Gap Analysis: {}\n\n", report.candidate));
                output.push_str(&format!("Target jobs: {}\n\n", report.jobs.join(", ")));
                output.push_str("## Skill Gaps\n\n");
                output.push_str("| Skill | Current | Target | Importance | Demand | Salary |\n");
                output.push_str("|---|---|---|---|---|---|\n");
                for gap in &report.gaps {
                    output.push_str(&format!(
                        "| {} | {} | {} | {} | {} | {} |\n",
                        gap.skill, gap.current_level, gap.target_level, gap.importance, gap.demand, gap.avg_salary_increase
                    ));
                }
                output.push_str("\n## Recommended Training\n\n");
                for (i, rec) in report.recommendations.iter().enumerate() {
                    output.push_str(&format!(
                        "{}. **{}** ({}, {}, {}) - relevance {}%, rating {:.1}\n",
                        i + 1,
                        rec.title,
                        rec.provider,
                        rec.level,
                        rec.duration,
                        rec.relevance,
                        rec.rating
                    ));
                }
            }
            Report::Ranking(report) => {
                output.push_str(&format!("# Job Ranking: {}\n\n", report.candidate));
                output.push_str("| # | Job | Score | Missing |\n|---|---|---|---|\n");
                for (position, entry) in report.ranked.iter().enumerate() {
                    output.push_str(&format!(
                        "| {} | {} | {}% | {} |\n",
                        position + 1,
                        entry.title,
                        entry.result.match_score,
                        join_skills(&entry.result.missing_skills)
                    ));
                }
            }
            Report::Candidates(report) => {
                output.push_str(&format!("# Candidate Ranking: {}\n\n", report.job));
                output.push_str("| # | Candidate | Score | Missing |\n|---|---|---|---|\n");
                for (position, entry) in report.ranked.iter().enumerate() {
                    output.push_str(&format!(
                        "| {} | {} | {}% | {} |\n",
                        position + 1,
                        entry.candidate_id.as_deref().unwrap_or("unnamed candidate"),
                        entry.result.match_score,
                        join_skills(&entry.result.missing_skills)
                    ));
                }
            }
        }

        if self.include_metadata {
            let metadata = report.metadata();
            output.push_str(&format!(
                "\n---\n_Generated {} by skill-match {} (tables v{}, {}ms)_\n",
                metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                metadata.tool_version,
                metadata.tables_version,
                metadata.processing_time_ms
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false)
    }

    pub fn with_options(use_colors: bool, detailed: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn generate_report(&self, report: &Report, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Save formatted report content, creating parent directories
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(file_path, content).map_err(|e| {
        SkillMatchError::OutputFormatting(format!("Failed to write {}: {}", file_path.display(), e))
    })
}
