//! Report generation and formatting

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{GapAnalysisReport, MatchReport, RankingReport, Report, ReportMetadata};
