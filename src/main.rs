//! skill-match: skill matching and career gap analysis tool

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use skill_match::cli::{self, Cli, Commands, ConfigAction, TablesAction, RECORD_EXTENSIONS};
use skill_match::config::{Config, OutputFormat};
use skill_match::error::{Result, SkillMatchError};
use skill_match::input::manager::InputManager;
use skill_match::output::formatter::{save_report_to_file, ReportGenerator};
use skill_match::output::report::{CandidateRankingReport, GapAnalysisReport, MatchReport, RankingReport, Report, ReportMetadata};
use skill_match::processing::engine::SkillEngine;
use skill_match::reference::{ReferenceTables, TableStore};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Output options shared by the analysis commands
struct OutputOptions {
    format: OutputFormat,
    detailed: bool,
    save: Option<PathBuf>,
}

impl OutputOptions {
    fn resolve(config: &Config, output: Option<String>, detailed: bool, save: Option<PathBuf>) -> Result<Self> {
        let format = match output {
            Some(output) => cli::parse_output_format(&output).map_err(SkillMatchError::InvalidInput)?,
            None => config.output.format,
        };
        Ok(Self {
            format,
            detailed: detailed || config.output.detailed,
            save,
        })
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Match {
            profile,
            job,
            output,
            detailed,
            save,
        } => {
            let options = OutputOptions::resolve(&config, output, detailed, save)?;
            check_record_file(&profile, "Profile")?;
            check_record_file(&job, "Job")?;

            let start = Instant::now();
            let engine = build_engine(&config)?;
            let mut input_manager = InputManager::new();
            let candidate = input_manager.load_profile(&profile).await?;
            let jobs = input_manager.load_jobs(&job).await?;
            let posting = jobs.into_iter().next().ok_or_else(|| {
                SkillMatchError::InvalidInput(format!("No job posting found in {}", job.display()))
            })?;

            info!("Scoring {} against {}", profile.display(), posting.label());
            let result = engine.compute_job_match(&candidate, &posting);
            let metadata = ReportMetadata::new(engine.tables().version(), elapsed_ms(start));
            let report = Report::Match(MatchReport::new(&candidate, &posting, result, metadata));
            emit_report(&config, &options, &report)
        }

        Commands::Gaps {
            profile,
            job,
            output,
            detailed,
            save,
        } => {
            let options = OutputOptions::resolve(&config, output, detailed, save)?;
            check_record_file(&profile, "Profile")?;
            for path in &job {
                check_record_file(path, "Job")?;
            }

            let start = Instant::now();
            let engine = build_engine(&config)?;
            let mut input_manager = InputManager::new();
            let candidate = input_manager.load_profile(&profile).await?;
            let jobs = input_manager.load_all_jobs(&job).await?;

            info!("Analyzing skill gaps across {} job(s)", jobs.len());
            let gap_report = engine.gap_report(&candidate, &jobs);
            let metadata = ReportMetadata::new(engine.tables().version(), elapsed_ms(start));
            let report = Report::Gaps(GapAnalysisReport::new(&candidate, &jobs, gap_report, metadata));
            emit_report(&config, &options, &report)
        }

        Commands::Rank {
            profile,
            jobs,
            top,
            output,
            detailed,
            save,
        } => {
            let options = OutputOptions::resolve(&config, output, detailed, save)?;
            check_record_file(&profile, "Profile")?;
            check_record_file(&jobs, "Jobs")?;

            let start = Instant::now();
            let engine = build_engine(&config)?;
            let mut input_manager = InputManager::new();
            let candidate = input_manager.load_profile(&profile).await?;
            let postings = input_manager.load_jobs(&jobs).await?;

            let progress = ProgressBar::new(postings.len() as u64);
            progress.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} jobs scored")
                    .map_err(|e| SkillMatchError::OutputFormatting(e.to_string()))?
                    .progress_chars("=> "),
            );
            if options.format != OutputFormat::Console {
                progress.set_draw_target(indicatif::ProgressDrawTarget::hidden());
            }

            let mut ranked = engine.rank_jobs_with(&candidate, &postings, |_| progress.inc(1));
            progress.finish_and_clear();

            if let Some(top) = top {
                ranked.truncate(top);
            }

            let metadata = ReportMetadata::new(engine.tables().version(), elapsed_ms(start));
            let report = Report::Ranking(RankingReport::new(&candidate, ranked, metadata));
            emit_report(&config, &options, &report)
        }

        Commands::RankCandidates {
            job,
            profiles,
            top,
            output,
            detailed,
            save,
        } => {
            let options = OutputOptions::resolve(&config, output, detailed, save)?;
            check_record_file(&job, "Job")?;
            check_record_file(&profiles, "Profiles")?;

            let start = Instant::now();
            let engine = build_engine(&config)?;
            let mut input_manager = InputManager::new();
            let posting = input_manager.load_jobs(&job).await?.into_iter().next().ok_or_else(|| {
                SkillMatchError::InvalidInput(format!("No job posting found in {}", job.display()))
            })?;
            let candidates = input_manager.load_profiles(&profiles).await?;

            info!("Ranking {} candidate(s) for {}", candidates.len(), posting.label());
            let mut ranked = engine.rank_candidates(&posting, &candidates);
            if let Some(top) = top {
                ranked.truncate(top);
            }

            let metadata = ReportMetadata::new(engine.tables().version(), elapsed_ms(start));
            let report = Report::Candidates(CandidateRankingReport::new(&posting, ranked, metadata));
            emit_report(&config, &options, &report)
        }

        Commands::Tables { action } => match action {
            TablesAction::Show => {
                let store = TableStore::from_config(&config.tables)?;
                let tables = store.snapshot();
                let source = config
                    .tables
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "embedded".to_string());

                println!("📚 Reference Tables\n");
                println!("Source: {}", source);
                println!("Version: {}", tables.version());
                println!("Aliases: {}", tables.aliases().len());
                println!("Courses: {}", tables.course_count());
                println!("\nCategories:");
                for category in tables.categories() {
                    println!("  • {} ({} members)", category.name, category.members.len());
                }
                Ok(())
            }

            TablesAction::Validate { path } => {
                let tables = match path.as_ref().or(config.tables.path.as_ref()) {
                    Some(path) => {
                        println!("🔍 Validating {}...", path.display());
                        ReferenceTables::from_path(path)?
                    }
                    None => {
                        println!("🔍 Validating embedded tables...");
                        ReferenceTables::embedded()?
                    }
                };
                println!(
                    "✅ Tables v{} are valid: {} aliases, {} categories, {} courses",
                    tables.version(),
                    tables.aliases().len(),
                    tables.categories().len(),
                    tables.course_count()
                );
                Ok(())
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Config File: {}", config_path.display());
                println!(
                    "Reference Tables: {}",
                    config
                        .tables
                        .path
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "embedded".to_string())
                );
                println!("\nSkill Scoring Weights:");
                println!("  Exact: {:.1}%", config.scoring.exact_weight * 100.0);
                println!("  Partial: {:.1}%", config.scoring.partial_weight * 100.0);
                println!("  Category: {:.1}%", config.scoring.category_weight * 100.0);
                println!("  Partial Threshold: {:.2}", config.scoring.partial_threshold);
                println!("\nRecommendations:");
                println!("  Top Gaps: {}", config.recommendations.max_gaps);
                println!("  Courses per Skill: {}", config.recommendations.courses_per_skill);
                println!("\nOutput: {:?} (detailed: {}, colors: {})",
                    config.output.format, config.output.detailed, config.output.color_output);
                Ok(())
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
                Ok(())
            }

            Some(ConfigAction::Set { key, value }) => {
                let mut updated = config;
                updated.set_value(&key, &value)?;
                updated.save_to(config_path)?;
                println!("✅ Set {} = {}", key, value);
                Ok(())
            }
        },
    }
}

fn build_engine(config: &Config) -> Result<SkillEngine> {
    let store = TableStore::from_config(&config.tables)?;
    Ok(SkillEngine::from_config(store.snapshot(), config))
}

fn check_record_file(path: &Path, label: &str) -> Result<()> {
    cli::validate_file_extension(path, RECORD_EXTENSIONS)
        .map_err(|e| SkillMatchError::InvalidInput(format!("{} file: {}", label, e)))
}

fn emit_report(config: &Config, options: &OutputOptions, report: &Report) -> Result<()> {
    // saved files never carry terminal colors
    let use_colors = config.output.color_output && options.save.is_none();
    let generator = ReportGenerator::with_options(use_colors, options.detailed);
    let content = generator.generate_report(report, &options.format)?;

    match &options.save {
        Some(path) => {
            save_report_to_file(&content, path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
