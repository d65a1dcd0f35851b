//! Integration tests for the skill matcher

use skill_match::config::{Config, OutputFormat};
use skill_match::error::SkillMatchError;
use skill_match::input::manager::InputManager;
use skill_match::input::UserSkill;
use skill_match::output::formatter::ReportGenerator;
use skill_match::output::report::{GapAnalysisReport, Report, ReportMetadata};
use skill_match::processing::engine::SkillEngine;
use skill_match::reference::tables::EMBEDDED_TABLES;
use skill_match::reference::TableStore;
use std::path::Path;

fn engine() -> SkillEngine {
    SkillEngine::with_defaults().unwrap()
}

#[tokio::test]
async fn test_load_profile_from_json() {
    let mut manager = InputManager::new();
    let profile = manager
        .load_profile(Path::new("tests/fixtures/profile.json"))
        .await
        .unwrap();

    assert_eq!(profile.id.as_deref(), Some("alex"));
    assert_eq!(profile.skills.len(), 5);
    assert_eq!(
        profile.skills[1],
        UserSkill::Rated { name: "TypeScript".to_string(), level: 4.0 }
    );
    assert_eq!(profile.experience_years, Some(4.0));
}

#[tokio::test]
async fn test_load_jobs_in_every_shape() {
    let mut manager = InputManager::new();

    let list = manager.load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();
    assert_eq!(list.len(), 3);
    assert_eq!(list[1].label(), "Frontend Engineer");

    let wrapped = manager
        .load_jobs(Path::new("tests/fixtures/jobs_wrapped.json"))
        .await
        .unwrap();
    assert_eq!(wrapped.len(), 2);
    assert_eq!(wrapped[1].required_skills, vec!["Leadership", "Communication"]);

    let single = manager
        .load_jobs(Path::new("tests/fixtures/job_backend.toml"))
        .await
        .unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].experience_years, Some(6.0));
    assert_eq!(single[0].salary_max, Some(80000.0));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/profile.json");

    let first = manager.load_profile(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.load_profile(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.load_jobs(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.load_profile(Path::new("tests/fixtures/nonexistent.json")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_malformed_record_file() {
    let mut manager = InputManager::new();
    let result = manager.load_profile(Path::new("tests/fixtures/malformed.json")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_full_match_against_fixture_jobs() {
    let mut manager = InputManager::new();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();
    let e = engine();

    let frontend = e.compute_job_match(&profile, &jobs[1]);
    assert_eq!(frontend.match_score, 100);
    assert_eq!(frontend.matched_skills.len(), 3);
    assert!(frontend.missing_skills.is_empty());
    assert_eq!(frontend.experience_match, 100);
    assert_eq!(frontend.location_match, 100);
    assert_eq!(frontend.salary_match, 100);

    let ml = e.compute_job_match(&profile, &jobs[0]);
    assert!(ml.match_score < 20);
    assert!(ml.matched_skills.is_empty());
    assert_eq!(ml.experience_match, 80);
    assert_eq!(ml.location_match, 100);
    assert_eq!(ml.salary_match, 100);

    let platform = e.compute_job_match(&profile, &jobs[2]);
    assert!(platform.match_score >= 45 && platform.match_score < 100);
    assert!(platform.matched_skills.iter().any(|s| s == "docker"));
    assert!(platform.matched_skills.iter().any(|s| s == "postgresql"));
    assert!(platform.missing_skills.iter().any(|s| s == "terraform"));
    assert_eq!(platform.experience_match, 100);
    assert_eq!(platform.location_match, 50);
    assert_eq!(platform.salary_match, 50);
}

#[tokio::test]
async fn test_match_against_toml_job() {
    let mut manager = InputManager::new();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/job_backend.toml")).await.unwrap();

    let result = engine().compute_job_match(&profile, &jobs[0]);
    assert_eq!(result.matched_skills.len(), 2);
    assert!(result.missing_skills.iter().any(|s| s == "graphql"));
    assert!(result.match_score >= 60);
    assert_eq!(result.experience_match, 67);
    assert_eq!(result.location_match, 100);
    // 85k against an 80k ceiling
    assert_eq!(result.salary_match, 94);
}

#[tokio::test]
async fn test_rank_fixture_jobs() {
    let mut manager = InputManager::new();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();

    let ranked = engine().rank_jobs(&profile, &jobs);
    let ids: Vec<&str> = ranked.iter().filter_map(|r| r.job_id.as_deref()).collect();
    assert_eq!(ids, vec!["frontend", "platform", "ml"]);
    assert_eq!(ranked[0].index, 1);
}

#[tokio::test]
async fn test_gap_report_across_job_files() {
    let mut manager = InputManager::new();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    let jobs = manager
        .load_all_jobs(&["tests/fixtures/jobs.json", "tests/fixtures/job_backend.toml"])
        .await
        .unwrap();
    assert_eq!(jobs.len(), 4);

    let report = engine().gap_report(&profile, &jobs);

    let mut names: Vec<&str> = report.gaps.iter().map(|g| g.skill.as_str()).collect();
    let total = names.len();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), total, "gap skills must be unique");

    let typescript = report.gaps.iter().find(|g| g.skill == "typescript").unwrap();
    assert_eq!((typescript.current_level, typescript.target_level), (75, 85));
    let python = report.gaps.iter().find(|g| g.skill == "python").unwrap();
    assert_eq!((python.current_level, python.target_level), (30, 90));

    assert!(report.gaps.windows(2).all(|w| w[0].deficit() >= w[1].deficit()));
    assert!(!report.recommendations.is_empty());
    assert!(report
        .recommendations
        .windows(2)
        .all(|w| w[0].relevance >= w[1].relevance));

    let mut ids: Vec<&str> = report.recommendations.iter().map(|r| r.id.as_str()).collect();
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), count, "courses must not repeat");
}

#[tokio::test]
async fn test_json_gap_report_output() {
    let mut manager = InputManager::new();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs_wrapped.json")).await.unwrap();
    let e = engine();

    let gaps = e.gap_report(&profile, &jobs);
    let metadata = ReportMetadata::new(e.tables().version(), 1);
    let report = Report::Gaps(GapAnalysisReport::new(&profile, &jobs, gaps, metadata));

    let output = ReportGenerator::with_options(false, true)
        .generate_report(&report, &OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["candidate"], "alex");
    assert_eq!(value["jobs"][0], "Data Analyst");
    assert_eq!(value["metadata"]["tablesVersion"], "2024.06");
    let first_gap = &value["gaps"][0];
    assert!(first_gap["currentLevel"].is_u64());
    assert!(first_gap["avgSalaryIncrease"].as_str().unwrap().starts_with('+'));
}

#[tokio::test]
async fn test_table_reload_keeps_old_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tables.toml");
    std::fs::write(
        &path,
        EMBEDDED_TABLES.replacen("version = \"2024.06\"", "version = \"2024.07\"", 1),
    )
    .unwrap();

    let store = TableStore::from_config(&Config::default().tables).unwrap();
    let before = store.snapshot();
    let engine_before = SkillEngine::from_config(before.clone(), &Config::default());

    store.reload_from_path(&path).unwrap();
    assert_eq!(store.snapshot().version(), "2024.07");
    assert_eq!(engine_before.tables().version(), "2024.06");

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "version = [").unwrap();
    assert!(store.reload_from_path(&broken).is_err());
    assert_eq!(store.snapshot().version(), "2024.07");
}

#[tokio::test]
async fn test_engine_shared_across_tasks() {
    let mut manager = InputManager::new();
    let profile = manager.load_profile(Path::new("tests/fixtures/profile.json")).await.unwrap();
    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();
    let e = engine();
    let expected: Vec<_> = jobs.iter().map(|job| e.compute_job_match(&profile, job)).collect();

    let mut handles = Vec::new();
    for _ in 0..4 {
        let e = e.clone();
        let profile = profile.clone();
        let jobs = jobs.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            jobs.iter().map(|job| e.compute_job_match(&profile, job)).collect::<Vec<_>>()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_rank_candidates_from_profiles_file() {
    let mut manager = InputManager::new();
    let profiles = manager.load_profiles(Path::new("tests/fixtures/profiles.json")).await.unwrap();
    assert_eq!(profiles.len(), 3);
    assert_eq!(profiles[0].id, None);

    let jobs = manager.load_jobs(Path::new("tests/fixtures/jobs.json")).await.unwrap();
    let ranked = engine().rank_candidates(&jobs[1], &profiles);

    let ids: Vec<Option<&str>> = ranked.iter().map(|r| r.candidate_id.as_deref()).collect();
    assert_eq!(ids, vec![Some("sam"), Some("jo"), None]);
    assert_eq!(ranked[0].index, 1);
    assert!(ranked[0].result.missing_skills.iter().any(|s| s == "node.js"));
    assert!(ranked.windows(2).all(|w| w[0].result.match_score >= w[1].result.match_score));
}

#[tokio::test]
async fn test_single_profile_file_loads_as_one_candidate() {
    let mut manager = InputManager::new();
    let profiles = manager.load_profiles(Path::new("tests/fixtures/profile.json")).await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id.as_deref(), Some("alex"));
}

#[tokio::test]
async fn test_jobs_wrapper_must_hold_a_list() {
    let mut manager = InputManager::new();
    let result = manager.load_jobs(Path::new("tests/fixtures/jobs_bad_wrapper.json")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_job_without_required_skills_is_rejected() {
    let mut manager = InputManager::new();
    let result = manager
        .load_jobs(Path::new("tests/fixtures/job_missing_requirements.json"))
        .await;
    assert!(matches!(result, Err(SkillMatchError::InvalidInput(ref msg)) if msg.contains("requiredSkills")));
}
