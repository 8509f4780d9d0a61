use std::path::Path;

use assert_cmd::Command;
use chrono::NaiveDate;
use git2::{Repository, Signature, Time};
use predicates::prelude::*;
use tempfile::TempDir;

use defectset::core::{DefectTicket, Release, Result};
use defectset::git::GitRepo;
use defectset::jira::{DefectSource, ReleaseSource, TicketBatch};
use defectset::output::{write_dataset, OutputOptions};
use defectset::{config::OutputFormat, Pipeline};

fn defectset() -> Command {
    Command::cargo_bin("defectset").expect("binary exists")
}

// ---------------------------------------------------------------------------
// CLI smoke tests
// ---------------------------------------------------------------------------

#[test]
fn test_help_output() {
    defectset()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("defect-prediction"))
        .stdout(predicate::str::contains("dataset"))
        .stdout(predicate::str::contains("releases"));
}

#[test]
fn test_version_output() {
    defectset()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_dataset_requires_project() {
    let temp = TempDir::new().unwrap();
    defectset()
        .current_dir(temp.path())
        .env_remove("DEFECTSET_PROJECT__KEY")
        .arg("dataset")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project key"));
}

#[test]
fn test_releases_requires_project() {
    let temp = TempDir::new().unwrap();
    defectset()
        .current_dir(temp.path())
        .env_remove("DEFECTSET_PROJECT__KEY")
        .arg("releases")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no project key"));
}

#[test]
fn test_missing_config_file() {
    defectset()
        .args(["--config", "/nonexistent/defectset.toml", "releases"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_unknown_format_rejected() {
    defectset()
        .args(["dataset", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

// ---------------------------------------------------------------------------
// End-to-end against a real repository
// ---------------------------------------------------------------------------

struct Tracker;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, m, d).unwrap()
}

impl ReleaseSource for Tracker {
    fn list_releases(&self, _project: &str) -> Result<Vec<Release>> {
        Ok(vec![
            Release::new("1.0", day(1, 28)),
            Release::new("1.1", day(2, 28)),
            Release::new("1.2", day(3, 28)),
        ])
    }
}

impl DefectSource for Tracker {
    fn list_fixed_defects(&self, _project: &str) -> Result<TicketBatch> {
        Ok(TicketBatch::from(vec![DefectTicket {
            key: "DEMO-1".into(),
            opened: day(1, 10),
            fixed: day(2, 5),
            affected_versions: vec!["1.0".into()],
        }]))
    }
}

fn commit_files(repo: &Repository, files: &[(&str, Option<&str>)], message: &str, epoch: i64) {
    let root = repo.workdir().unwrap().to_path_buf();
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full = root.join(path);
        match content {
            Some(text) => {
                std::fs::create_dir_all(full.parent().unwrap()).unwrap();
                std::fs::write(&full, text).unwrap();
                index.add_path(Path::new(path)).unwrap();
            }
            None => {
                std::fs::remove_file(&full).unwrap();
                index.remove_path(Path::new(path)).unwrap();
            }
        }
    }
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = Signature::new("dev", "dev@example.com", &Time::new(epoch, 0)).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap();
}

const A_V1: &str = "class A {\n  int a;\n  int b;\n  int c;\n  int d;\n}\n";
const A_V2: &str = "class A {\n  int a;\n  int b;\n  int c;\n  int d;\n  int e;\n}\n";

fn demo_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    let repo = Repository::init(temp.path()).unwrap();
    // 2020-01-05, 2020-02-05, 2020-02-10 at noon UTC
    commit_files(
        &repo,
        &[
            ("src/main/java/A.java", Some(A_V1)),
            ("src/test/java/ATest.java", Some("class ATest {}\n")),
            ("README.md", Some("demo\n")),
        ],
        "initial import",
        1_578_225_600,
    );
    commit_files(
        &repo,
        &[("src/main/java/A.java", Some(A_V2))],
        "DEMO-1: add missing field",
        1_580_904_000,
    );
    commit_files(
        &repo,
        &[
            ("src/main/java/A.java", None),
            ("src/main/java/B.java", Some(A_V2)),
        ],
        "move A to B",
        1_581_336_000,
    );
    temp
}

#[test]
fn test_pipeline_on_git_repository() {
    let temp = demo_repo();
    let repo = GitRepo::open(temp.path()).unwrap();
    let dataset = Pipeline::new(&Tracker, &Tracker, &repo).run("DEMO").unwrap();

    let a = dataset.instance("1.0", "src/main/java/A.java").unwrap();
    assert!(a.buggy);
    assert_eq!(a.size, 6);
    assert_eq!(a.revisions, 1);

    assert!(dataset.instance("1.1", "src/main/java/A.java").is_none());
    let b = dataset.instance("1.1", "src/main/java/B.java").unwrap();
    assert!(!b.buggy);
    assert_eq!(b.revisions, 2);
    assert_eq!(b.size, 7);
    assert!(b.previous_names.contains("src/main/java/A.java"));
    assert!(b.fixed_bugs.contains("DEMO-1"));

    let carried = dataset.instance("1.2", "src/main/java/B.java").unwrap();
    assert_eq!(carried.revisions, 0);
    assert_eq!(carried.historical_revisions, 3);

    assert!(dataset.instances.iter().all(|i| !i.filename.contains("test")));
    assert_eq!(dataset.instances.len(), 3);
    assert_eq!(dataset.horizon, vec!["1.0".to_string(), "1.1".to_string()]);
    assert_eq!(dataset.diagnostics.defects_kept, 1);
}

#[test]
fn test_written_dataset_files() {
    let temp = demo_repo();
    let repo = GitRepo::open(temp.path()).unwrap();
    let dataset = Pipeline::new(&Tracker, &Tracker, &repo).run("DEMO").unwrap();

    let out = TempDir::new().unwrap();
    let options = OutputOptions {
        dir: out.path().to_path_buf(),
        format: OutputFormat::Arff,
        full_history: true,
        write_snapshots: true,
    };
    let written = write_dataset(&dataset, "DEMO", &options).unwrap();
    assert_eq!(written.len(), 4);

    let arff = std::fs::read_to_string(out.path().join("DEMO_dataset.arff")).unwrap();
    assert!(arff.starts_with("@relation DEMO"));
    let data_rows = arff.lines().skip_while(|l| *l != "@data").skip(1).count();
    assert_eq!(data_rows, 3);
    assert!(out.path().join("DEMO_1.0_snapshot.arff").exists());
    assert!(out.path().join("DEMO_1.1_snapshot.arff").exists());
}
