// tests/integration_test.rs
use git2::{Repository as Git2Repo, Signature};
use semrel::config::{parse_config, Config};
use semrel::git::{Git2Repository, Repository};
use semrel::{Decision, History, LevelBump, ReleasePolicy};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Temporary repository whose commits each write one file
struct TestRepo {
    dir: TempDir,
    repo: Git2Repo,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repo::init(dir.path()).unwrap();
        repo.set_head("refs/heads/main").unwrap();
        TestRepo { dir, repo }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn commit(&self, file: &str, message: &str) -> git2::Oid {
        let full = self.path().join(file);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, message).unwrap();

        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new(file)).unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("Test", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    fn tag(&self, name: &str, oid: git2::Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo.tag_lightweight(name, &object, false).unwrap();
    }

    fn annotated_tag(&self, name: &str, oid: git2::Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();
        self.repo.tag(name, &object, &sig, name, false).unwrap();
    }
}

fn run(config: &Config, history: &History, branch: &str, policy: ReleasePolicy) -> Decision {
    let branch = config.branch(branch).unwrap();
    config
        .analyzer(policy)
        .unwrap()
        .next_version(history, &branch)
        .unwrap()
        .decision
}

fn released(decision: &Decision) -> String {
    match decision {
        Decision::Release { version, .. } => version.to_string(),
        Decision::NoReleaseDue => "no release".to_string(),
    }
}

#[test]
fn test_scenario_feature_since_release() {
    let config = Config::default();
    let history = History::linear(&["chore: init", "fix: a", "feat: b"]).with_tag("v1.0.0", "c0");
    let decision = run(&config, &history, "main", config.policy());
    assert_eq!(released(&decision), "1.1.0");
}

#[test]
fn test_scenario_breaking_change_on_zero_major() {
    let config = parse_config("allow_zero_version = false").unwrap();
    let history = History::linear(&["chore: init", "feat!: break"]).with_tag("v0.4.0", "c0");
    let decision = run(&config, &history, "main", config.policy());
    assert_eq!(released(&decision), "0.5.0");
}

#[test]
fn test_scenario_prerelease_revision() {
    let config = parse_config(
        r#"
[[branches]]
name = "rc"
match = "^rc/"
prerelease = true
prerelease_token = "rc"
"#,
    )
    .unwrap();
    let history = History::linear(&["chore: init", "fix: x"]).with_tag("v2.0.0-rc.1", "c0");
    let decision = run(&config, &history, "rc/2.0", config.policy());
    assert_eq!(released(&decision), "2.0.0-rc.2");
}

#[test]
fn test_scenario_no_unreleased_commits() {
    let config = Config::default();
    let history = History::linear(&["feat: init"]).with_tag("v1.0.0", "c0");
    let decision = run(&config, &history, "main", config.policy());
    assert_eq!(decision, Decision::NoReleaseDue);
}

#[test]
fn test_other_grammars_end_to_end() {
    let history = History::linear(&["init", ":sparkles: Add search", ":bug: Fix crash"])
        .with_tag("v1.0.0", "c0");
    let config = parse_config(r#"commit_parser = "emoji""#).unwrap();
    assert_eq!(released(&run(&config, &history, "main", config.policy())), "1.1.0");

    let history = History::linear(&["init", "BUG: fix overflow", "DOC: typo"])
        .with_tag("v1.0.0", "c0");
    let config = parse_config(r#"commit_parser = "scipy""#).unwrap();
    assert_eq!(released(&run(&config, &history, "main", config.policy())), "1.0.1");
}

#[test]
fn test_custom_tag_format() {
    let config = parse_config(r#"tag_format = "api/v{version}""#).unwrap();
    let history = History::linear(&["chore: init", "fix: a"])
        .with_tag("api/v3.1.0", "c0")
        .with_tag("v9.0.0", "c0");
    let decision = run(&config, &history, "main", config.policy());
    match decision {
        Decision::Release { version, level } => {
            assert_eq!(version.as_tag(), "api/v3.1.1");
            assert_eq!(level, LevelBump::Patch);
        }
        Decision::NoReleaseDue => panic!("expected a release"),
    }
}

#[test]
fn test_git_repository_end_to_end() {
    let repo = TestRepo::new();
    let first = repo.commit("README.md", "chore: init");
    repo.annotated_tag("v1.2.0", first);
    repo.commit("src/lib.rs", "fix: off by one");
    repo.commit("src/api.rs", "feat(api): add endpoint");

    let reader = Git2Repository::open(repo.path()).unwrap();
    assert_eq!(reader.current_branch().unwrap(), "main");

    let history = reader.history(false).unwrap();
    assert_eq!(history.commits.len(), 3);

    let config = Config::default();
    let decision = run(&config, &history, "main", config.policy());
    assert_eq!(released(&decision), "1.3.0");
}

#[test]
fn test_monorepo_package_scoping() {
    let repo = TestRepo::new();
    let first = repo.commit("packages/api/lib.rs", "chore: init");
    repo.tag("api-v0.3.0", first);
    repo.commit("packages/web/app.ts", "feat: new widget");
    repo.commit("packages/api/lib.rs", "fix: null check");

    let config = parse_config(
        r#"
tag_format = "api-v{version}"

[monorepo]
path_filters = ["packages/api"]
"#,
    )
    .unwrap();
    assert!(config.needs_paths());

    let history = Git2Repository::open(repo.path())
        .unwrap()
        .history(config.needs_paths())
        .unwrap();
    let decision = run(&config, &history, "main", config.policy());
    assert_eq!(released(&decision), "0.3.1");
}

fn semrel(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_semrel"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_semrel_help() {
    let dir = TempDir::new().unwrap();
    let output = semrel(dir.path(), &["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("semrel"));
    assert!(stdout.contains("Compute the next semantic version"));
}

#[test]
fn test_semrel_prints_next_version() {
    let repo = TestRepo::new();
    let first = repo.commit("a.txt", "chore: init");
    repo.tag("v0.1.0", first);
    repo.commit("b.txt", "feat: something");

    let config = repo.path().join("semrel.toml");
    fs::write(&config, "").unwrap();
    let config = config.to_str().unwrap();

    let output = semrel(repo.path(), &["--config", config]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "0.2.0");

    let output = semrel(repo.path(), &["--config", config, "--print-tag", "--major"]);
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "v0.2.0");

    let output = semrel(
        repo.path(),
        &["--config", config, "--as-prerelease", "--build-metadata", "ci.1"],
    );
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "0.2.0-rc.1+ci.1"
    );
}

#[test]
fn test_semrel_on_unconfigured_branch() {
    let repo = TestRepo::new();
    repo.commit("a.txt", "feat: init");

    let config = repo.path().join("semrel.toml");
    fs::write(&config, "").unwrap();

    let output = semrel(
        repo.path(),
        &[
            "--config",
            config.to_str().unwrap(),
            "--branch",
            "feature/x",
        ],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("no release will be made"));
}

#[test]
fn test_semrel_strict_fails_on_unconfigured_branch() {
    let repo = TestRepo::new();
    repo.commit("a.txt", "feat: init");

    let config = repo.path().join("semrel.toml");
    fs::write(&config, "").unwrap();
    let config = config.to_str().unwrap();

    let output = semrel(
        repo.path(),
        &["--config", config, "--strict", "--branch", "feature/x"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("feature/x"));

    fs::write(repo.path().join("semrel.toml"), "strict = true").unwrap();
    let output = semrel(repo.path(), &["--config", config, "--branch", "feature/x"]);
    assert!(!output.status.success());
}

#[test]
fn test_semrel_rejects_bad_config() {
    let repo = TestRepo::new();
    repo.commit("a.txt", "feat: init");

    let config = repo.path().join("semrel.toml");
    fs::write(&config, "tag_format = \"release\"").unwrap();

    let output = semrel(repo.path(), &["--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid tag format"));
}
