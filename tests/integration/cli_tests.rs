use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Isolated HOME, project directory and registry for one test.
struct Sandbox {
    home: TempDir,
    project: TempDir,
    registry: TempDir,
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

impl Sandbox {
    fn new() -> Self {
        let sandbox = Self {
            home: TempDir::new().unwrap(),
            project: TempDir::new().unwrap(),
            registry: TempDir::new().unwrap(),
        };
        let root = sandbox.registry.path();
        write(
            root,
            "index.cue",
            "roles: {\n\t\"golang/assistant\": {\n\t\tmodule: \"example.com/roles/golang/assistant@v0\"\n\t\tdescription: \"Go programming expert\"\n\t\ttags: [\"golang\", \"programming\"]\n\t}\n\t\"golang/code-review\": {\n\t\tmodule: \"example.com/roles/golang/code-review@v0\"\n\t\tdescription: \"Review Go code for quality\"\n\t\ttags: [\"golang\", \"review\"]\n\t}\n}\ntasks: {\n\t\"golang/review\": {\n\t\tmodule: \"example.com/tasks/golang/review@v0\"\n\t\tdescription: \"Review pending Go changes\"\n\t\ttags: [\"golang\"]\n\t}\n}\n",
        );
        write(
            root,
            "example.com/roles/golang/code-review/v0.1.0/asset.cue",
            "role: {\n\tdescription: \"Review Go code for quality\"\n\tprompt: \"You review Go code.\"\n}\n",
        );
        write(
            root,
            "example.com/tasks/golang/review/v0.1.0/asset.cue",
            "task: {\n\tdescription: \"Review pending Go changes\"\n\tprompt: \"Review the diff\"\n}\n",
        );
        write(
            root,
            "example.com/tasks/golang/review/v0.1.0/module.cue",
            "deps: {\n\t\"example.com/roles/golang/code-review@v0\": { v: \"v0.1.0\" }\n}\n",
        );
        sandbox
    }

    fn global_dir(&self) -> std::path::PathBuf {
        self.home.path().join("assets")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("assetctl"));
        cmd.current_dir(self.project.path())
            .env("HOME", self.home.path())
            .env("ASSETCTL_GLOBAL_DIR", self.global_dir())
            .env("ASSETCTL_REGISTRY", self.registry.path())
            .env_remove("ASSETCTL_INDEX")
            .env_remove("ASSETCTL_LOG");
        cmd
    }
}

#[test]
fn test_help_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("assetctl"));
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Search and install agents, roles, contexts and tasks",
        ))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("assetctl"));
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("assetctl "));
}

#[test]
fn test_search_requires_all_terms() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["search", "golang", "review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("golang/code-review"))
        .stdout(predicate::str::contains("golang/assistant").not());
}

#[test]
fn test_search_json() {
    let sandbox = Sandbox::new();
    let output = sandbox
        .cmd()
        .args(["search", "golang", "--json", "--limit", "2"])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let results: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["category"], "role");
    assert_eq!(results[0]["name"], "golang/assistant");
    assert_eq!(results[0]["score"], 4);
}

#[test]
fn test_search_by_tag_only() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["search", "--tag", "PROGRAMMING"])
        .assert()
        .success()
        .stdout(predicate::str::contains("golang/assistant"))
        .stdout(predicate::str::contains("golang/review").not());
}

#[test]
fn test_search_rejects_short_query() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["search", "go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("query too short"));
}

#[test]
fn test_search_without_registry() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env_remove("ASSETCTL_REGISTRY")
        .args(["search", "golang"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no registry configured"));
}

#[test]
fn test_install_task_with_role() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["install", "golang/review"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Installed role 'golang/code-review' from example.com/roles/golang/code-review@v0.1.0",
        ))
        .stdout(predicate::str::contains("Installed task 'golang/review'"));

    let tasks = fs::read_to_string(sandbox.global_dir().join("tasks.cue")).unwrap();
    assert!(tasks.contains("role: \"golang/code-review\""));
    assert!(sandbox.global_dir().join("roles.cue").exists());

    sandbox
        .cmd()
        .args(["install", "golang/review"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task 'golang/review'"))
        .stdout(predicate::str::contains("Installed role").not());
}

#[test]
fn test_install_local_and_list() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["install", "golang/code-review", "--category", "role", "--local"])
        .assert()
        .success();
    assert!(sandbox.project.path().join(".assetctl/roles.cue").exists());
    assert!(!sandbox.global_dir().join("roles.cue").exists());

    sandbox
        .cmd()
        .args(["list", "roles", "--local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("golang/code-review"))
        .stdout(predicate::str::contains("origin: example.com/roles/golang/code-review@v0.1.0"));

    sandbox
        .cmd()
        .args(["search", "review", "--installed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("golang/code-review"));
}

#[test]
fn test_install_unknown_asset() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["install", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_list_empty() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No assets installed."));
}

#[test]
fn test_config_show_and_validate() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            sandbox.registry.path().to_string_lossy().to_string(),
        ));

    fs::write(
        sandbox.project.path().join(".assetctl.toml"),
        "[search]\nlimit = \"many\"\n",
    )
    .unwrap();
    sandbox
        .cmd()
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration is invalid"));
}
