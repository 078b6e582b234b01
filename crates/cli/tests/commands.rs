use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const APP: &str = r#"import os

# database connection

DB_URL = os.environ.get("DB_URL")


def debug_enabled():
    # toggles verbose output
    return os.getenv("DEBUG", False)
"#;

#[allow(deprecated)]
fn envcat(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("envcat").expect("binary");
    cmd.current_dir(workdir).env_clear().arg("--root").arg(workdir);
    cmd
}

fn setup_repo() -> TempDir {
    let temp = tempdir().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("service")).unwrap();
    fs::write(root.join("service/app.py"), APP).unwrap();
    temp
}

fn create(root: &Path) {
    envcat(root)
        .args(["create", "-o", "catalog.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 unique environment variables"));
}

fn read_catalog(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn create_writes_catalog() {
    let temp = setup_repo();
    create(temp.path());

    let catalog = read_catalog(&temp.path().join("catalog.json"));
    assert_eq!(catalog[0]["name"], "DB_URL");
    assert_eq!(catalog[0]["has_default"], false);
    assert_eq!(catalog[0]["locations"][0]["line"], 5);
    assert_eq!(catalog[1]["name"], "DEBUG");
    assert_eq!(catalog[1]["default_value"], false);
    assert_eq!(catalog[1]["tags"][0], "service");
}

#[test]
fn verify_exit_codes_follow_policy() {
    let temp = setup_repo();
    create(temp.path());

    envcat(temp.path())
        .args(["verify", "-c", "catalog.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗ ERROR - Required variable not set"))
        .stderr(predicate::str::contains("DB_URL"));

    envcat(temp.path())
        .env("DB_URL", "postgres://localhost/app")
        .args(["verify", "-c", "catalog.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "WARNING: 1 environment variables are using defaults",
        ));

    envcat(temp.path())
        .env("DB_URL", "postgres://localhost/app")
        .args(["verify", "-c", "catalog.json", "--warning-as-error"])
        .assert()
        .failure();
}

#[test]
fn verify_structured_output_is_json() {
    let temp = setup_repo();
    create(temp.path());

    let output = envcat(temp.path())
        .env("DB_URL", "x")
        .env("DEBUG", "1")
        .args(["verify", "-c", "catalog.json", "-s"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["present"], 2);
    assert_eq!(report["checks"][0]["status"], "set");
}

#[test]
fn verify_against_task_definition_file() {
    let temp = setup_repo();
    create(temp.path());
    fs::write(
        temp.path().join("taskdef.json"),
        r#"{"taskDefinition": {"containerDefinitions": [
              {"environment": [{"name": "DB_URL", "value": "x"}, {"name": "DEBUG", "value": "0"}]}
           ]}}"#,
    )
    .unwrap();

    envcat(temp.path())
        .args(["verify", "-c", "catalog.json", "-d", "taskdef.json", "--warning-as-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
}

#[test]
fn verify_filters_by_tag() {
    let temp = setup_repo();
    create(temp.path());

    envcat(temp.path())
        .args(["verify", "-c", "catalog.json", "-t", "other-service"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total variables checked: 0"));
}

#[test]
fn missing_catalog_is_an_error() {
    let temp = setup_repo();
    envcat(temp.path())
        .args(["verify", "-c", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn catalog_path_from_environment() {
    let temp = setup_repo();
    envcat(temp.path())
        .env("ENVCAT_CATALOG", "from-env.json")
        .arg("create")
        .assert()
        .success();
    assert!(temp.path().join("from-env.json").exists());
}

#[test]
fn check_and_update_track_new_variables() {
    let temp = setup_repo();
    create(temp.path());

    envcat(temp.path())
        .args(["check", "-c", "catalog.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All environment variables in code are documented"));

    fs::create_dir_all(temp.path().join("worker")).unwrap();
    fs::write(
        temp.path().join("worker/jobs.py"),
        "import os\nQUEUE = os.getenv('QUEUE_URL', 'memory://')\n",
    )
    .unwrap();

    let output = envcat(temp.path())
        .args(["check", "-c", "catalog.json", "--structured-output"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let findings: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(findings["QUEUE_URL"]["default_value"], "memory://");
    assert_eq!(findings["QUEUE_URL"]["locations"][0]["file"], "worker/jobs.py");

    envcat(temp.path())
        .args(["update", "-o", "catalog.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 new variables"));

    envcat(temp.path())
        .args(["check", "-c", "catalog.json"])
        .assert()
        .success();
}

#[test]
fn tags_from_env_tags_present_variables() {
    let temp = setup_repo();
    create(temp.path());

    envcat(temp.path())
        .env("DEBUG", "1")
        .args(["tags_from_env", "-c", "catalog.json", "-t", "prod", "-t", "eu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tagged 1 variables"));

    let catalog = read_catalog(&temp.path().join("catalog.json"));
    assert_eq!(catalog[0]["tags"], serde_json::json!(["service"]));
    assert_eq!(catalog[1]["tags"], serde_json::json!(["eu", "prod", "service"]));
}

#[test]
fn tags_from_definition_to_separate_output() {
    let temp = setup_repo();
    create(temp.path());
    fs::write(
        temp.path().join("taskdef.json"),
        r#"{"containerDefinitions": [{"secrets": [{"name": "DB_URL", "valueFrom": "arn"}]}]}"#,
    )
    .unwrap();

    envcat(temp.path())
        .args([
            "tags-from-env",
            "-c",
            "catalog.json",
            "-o",
            "tagged.json",
            "-t",
            "api",
            "-d",
            "taskdef.json",
        ])
        .assert()
        .success();

    let tagged = read_catalog(&temp.path().join("tagged.json"));
    assert_eq!(tagged[0]["tags"], serde_json::json!(["api", "service"]));
    let original = read_catalog(&temp.path().join("catalog.json"));
    assert_eq!(original[0]["tags"], serde_json::json!(["service"]));
}

#[test]
fn tags_are_required() {
    let temp = setup_repo();
    create(temp.path());
    envcat(temp.path())
        .args(["tags-from-env", "-c", "catalog.json"])
        .assert()
        .failure();
}

#[test]
fn strict_verify_names_required_variable() {
    let temp = setup_repo();
    create(temp.path());

    envcat(temp.path())
        .args(["verify", "-c", "catalog.json", "--warning-as-error"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Required environment variable 'DB_URL' is missing",
        ))
        .stderr(predicate::str::contains("'DEBUG'").not());
}

#[test]
fn wildcard_tag_matches_every_filter() {
    let temp = setup_repo();
    create(temp.path());

    envcat(temp.path())
        .env("DEBUG", "1")
        .args(["tags-from-env", "-c", "catalog.json", "-t", "__all__"])
        .assert()
        .success();

    envcat(temp.path())
        .args(["verify", "-c", "catalog.json", "-t", "other-service"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/1] DEBUG"));

    envcat(temp.path())
        .args(["verify", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("__all__"));
}
