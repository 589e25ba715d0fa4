//! CLI integration tests
//!
//! Run the binary against a directory of saved portal pages so that no
//! network access is needed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../pallada-core/tests/fixtures")
        .join(name)
}

/// Proxy dir holding group 3099 and professor 13500; other catalog ids are missing
fn setup_portal(temp_dir: &TempDir) -> PathBuf {
    let proxy = temp_dir.path().join("pages");
    fs::create_dir_all(&proxy).unwrap();
    fs::copy(fixture("group_page.html"), proxy.join("group_3099.html")).unwrap();
    fs::copy(
        fixture("professor_page.html"),
        proxy.join("professor_13500.html"),
    )
    .unwrap();
    proxy
}

fn run(temp_dir: &TempDir, args: &[&str]) -> Output {
    let proxy = temp_dir.path().join("pages");
    let snapshots = temp_dir.path().join("snapshots");
    Command::new(env!("CARGO_BIN_EXE_pallada-cli"))
        .arg("--proxy-dir")
        .arg(&proxy)
        .arg("--snapshot-dir")
        .arg(&snapshots)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_schedule_fresh_then_proxy() {
    let temp_dir = TempDir::new().unwrap();
    setup_portal(&temp_dir);

    let first = run(&temp_dir, &["schedule", "ив21"]);
    assert!(first.status.success(), "stderr: {}", String::from_utf8_lossy(&first.stderr));
    let out = stdout(&first);
    assert!(out.contains("ИВ-21"));
    assert!(out.contains("[FRESH"));
    assert!(out.contains("Математический анализ"));

    let second = run(&temp_dir, &["schedule", "ИВ-21"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("[PROXY"));
}

#[test]
fn test_schedule_refresh_reports_changes() {
    let temp_dir = TempDir::new().unwrap();
    let proxy = setup_portal(&temp_dir);
    assert!(run(&temp_dir, &["schedule", "ив21"]).status.success());

    let page = fs::read_to_string(proxy.join("group_3099.html")).unwrap();
    fs::write(proxy.join("group_3099.html"), page.replace("Н 305", "Л 404")).unwrap();

    let output = run(&temp_dir, &["schedule", "ив21", "--refresh"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[CHANGED"));
    assert!(out.contains("## Schedule Changes"));
    assert!(out.contains("Корпус Н / Н 305 → Корпус Н / Л 404"));
}

#[test]
fn test_schedule_json_output() {
    let temp_dir = TempDir::new().unwrap();
    setup_portal(&temp_dir);

    let output = run(&temp_dir, &["schedule", "Иванов", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["source"], "FRESH");
    assert_eq!(value["model"]["entity_type"], "professor");
    assert_eq!(value["changes"].as_array().unwrap().len(), 0);
    assert_eq!(
        value["model"]["consultation_lessons"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_schedule_unknown_query_fails() {
    let temp_dir = TempDir::new().unwrap();
    setup_portal(&temp_dir);

    let output = run(&temp_dir, &["schedule", "qqqqqqqqqqqq"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_search_lists_matches() {
    let temp_dir = TempDir::new().unwrap();
    setup_portal(&temp_dir);

    let output = run(&temp_dir, &["search", "ivanov"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("13500"));
    assert!(out.contains("Иванов Иван Иванович"));
}

#[test]
fn test_catalog_export() {
    let temp_dir = TempDir::new().unwrap();
    setup_portal(&temp_dir);
    let export = temp_dir.path().join("catalog.json");

    let output = run(
        &temp_dir,
        &["catalog", "--export", export.to_str().unwrap()],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("2 entities"));

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    let entries = raw.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], 3099);
}

#[test]
fn test_catalog_import_replaces_stored_catalog() {
    let temp_dir = TempDir::new().unwrap();
    setup_portal(&temp_dir);
    let listing = temp_dir.path().join("listing.json");
    fs::write(
        &listing,
        r#"[{"name": "ИВ-21", "type": "group", "id": 3099,
             "url": "https://timetable.pallada.sibsau.ru/timetable/group/3099"}]"#,
    )
    .unwrap();

    let output = run(
        &temp_dir,
        &["catalog", "--import", listing.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("1 entities"));

    let search = run(&temp_dir, &["search", "Иванов Иван Иванович"]);
    assert!(search.status.success());
    assert!(!stdout(&search).contains("13500"));
}

#[test]
fn test_diff_between_saved_pages() {
    let temp_dir = TempDir::new().unwrap();
    let old = fixture("group_page.html");
    let new = temp_dir.path().join("new.html");
    fs::write(&new, fs::read_to_string(&old).unwrap().replace("Н 305", "Л 404")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pallada-cli"))
        .arg("diff")
        .arg(&old)
        .arg(&new)
        .output()
        .expect("Failed to run CLI");
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("**location** changed at week 2"));

    let same = Command::new(env!("CARGO_BIN_EXE_pallada-cli"))
        .args(["diff", "--type", "group"])
        .arg(&old)
        .arg(&old)
        .output()
        .expect("Failed to run CLI");
    assert!(stdout(&same).contains("No changes detected"));
}
