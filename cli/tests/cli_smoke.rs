//! End-to-end tests for the macrobook binary against a temporary data directory.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// A macrobook command pointed at `dir` instead of the platform data directory.
fn macrobook(dir: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("macrobook");
    cmd.arg("--data-dir").arg(dir.path());
    cmd
}

fn add_rice(dir: &TempDir) {
    macrobook(dir).args(["food", "add", "Rice"]).assert().success();
    macrobook(dir)
        .args(["food", "set", "Rice", "--proteins", "2.7", "--fats", "0.3", "--carbs", "28"])
        .assert()
        .success()
        .stdout(predicate::str::contains("126 kcal/100g"));
}

fn register_alice(dir: &TempDir) {
    macrobook(dir)
        .args(["user", "login", "alice", "--password", "pw", "--register"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered new user alice"));
}

fn set_alice_parameters(dir: &TempDir) {
    macrobook(dir)
        .args([
            "user", "set", "alice", "--password", "pw", "--sex", "male", "--age", "25",
            "--height", "180", "--weight", "80", "--activity", "moderate", "--goal", "maintain",
        ])
        .assert()
        .success();
}

// =============================================================================
// Help
// =============================================================================

#[test]
fn help_flag_works() {
    cargo_bin_cmd!("macrobook")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn subcommand_help_works() {
    for cmd in &["food", "user", "targets", "menu"] {
        cargo_bin_cmd!("macrobook")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

// =============================================================================
// Food catalog
// =============================================================================

#[test]
fn food_add_set_persists_csv() {
    let dir = TempDir::new().unwrap();
    add_rice(&dir);

    let csv = std::fs::read_to_string(dir.path().join("Food.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("product,proteins,fats,carbohydrates,calories")
    );
    assert!(lines.next().unwrap().starts_with("Rice,2.7,0.3,28"));
}

#[test]
fn food_add_duplicate_fails() {
    let dir = TempDir::new().unwrap();
    macrobook(&dir).args(["food", "add", "Rice"]).assert().success();
    macrobook(&dir)
        .args(["food", "add", "Rice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn food_list_json() {
    let dir = TempDir::new().unwrap();
    add_rice(&dir);
    macrobook(&dir).args(["food", "new"]).assert().success();

    let output = macrobook(&dir)
        .args(["food", "list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let foods: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<_> = foods
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Rice", "New Product 2"]);
    assert_eq!(foods[0]["calories_per_100g"], 126.0);
}

#[test]
fn food_rename_and_remove() {
    let dir = TempDir::new().unwrap();
    add_rice(&dir);
    macrobook(&dir)
        .args(["food", "rename", "Rice", "Brown rice"])
        .assert()
        .success();
    macrobook(&dir)
        .args(["food", "show", "Rice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
    macrobook(&dir)
        .args(["food", "show", "Brown rice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Proteins: 2.7"));
    macrobook(&dir)
        .args(["food", "remove", "Brown rice"])
        .assert()
        .success();
    macrobook(&dir)
        .args(["food", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No foods yet"));
}

#[test]
fn food_set_negative_rejected() {
    let dir = TempDir::new().unwrap();
    macrobook(&dir).args(["food", "add", "Oats"]).assert().success();
    macrobook(&dir)
        .args(["food", "set", "Oats", "--proteins=-1", "--fats", "0", "--carbs", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));
}

// =============================================================================
// Users and targets
// =============================================================================

#[test]
fn login_requires_registration() {
    let dir = TempDir::new().unwrap();
    macrobook(&dir)
        .args(["user", "login", "alice", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    register_alice(&dir);
    macrobook(&dir)
        .args(["user", "login", "alice", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as alice"));
    macrobook(&dir)
        .args(["user", "login", "alice", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password"));
}

#[test]
fn targets_unavailable_until_parameters_set() {
    let dir = TempDir::new().unwrap();
    register_alice(&dir);
    macrobook(&dir)
        .args(["targets", "alice", "--password", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Targets unavailable"));

    set_alice_parameters(&dir);
    macrobook(&dir)
        .args(["targets", "alice", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calories: 3357 kcal"))
        .stdout(predicate::str::contains("Proteins: 125 g"))
        .stdout(predicate::str::contains("maintain it"));
}

#[test]
fn user_set_rejects_unrealistic_age() {
    let dir = TempDir::new().unwrap();
    register_alice(&dir);
    macrobook(&dir)
        .args([
            "user", "set", "alice", "--password", "pw", "--sex", "female", "--age", "3",
            "--height", "165", "--weight", "60", "--activity", "0", "--goal", "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("age"));

    let output = macrobook(&dir)
        .args(["user", "show", "alice", "--password", "pw", "--json"])
        .output()
        .unwrap();
    let profile: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(profile["unfilled"], true);
    assert!(profile.get("password").is_none());
}

// =============================================================================
// Menu
// =============================================================================

#[test]
fn menu_totals_against_targets() {
    let dir = TempDir::new().unwrap();
    add_rice(&dir);
    register_alice(&dir);
    set_alice_parameters(&dir);

    macrobook(&dir)
        .args(["menu", "alice", "--password", "pw", "Rice=200", "Unicorn=50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Calories: 252 / 3357 kcal"))
        .stdout(predicate::str::contains("not in catalog"));
}

#[test]
fn menu_json_without_targets() {
    let dir = TempDir::new().unwrap();
    add_rice(&dir);
    register_alice(&dir);

    let output = macrobook(&dir)
        .args(["menu", "alice", "--password", "pw", "Rice", "Rice=0", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entries"].as_array().unwrap().len(), 1);
    assert_eq!(report["summary"]["totals"]["calories"], 126);
    assert!(report.get("targets").is_none());
}
