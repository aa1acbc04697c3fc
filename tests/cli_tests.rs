//! End-to-end tests of the `hbudget` binary against a throwaway data directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hbudget(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hbudget").unwrap();
    cmd.env("HOME_BUDGET_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

fn stdout_of(dir: &TempDir, args: &[&str]) -> String {
    let output = hbudget(dir).args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

/// Pull the first short ID with the given prefix out of command output
fn first_id(output: &str, prefix: &str) -> String {
    let start = output.find(prefix).unwrap();
    output[start..start + prefix.len() + 8].to_string()
}

#[test]
fn init_seeds_categories_once() {
    let dir = TempDir::new().unwrap();

    hbudget(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 15 standard categories"));

    hbudget(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));

    hbudget(&dir)
        .args(["category", "list", "--kind", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"));
}

#[test]
fn configured_date_format_applies_to_output() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), r#"{"date_format": "%d.%m.%Y"}"#).unwrap();

    hbudget(&dir)
        .args(["expense", "add", "4", "food", "--date", "2025-03-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in Food on 02.03.2025"));

    hbudget(&dir)
        .args(["expense", "list", "--period", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("02.03.2025"))
        .stdout(predicate::str::contains("2025-03-02").not());
}

#[test]
fn expense_round_trip() {
    let dir = TempDir::new().unwrap();

    hbudget(&dir)
        .args(["expense", "add", "12.50", "food", "--date", "2025-03-02", "--comment", "bread"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-$12.50 in Food on 2025-03-02"));

    hbudget(&dir)
        .args(["expense", "list", "--period", "2025-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bread"))
        .stdout(predicate::str::contains("1 record(s), total -$12.50"));

    hbudget(&dir)
        .args(["expense", "total", "--period", "2025-04"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$0.00"));
}

#[test]
fn unknown_category_is_rejected() {
    let dir = TempDir::new().unwrap();

    hbudget(&dir)
        .args(["expense", "add", "5", "Spaceships"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn loan_is_settled_by_repayments() {
    let dir = TempDir::new().unwrap();

    let added = stdout_of(&dir, &["loan", "add", "Bob", "50", "--date", "2025-01-01"]);
    let id = first_id(&added, "dbt-");

    hbudget(&dir)
        .args(["loan", "repay", &id, "20", "--date", "2025-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Outstanding with Bob: $30.00"));

    hbudget(&dir)
        .args(["loan", "repay", &id, "40", "--date", "2025-01-11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds outstanding balance"));

    hbudget(&dir)
        .args(["loan", "repay", &id, "30", "--date", "2025-01-12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bob is settled."));

    hbudget(&dir)
        .args(["loan", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No loan records found."));

    hbudget(&dir)
        .args(["loan", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Closed"));
}

#[test]
fn task_reminders_are_scheduled() {
    let dir = TempDir::new().unwrap();

    let added = stdout_of(
        &dir,
        &["task", "add", "Renew insurance", "--start", "2099-05-01 10:00", "--reminder", "1d"],
    );
    assert!(added.contains("Reminder at 2099-04-30 10:00"));
    let id = first_id(&added, "tsk-");

    hbudget(&dir)
        .args(["task", "reminders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renew insurance"));

    hbudget(&dir).args(["task", "done", &id]).assert().success();

    hbudget(&dir)
        .args(["task", "reminders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No reminders scheduled."));
}

#[test]
fn savings_goal_progress() {
    let dir = TempDir::new().unwrap();

    let added = stdout_of(
        &dir,
        &["plan", "add", "Bike", "600", "--kind", "savings", "--start", "2025-01-01", "--end", "2099-12-31"],
    );
    let id = first_id(&added, "pln-");

    hbudget(&dir)
        .args(["plan", "contribute", &id, "150"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bike: $150.00 of $600.00 saved"));

    hbudget(&dir)
        .args(["report", "plans"])
        .assert()
        .success()
        .stdout(predicate::str::contains("On track"));
}

#[test]
fn json_export_is_valid() {
    let dir = TempDir::new().unwrap();
    hbudget(&dir)
        .args(["income", "add", "3000", "Salary", "--date", "2025-03-01"])
        .assert()
        .success();

    let output = stdout_of(&dir, &["export", "json"]);
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["metadata"]["income_count"], 1);
    assert_eq!(value["incomes"][0]["category"], "Salary");
}

#[test]
fn backup_and_audit() {
    let dir = TempDir::new().unwrap();
    hbudget(&dir)
        .args(["category", "add", "Pets"])
        .assert()
        .success();

    hbudget(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: backup-"));

    hbudget(&dir)
        .args(["backup", "validate", "latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("categories   16"));

    hbudget(&dir)
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pets"));
}
