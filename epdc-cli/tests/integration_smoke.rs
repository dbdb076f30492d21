//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn epdc() -> Command {
    Command::cargo_bin("epdc").unwrap()
}

#[test]
fn test_top_level_help_lists_entities() {
    epdc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("company"))
        .stdout(predicate::str::contains("siren-type"))
        .stdout(predicate::str::contains("completions"));
}

// === Dictionary Command Tests ===

#[test]
fn test_scope_add_help() {
    epdc()
        .args(["scope", "add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry name"));
}

#[test]
fn test_department_update_help() {
    epdc()
        .args(["department", "update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New name"));
}

// === Post Command Tests ===

#[test]
fn test_post_list_help() {
    epdc()
        .args(["post", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Only civil-defence posts"));
}

#[test]
fn test_post_list_rejects_both_filters() {
    epdc()
        .args(["post", "list", "--go", "--no-go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

// === Company / Contact Command Tests ===

#[test]
fn test_company_add_help() {
    epdc()
        .args(["company", "add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Phone number, digits only"))
        .stdout(predicate::str::contains("--replace-channels"));
}

#[test]
fn test_contact_by_company_help() {
    epdc()
        .args(["contact", "by-company", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Company ID"));
}

#[test]
fn test_contact_rejects_bad_birthday() {
    epdc()
        .args(["contact", "add", "--name", "Иванов", "--birthday", "1971-09-03"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dd.mm.yyyy"));
}

// === Practice / Education / Siren Command Tests ===

#[test]
fn test_practice_add_help() {
    epdc()
        .args(["practice", "add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Date of practice"));
}

#[test]
fn test_education_add_requires_dates() {
    epdc()
        .args(["education", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--start"));
}

#[test]
fn test_siren_type_add_help() {
    epdc()
        .args(["siren-type", "add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Audible radius"));
}

#[test]
fn test_siren_update_help() {
    epdc()
        .args(["siren", "update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inventory number"));
}

// === Config / Completions Tests ===

#[test]
fn test_config_path_honours_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("epdc.toml");

    epdc()
        .env("EPDC_CONFIG", &path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("epdc.toml"));
}

#[test]
fn test_config_init_then_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    epdc()
        .env("EPDC_CONFIG", &path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    epdc()
        .env("EPDC_CONFIG", &path)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_config_show_masks_password() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[database]\nname = \"epdc\"\nuser = \"clerk\"\npassword = \"hunter2\"\n",
    )
    .unwrap();

    epdc()
        .env("EPDC_CONFIG", &path)
        .env_remove("DATABASE_URL")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("********"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn test_bad_logging_level_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"epdc=loud\"\n").unwrap();

    epdc()
        .env("EPDC_CONFIG", &path)
        .env_remove("RUST_LOG")
        .args(["config", "path"])
        .assert()
        .success()
        .stderr(predicate::str::contains("logging disabled"))
        .stderr(predicate::str::contains("epdc=loud"));
}

// Run with: DATABASE_URL=postgres://... cargo test -p epdc-cli -- --ignored
#[test]
#[ignore = "requires database"]
fn test_init_checks_every_table() {
    let dir = tempfile::tempdir().unwrap();

    epdc()
        .env("EPDC_CONFIG", dir.path().join("absent.toml"))
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Directory tables ready"))
        .stdout(predicate::str::contains("sirens"));
}

#[test]
fn test_completions_bash() {
    epdc()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("epdc"));
}
