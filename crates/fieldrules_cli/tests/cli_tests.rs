use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

/// Helper to create a Command for the fieldrules binary
#[allow(deprecated)]
fn fieldrules() -> Command {
    Command::cargo_bin("fieldrules").expect("Failed to find fieldrules binary")
}

// ============================================================================
// check command tests
// ============================================================================

#[test]
fn test_check_yaml_rules() {
    fieldrules()
        .arg("check")
        .arg(fixture_path("signup.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule definitions are valid"))
        .stdout(predicate::str::contains("Fields:      5"))
        .stdout(predicate::str::contains("email (Email address)"))
        .stdout(predicate::str::contains(r#""min":18"#));
}

#[test]
fn test_check_toml_rules() {
    fieldrules()
        .arg("check")
        .arg(fixture_path("signup.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Fields:      2"));
}

#[test]
fn test_check_json_output() {
    let output = fieldrules()
        .arg("check")
        .arg(fixture_path("conditional.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["plan"]["required"], true);
    assert_eq!(json["seats"]["excludeIf"][0]["field"], "plan");
    assert_eq!(json["seats"]["excludeIf"][0]["boolean"], "and");
    assert!(json["seats"]["integer"].is_null());
}

#[test]
fn test_check_unknown_rule() {
    fieldrules()
        .arg("check")
        .arg(fixture_path("unknown_rule.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid rules for field: email"))
        .stderr(predicate::str::contains(
            "Validation rule with id shouting has not been registered.",
        ));
}

#[test]
fn test_check_bad_rule_option() {
    fieldrules()
        .arg("check")
        .arg(fixture_path("bad_option.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "min validation rule requires a numeric value",
        ));
}

#[test]
fn test_check_missing_file() {
    fieldrules()
        .arg("check")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let rules_file = temp_dir.path().join("rules.ini");
    fs::write(&rules_file, "fields = {}").unwrap();

    fieldrules()
        .arg("check")
        .arg(&rules_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format: ini"));
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_passing_values() {
    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("valid_values.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Validation PASSED"))
        .stdout(predicate::str::contains("age: 36"))
        .stdout(predicate::str::contains("newsletter: true"));
}

#[test]
fn test_validate_failing_values() {
    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("invalid_values.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains(
            "Email address is not a valid email address",
        ))
        .stdout(predicate::str::contains(
            "age must be greater than or equal to 18",
        ))
        .stdout(predicate::str::contains("Company name is required"));
}

#[test]
fn test_validate_json_output() {
    let output = fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("invalid_values.json"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["summary"]["error_count"], 3);
    assert_eq!(json["errors"]["company"], "Company name is required");
    assert_eq!(json["validated"]["age"], 12);
    assert!(json["validated"]["newsletter"].is_null());
}

#[test]
fn test_validate_extra_values_warn() {
    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("extra_values.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Warnings:"))
        .stdout(predicate::str::contains("No rules defined for field referrer"));
}

#[test]
fn test_validate_strict_mode() {
    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(fixture_path("extra_values.json"))
        .arg("--strict")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Validation FAILED"))
        .stdout(predicate::str::contains("No rules defined for field referrer"));
}

#[test]
fn test_validate_condition_fault() {
    let temp_dir = TempDir::new().unwrap();
    let values_file = temp_dir.path().join("values.json");
    fs::write(&values_file, r#"{"company": ""}"#).unwrap();

    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(&values_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation aborted"))
        .stderr(predicate::str::contains(
            "Field account_type not found in test values.",
        ));
}

#[test]
fn test_validate_malformed_values() {
    let temp_dir = TempDir::new().unwrap();
    let values_file = temp_dir.path().join("values.json");
    fs::write(&values_file, "[1, 2, 3]").unwrap();

    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg(&values_file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse values file"));
}

#[test]
fn test_validate_missing_values_file() {
    fieldrules()
        .arg("validate")
        .arg(fixture_path("signup.yml"))
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read values file"));
}

// ============================================================================
// general CLI tests
// ============================================================================

#[test]
fn test_cli_help() {
    fieldrules()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Field validation rules CLI"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_cli_version() {
    fieldrules()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fieldrules"));
}

#[test]
fn test_validate_help() {
    fieldrules()
        .arg("validate")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--strict"))
        .stdout(predicate::str::contains("--format"));
}
