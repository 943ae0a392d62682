//! Integration tests for the `normalize` and `validate` commands

use assert_cmd::Command;
use predicates::prelude::*;

mod helpers;
use helpers::fixture_path;

fn ferrum_fhir() -> Command {
    Command::cargo_bin("ferrum-fhir").unwrap()
}

#[test]
fn test_normalize_orders_keys() {
    ferrum_fhir()
        .arg("normalize")
        .arg(fixture_path("goal.json"))
        .arg("--compact")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            r#"{"resourceType":"Goal","id":"g1","lifecycleStatus":"active","description":{"text":"walk"},"subject":{"reference":"Patient/example"},"target":[{"measure":{"text":"dose"},"detailQuantity":{"value":9007199254740993,"unit":"mg"}}]}"#,
        ));
}

#[test]
fn test_normalize_pretty_by_default() {
    ferrum_fhir()
        .arg("normalize")
        .arg(fixture_path("goal.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resourceType\": \"Goal\""))
        .stdout(predicate::str::contains("9007199254740993"));
}

#[test]
fn test_normalize_requires_resource_type() {
    ferrum_fhir()
        .arg("normalize")
        .arg(fixture_path("no_resource_type.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode resource"));
}

#[test]
fn test_normalize_missing_file() {
    ferrum_fhir()
        .args(["normalize", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_validate_valid_resource() {
    ferrum_fhir()
        .arg("validate")
        .arg(fixture_path("goal.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"resourceType\": \"OperationOutcome\""))
        .stdout(predicate::str::contains("\"issue\": []"));
}

#[test]
fn test_validate_unknown_modifier_fails_strict() {
    ferrum_fhir()
        .arg("validate")
        .arg(fixture_path("goal_unknown_modifier.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("OperationOutcome"))
        .stdout(predicate::str::contains("\"severity\": \"error\""))
        .stdout(predicate::str::contains("Goal.target[0].modifierExtension[0]"));
}

#[test]
fn test_validate_lenient_preset_downgrades_to_warning() {
    ferrum_fhir()
        .arg("validate")
        .arg(fixture_path("goal_unknown_modifier.json"))
        .args(["--preset", "lenient"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"severity\": \"warning\""));
}

#[test]
fn test_validate_with_config_file() {
    ferrum_fhir()
        .arg("validate")
        .arg(fixture_path("goal_unknown_modifier.json"))
        .arg("--config")
        .arg(fixture_path("allow_modifiers.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"severity\": \"warning\""));
}

#[test]
fn test_validate_rejects_bad_config() {
    ferrum_fhir()
        .arg("validate")
        .arg(fixture_path("goal.json"))
        .arg("--config")
        .arg(fixture_path("bad_config.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid validator configuration"));
}
