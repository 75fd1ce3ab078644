//! CLI integration tests.

mod support;
use support::*;

use predicates::prelude::*;

#[test]
fn test_init_writes_config() {
    let t = Test::init();
    assert!(t.config_path().exists());

    let contents = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(contents.contains("[clusters]"));
    assert!(contents.contains("rds.logical_replication"));
}

#[test]
fn test_init_refuses_overwrite() {
    let t = Test::init();
    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    let output = t.cmd().args(["init", "--force"]).output().unwrap();
    assert_success(&output);
}

#[test]
fn test_missing_config_suggests_init() {
    let t = Test::new();
    let output = t.plan();
    assert_failure(&output);
    assert_stderr_contains(&output, "config not found");
    assert_stderr_contains(&output, "repl-topology init");
}

#[test]
fn test_check_shows_toggles() {
    let t = Test::with_config(&full_config());
    let output = t.check();
    assert_success(&output);
    assert_stdout_contains(&output, "clusters.enabled");
    assert_stdout_contains(&output, "compute.enabled");
    assert_stdout_contains(&output, "config is valid");
}

#[test]
fn test_missing_toggle_is_an_error() {
    let t = Test::with_config(&config_toml("dev", None, Some(false)));
    t.cmd()
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing toggle: clusters.enabled"));
}

#[test]
fn test_plan_default_init() {
    let t = Test::init();
    let plan = t.plan_json();
    assert_eq!(plan["resources"].as_array().unwrap().len(), 8);
    assert_eq!(plan["outputs"].as_object().unwrap().len(), 6);
}

#[test]
fn test_plan_human_output() {
    let t = Test::with_config(&full_config());
    let output = t.plan();
    assert_success(&output);
    assert_stdout_contains(&output, "iup-replication-experiment-one-dev-cluster");
    assert_stdout_contains(&output, "iup-replication-client-dev-key");
}

#[test]
fn test_plan_disabled_everything() {
    let t = Test::with_config(&config_toml("dev", Some(false), Some(false)));
    let plan = t.plan_json();
    assert!(plan["resources"].as_array().unwrap().is_empty());
    assert!(plan["outputs"].as_object().unwrap().is_empty());
}

#[test]
fn test_plan_never_prints_password_by_default() {
    let t = Test::with_config(&full_config());
    let outputs = t.outputs_json(false);
    assert_eq!(outputs["master_password"], "[secret]");

    let outputs = t.outputs_json(true);
    let password = outputs["master_password"].as_str().unwrap();
    assert_eq!(password.len(), 32);
}

#[test]
fn test_outputs_names() {
    let t = Test::with_config(&full_config());
    let outputs = t.outputs_json(false);
    for name in [
        "cluster_one",
        "cluster_two",
        "instances_one",
        "instances_two",
        "cluster_parameter_group",
        "master_password",
        "compute_key_pair",
        "compute_instance",
    ] {
        assert!(!outputs[name].is_null(), "missing output {}", name);
    }
    assert_eq!(outputs["instances_one"].as_array().unwrap().len(), 2);
}

#[test]
fn test_stack_flag_overrides_config() {
    let t = Test::with_config(&full_config());
    let output = t
        .cmd()
        .args(["--stack", "ci", "plan", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("iup-replication-experiment-one-ci-instance-0"));
    assert!(!out.contains("-dev-"));
}

#[test]
fn test_stack_env_overrides_config() {
    let t = Test::with_config(&full_config());
    t.cmd()
        .env("REPL_TOPOLOGY_STACK", "qa")
        .args(["plan", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("iup-replication-experiment-two-qa-cluster"));
}

#[test]
fn test_teardown_instances_first() {
    let t = Test::with_config(&full_config());
    let order = t.teardown_json();
    assert_eq!(order.len(), 10);

    let position = |name: &str| order.iter().position(|n| n == name).unwrap();
    assert!(
        position("iup-replication-experiment-one-dev-instance-0")
            < position("iup-replication-experiment-one-dev-cluster")
    );
    assert!(
        position("iup-replication-experiment-one-dev-cluster")
            < position("iup-replication-experiment-dev-parameter-group")
    );
    assert!(
        position("iup-replication-client-dev-instance") < position("iup-replication-client-dev-key")
    );
}

#[test]
fn test_invalid_parameter_fails() {
    let mut config = full_config();
    config.push_str("\n[[parameters]]\nname = \"\"\nvalue = \"1\"\n");
    let t = Test::with_config(&config);
    let output = t.plan();
    assert_failure(&output);
    assert_stderr_contains(&output, "parameter name cannot be empty");
}

#[test]
fn test_completions() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("repl-topology"));
}
