//! Integration tests for the bulge-odds binary.
//!
//! Runs the built executable with command-line arguments and checks its
//! stdout, exit status, and error reporting.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Runs the binary with the given arguments and captures its output.
fn run_cli(args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_bulge-odds");
    Command::new(exe)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("failed to start bulge-odds")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(|l| l.to_string())
        .collect()
}

#[test]
fn attack_golden_report() {
    let output = run_cli(&["attack", "--power", "1"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(
        lines,
        vec![
            "EVACUATION PROBABILITY: 0.500",
            "EXPECTED POWER DESTROYED: 0.000",
        ]
    );
}

#[test]
fn attack_json_summary() {
    let output = run_cli(&["attack", "--power", "2", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["prob_evacuate"], 0.75);
    assert_eq!(value["exp_power_destroyed"], 0.25);
}

#[test]
fn attack_full_json_includes_distributions() {
    let output = run_cli(&[
        "attack", "--power", "6", "--inf", "2", "--tnk", "1", "--supply", "2", "--json", "--full",
    ]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let outcomes = value["outcome_distribution"].as_array().unwrap();
    let total: f64 = outcomes
        .iter()
        .map(|e| e["probability"].as_f64().unwrap())
        .sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(outcomes[0].get("inf_retreat").is_some());
    assert!(value["units_left_distribution"][0].get("evacuate").is_some());
    assert!(value["total_power_destroyed_distribution"][0]
        .get("or_more")
        .is_some());
}

#[test]
fn attack_full_text_lists_tables() {
    let output = run_cli(&["attack", "--power", "3", "--inf", "2", "--full"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines.iter().any(|l| l == "POWER LEFT"));
    assert!(lines.iter().any(|l| l == "UNITS LEFT (inf tnk art supply truck)"));
    assert!(lines.iter().any(|l| l == "UNITS DESTROYED (inf tnk art)"));
    assert!(lines.iter().any(|l| l.starts_with("POWER DESTROYED")));
}

#[test]
fn invalid_attack_fails_with_message() {
    let output = run_cli(&["attack", "--power", "13"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("between 1 and 12"), "stderr: {}", stderr);
}

#[test]
fn stacking_violation_fails() {
    let output = run_cli(&["attack", "--power", "4", "--art", "4", "--inf", "0"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("stacking limit"), "stderr: {}", stderr);
}

#[test]
fn sweep_prints_twelve_rows() {
    let output = run_cli(&["sweep", "--inf", "2", "--tnk", "1", "--threads", "2"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 13);
    assert!(lines[0].starts_with("power"));
    assert!(lines[1].trim_start().starts_with("1 "));
    assert!(lines[12].trim_start().starts_with("12 "));
}

#[test]
fn sweep_json_has_both_regimes() {
    let output = run_cli(&["sweep", "--threads", "1", "--json"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["evacuate"].as_array().unwrap().len(), 12);
    let destroy = value["destroy"].as_array().unwrap();
    assert_eq!(destroy.len(), 24);
    assert_eq!(destroy[0]["retreat"], true);
    assert_eq!(destroy[23]["retreat"], false);
}

#[test]
fn multi_attack_report() {
    let output = run_cli(&["multi", "--attacks", "1,1"]);
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines[0], "EVACUATION PROBABILITY: 0.750");
    assert_eq!(lines.len(), 4);
}

#[test]
fn multi_attack_rejects_seven_attacks() {
    let output = run_cli(&["multi", "--attacks", "1,2,3,4,5,6,7"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("more than 6 attacks"), "stderr: {}", stderr);
}

#[test]
fn scenario_file_runs_every_entry() {
    let dir = std::env::temp_dir().join(format!("bulge-odds-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scenarios.json");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"{{"scenarios":[
            {{"name":"lone","inf":1,"power":1,"attacks":[1,1]}},
            {{"name":"stack","inf":3,"tnk":1,"art":1,"supply":1,"power":8}}
        ]}}"#
    )
    .unwrap();
    drop(file);

    let output = run_cli(&["scenario", path.to_str().unwrap()]);
    std::fs::remove_dir_all(&dir).ok();
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert!(lines.contains(&"== lone".to_string()));
    assert!(lines.contains(&"== stack".to_string()));
    assert!(lines.contains(&"MULTI-ATTACK EVACUATION PROBABILITY: 0.750".to_string()));
}

#[test]
fn missing_scenario_file_fails() {
    let output = run_cli(&["scenario", "/nonexistent/bulge-odds.json"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("failed to read"), "stderr: {}", stderr);
}
