use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_ev-policy-engine")
}

fn engine() -> Command {
    let mut command = Command::new(bin());
    command
        .env_remove("EV_POLICY_COEFFICIENTS")
        .env_remove("EV_POLICY_WORKERS")
        .env("EV_POLICY_LOG", "off");
    command
}

fn unique_temp_path(name: &str, extension: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("ev-policy-engine-{name}-{stamp}.{extension}"))
}

#[test]
fn evaluate_command_emits_json() {
    let output = engine()
        .args([
            "evaluate",
            "--rate",
            "1.0",
            "--density",
            "50",
            "--incentive",
            "subsidy",
            "--stakeholder",
            "policymaker",
        ])
        .output()
        .expect("evaluate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let payload: serde_json::Value =
        serde_json::from_str(&stdout).expect("evaluate should emit json");
    assert_eq!(payload["grid_risk_level"], "safe");
    assert_eq!(payload["recommendation"]["tag"], "scale_subsidies");
}

#[test]
fn evaluate_table_prints_header_and_row() {
    let output = engine()
        .args([
            "evaluate",
            "--rate",
            "5",
            "--density",
            "10",
            "--incentive",
            "tax_exemption",
            "--stakeholder",
            "investor",
            "--table",
        ])
        .output()
        .expect("evaluate should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ev_adoption_rate\tgrid_risk_level"));
    assert!(lines[1].starts_with("5\tmarginal\t"));
    assert!(lines[1].ends_with("\t2"));
}

#[test]
fn evaluate_rejects_negative_rate_with_exit_one() {
    let output = engine()
        .args([
            "evaluate",
            "--rate",
            "-2",
            "--density",
            "50",
            "--incentive",
            "none",
            "--stakeholder",
            "utility",
        ])
        .output()
        .expect("evaluate should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ev_adoption_rate"), "{stderr}");
}

#[test]
fn missing_subcommand_returns_usage() {
    let output = engine().output().expect("binary should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: ev-policy-engine"));
}

#[test]
fn missing_required_flag_is_usage_error() {
    let output = engine()
        .args(["evaluate", "--rate", "1"])
        .output()
        .expect("evaluate should run");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn sweep_csv_has_one_row_per_rate() {
    let output = engine()
        .args([
            "sweep",
            "--density",
            "20",
            "--incentive",
            "none",
            "--stakeholder",
            "researcher",
            "--from",
            "0",
            "--to",
            "12",
            "--step",
            "3",
            "--csv",
        ])
        .output()
        .expect("sweep should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("ev_adoption_rate,"));
    assert!(lines[5].starts_with("12.0,unsafe,"));
}

#[test]
fn assess_reads_yaml_scenario_file() {
    let path = unique_temp_path("assess", "yaml");
    fs::write(
        &path,
        "total_evs: 60000\npublic_chargers: 200\npeak_charging_share: 80\n",
    )
    .expect("fixture should be written");

    let output = engine()
        .args(["assess", "--scenario", path.to_string_lossy().as_ref()])
        .output()
        .expect("assess should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("assess should emit json");
    assert_eq!(payload["assessment"]["infrastructure_pressure"], "critical");
    assert_eq!(payload["assessment"]["urgency"], "immediate");

    let _ = fs::remove_file(path);
}

#[test]
fn compare_with_missing_file_fails() {
    let path = unique_temp_path("missing", "json");
    let output = engine()
        .args(["compare", "--scenario", path.to_string_lossy().as_ref()])
        .output()
        .expect("compare should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unable to read scenario file"));
}

#[test]
fn roadmap_honours_start_date() {
    let output = engine()
        .args(["roadmap", "--start", "2025-01-01"])
        .output()
        .expect("roadmap should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("roadmap should emit json");
    assert_eq!(payload[0]["start"], "2025-01-01");
    assert_eq!(payload[2]["end"], "2027-12-17");
}

#[test]
fn incentives_rejects_unknown_lever() {
    let output = engine()
        .args(["incentives", "--lever", "free parking"])
        .output()
        .expect("incentives should run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown incentive lever"));
}

#[test]
fn coefficient_override_changes_thresholds() {
    let path = unique_temp_path("coefficients", "yaml");
    fs::write(
        &path,
        "penetration:\n  standard_10kw:\n    private_car: 0.5\n    bus_taxi: 4.0\n",
    )
    .expect("fixture should be written");

    let output = engine()
        .env("EV_POLICY_COEFFICIENTS", &path)
        .args([
            "evaluate",
            "--rate",
            "5",
            "--density",
            "50",
            "--incentive",
            "subsidy",
            "--stakeholder",
            "utility",
        ])
        .output()
        .expect("evaluate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("evaluate should emit json");
    assert_eq!(payload["grid_risk_level"], "unsafe");
    assert_eq!(payload["thresholds"]["bus_taxi"], 4.0);

    let _ = fs::remove_file(path);
}

#[test]
fn single_key_threshold_override_keeps_row_default() {
    let path = unique_temp_path("coefficients-row", "yaml");
    fs::write(&path, "penetration:\n  standard_10kw:\n    bus_taxi: 4.0\n")
        .expect("fixture should be written");

    let output = engine()
        .env("EV_POLICY_COEFFICIENTS", &path)
        .args([
            "evaluate",
            "--rate",
            "5",
            "--density",
            "50",
            "--incentive",
            "subsidy",
            "--stakeholder",
            "utility",
        ])
        .output()
        .expect("evaluate should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("evaluate should emit json");
    assert_eq!(payload["grid_risk_level"], "unsafe");
    assert_eq!(payload["thresholds"]["private_car"], 1.5);

    let _ = fs::remove_file(path);
}

#[test]
fn inverted_threshold_override_fails() {
    let path = unique_temp_path("coefficients-inverted", "yaml");
    fs::write(
        &path,
        "penetration:\n  standard_10kw:\n    private_car: 12.0\n    bus_taxi: 10.0\n",
    )
    .expect("fixture should be written");

    let output = engine()
        .env("EV_POLICY_COEFFICIENTS", &path)
        .args(["grid"])
        .output()
        .expect("grid should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("penetration.standard_10kw"));

    let _ = fs::remove_file(path);
}

#[test]
fn ppp_prints_split_and_rejects_bad_share() {
    let output = engine()
        .args(["ppp", "--cost", "50", "--public-share", "30", "--roi", "12"])
        .output()
        .expect("ppp should run");
    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("ppp should emit json");
    assert_eq!(payload["public_investment_musd"], 15.0);
    assert_eq!(payload["private_investment_musd"], 35.0);

    let output = engine()
        .args(["ppp", "--public-share", "150"])
        .output()
        .expect("ppp should run");
    assert_eq!(output.status.code(), Some(1));
}
