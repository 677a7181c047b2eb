use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// Port 9 (discard) is closed on test machines, so every request fails fast.
const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

#[test]
fn xplan_metrics_lists_npv_catalog() {
    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args(["metrics", "--basis", "npv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discount Factor"))
        .stdout(predicate::str::contains("BASELINE"));
}

#[test]
fn xplan_import_csv_writes_json_records() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("results.csv");
    let output = dir.path().join("out/results.json");
    fs::write(
        &input,
        "Technology,Build Cycle,Status,System Cost ($),Notes\n\
         Wind 150MW,1,Selected,1200.5,first\n\
         Solar PV 100MW,1,Evaluated,n/a,second\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args([
        "import",
        "csv",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Imported 2 records"));

    let records: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["technology"], "Wind 150MW");
    assert_eq!(records[0]["systemCost"], 1200.5);
    assert_eq!(records[1]["systemCost"], 0.0);
    assert!(records[0].get("Notes").is_none());
}

#[test]
fn xplan_import_csv_rejects_missing_input() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args([
        "import",
        "csv",
        dir.path().join("missing.csv").to_str().unwrap(),
        "-o",
        dir.path().join("out.json").to_str().unwrap(),
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn xplan_results_table_falls_back_to_demo_data() {
    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args([
        "--api-url",
        UNREACHABLE_API,
        "results",
        "table",
        "5",
        "--format",
        "tsv",
        "--sort",
        "buildCycle",
        "--page-size",
        "10",
    ])
    .assert()
    .success()
    .stderr(predicate::str::contains("showing demo data"))
    .stdout(predicate::str::starts_with(
        "Technology\tBuild Cycle\tStatus\tYear",
    ))
    .stdout(predicate::str::contains("CCGT 500MW"));
}

#[test]
fn xplan_results_pivot_shows_build_cycles() {
    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args([
        "--api-url",
        UNREACHABLE_API,
        "results",
        "pivot",
        "5",
        "--basis",
        "npv",
        "--format",
        "tsv",
    ])
    .assert()
    .success()
    .stderr(predicate::str::contains("showing demo data"))
    .stdout(predicate::str::starts_with("Build Cycle\t"));
}

#[test]
fn xplan_results_rejects_unsupported_page_size() {
    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args([
        "--api-url",
        UNREACHABLE_API,
        "results",
        "table",
        "5",
        "--page-size",
        "30",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("page size must be one of"));
}

#[test]
fn xplan_db_configure_validates_locally() {
    let mut cmd = cargo_bin_cmd!("xplan");
    cmd.args([
        "--api-url",
        UNREACHABLE_API,
        "db",
        "configure",
        "--server",
        "",
        "--database",
        "expansion",
    ])
    .assert()
    .failure()
    .stderr(predicate::str::contains("server name is required"));
}
