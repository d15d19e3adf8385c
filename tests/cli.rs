use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

const HEART_RATE: &str = "Id,SecondsTime,HeartRate\n\
u1,4/12/2016 7:21:00 AM,60\n\
u1,4/12/2016 8:00:00 AM,64\n\
u1,4/13/2016 7:21:00 AM,90\n\
u2,4/12/2016 7:21:00 AM,75\n\
u2,4/13/2016 7:21:00 AM,100\n\
u3,4/12/2016 7:21:00 AM,bad\n";

const STEPS: &str = "Id,ActivityDate,TotalSteps\n\
u1,4/12/2016,1000\n\
u1,4/13/2016,12000\n\
u2,4/12/2016,5000\n\
u2,4/13/2016,5200\n\
u1,4/12/2016,1100\n\
u3,4/12/2016,7000\n";

fn fixture_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_activity-clusters"))
        .args(args)
        .env_remove("ACTIVITY_DATA_DIR")
        .output()
        .unwrap()
}

#[test]
fn evaluates_joined_days() {
    let temp = fixture_dir();
    let dir = temp.path();
    fs::write(dir.join("Kalp.csv"), HEART_RATE).unwrap();
    fs::write(dir.join("Adim.csv"), STEPS).unwrap();

    let output = run(&["--data-dir", dir.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Samples: 4");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("K: 2 | Inertia: "));
    assert!(lines[3].starts_with("K: 4 | Inertia: 0.00 | Silhouette: "));

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("skipped K 5"));
}

#[test]
fn falls_back_to_alternate_step_file() {
    let temp = fixture_dir();
    let dir = temp.path();
    fs::write(dir.join("Kalp.csv"), HEART_RATE).unwrap();
    fs::write(dir.join("Adım.csv"), STEPS).unwrap();

    let output = run(&["--data-dir", dir.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("Samples: 4\n"));
}

#[test]
fn too_few_samples_fails_without_clustering_output() {
    let temp = fixture_dir();
    let dir = temp.path();
    fs::write(dir.join("Kalp.csv"), HEART_RATE).unwrap();
    fs::write(
        dir.join("Adim.csv"),
        "Id,ActivityDate,TotalSteps\nu1,4/12/2016,1000\nu2,4/12/2016,5000\n",
    )
    .unwrap();

    let output = run(&["--data-dir", dir.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("not enough samples"));
}

#[test]
fn missing_step_files_fail() {
    let temp = fixture_dir();
    let dir = temp.path();
    fs::write(dir.join("Kalp.csv"), HEART_RATE).unwrap();

    let output = run(&["--data-dir", dir.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no step file found"));
}

#[test]
fn trained_rules_feed_prediction() {
    let temp = fixture_dir();
    let dir = temp.path();
    fs::write(dir.join("Kalp.csv"), HEART_RATE).unwrap();
    fs::write(dir.join("Adim.csv"), STEPS).unwrap();

    let output = run(&["--data-dir", dir.to_str().unwrap(), "train", "--k", "2"]);
    assert!(output.status.success());
    let rules_path = dir.join("rules.json");
    fs::write(&rules_path, &output.stdout).unwrap();

    let rules: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rules["clusters"].as_object().unwrap().len(), 2);

    let output = run(&[
        "predict",
        "--rules",
        rules_path.to_str().unwrap(),
        "--steps",
        "11000",
        "--avg-hr",
        "95",
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "Cluster: 1\n");
}

#[test]
fn missing_heart_rate_file_fails() {
    let temp = fixture_dir();
    let dir = temp.path();
    fs::write(dir.join("Adim.csv"), STEPS).unwrap();

    let output = run(&["--data-dir", dir.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Kalp.csv"));
}
