use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn nameline() -> Command {
    let mut cmd = Command::cargo_bin("nameline").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_json_roster_to_stdout() {
    let output = nameline()
        .arg(fixture("meeting.json"))
        .arg("--lexicon")
        .arg(fixture("names.txt"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["filename"], "meeting.json");
    assert_eq!(value["duration"], 8.0);
    assert_eq!(value["segments"][1]["name"], "陳小華");
    assert_eq!(value["segments"][1]["text"], "[00:02.500 - 00:05.250]");
    assert_eq!(value["segments"][1]["start_idx"], 10);
    assert!(value["metrics"]["total_secs"].is_number());
}

#[test]
fn no_convert_keeps_transcript_script() {
    nameline()
        .arg(fixture("meeting.json"))
        .args(["--no-convert", "--lexicon"])
        .arg(fixture("names.txt"))
        .assert()
        .success()
        .stdout(predicate::str::contains("陈小华"))
        .stdout(predicate::str::contains("陳小華").not());
}

#[test]
fn writes_reports_into_output_dir() {
    let dir = tempdir().unwrap();
    nameline()
        .arg(fixture("meeting.json"))
        .arg(fixture("untimed.json"))
        .arg("--lexicon")
        .arg(fixture("names.txt"))
        .args(["--format", "report", "--output-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let report = fs::read_to_string(dir.path().join("meeting_ner.txt")).unwrap();
    assert!(report.starts_with("File: meeting.json\n"));
    assert!(report.contains("[00:00.000 - 00:02.500] 王小明\n"));
    assert!(report.contains("Full transcript:\n"));

    let untimed = fs::read_to_string(dir.path().join("untimed_ner.txt")).unwrap();
    assert!(untimed.contains("[00:00.000 - 00:00.000] 陳小華\n"));
}

#[test]
fn config_file_supplies_settings() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nameline.json");
    let body = serde_json::json!({
        "chunkSize": 9,
        "lexicon": fixture("names.txt"),
        "convert": false,
    });
    fs::write(&config, body.to_string()).unwrap();

    nameline()
        .arg(fixture("meeting.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("张美玲"));
}

#[test]
fn failing_input_does_not_stop_the_others() {
    nameline()
        .arg(fixture("invalid.json"))
        .arg(fixture("meeting.json"))
        .arg("--lexicon")
        .arg(fixture("names.txt"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"filename\": \"meeting.json\""))
        .stderr(predicate::str::contains("timing segment 0 is malformed"))
        .stderr(predicate::str::contains("1 of 2 inputs failed"));
}

#[cfg(not(feature = "whisper"))]
#[test]
fn audio_input_needs_whisper_feature() {
    let dir = tempdir().unwrap();
    let audio = dir.path().join("clip.wav");
    fs::write(&audio, b"RIFF").unwrap();

    nameline()
        .arg(&audio)
        .arg("--lexicon")
        .arg(fixture("names.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("whisper"));
}

#[test]
fn missing_input_is_rejected() {
    nameline()
        .arg(fixture("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn lexicon_and_tagger_url_conflict() {
    nameline()
        .arg(fixture("meeting.json"))
        .arg("--lexicon")
        .arg(fixture("names.txt"))
        .args(["--tagger-url", "http://127.0.0.1:9/ner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn unreachable_tagger_yields_empty_roster() {
    nameline()
        .arg(fixture("meeting.json"))
        .args(["--tagger-url", "http://127.0.0.1:9/ner", "--tagger-timeout", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"segments\": []"));
}
