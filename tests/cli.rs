use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn chemsplit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("chemsplit").unwrap();
    cmd.current_dir(dir.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chemical element symbols"));
}

#[test]
fn test_word_list_from_stdin() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--all", "-q"])
        .write_stdin("Na\nco\nxyz\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Na: Na"))
        .stdout(predicate::str::contains("co: C+O | Co"))
        .stdout(predicate::str::contains("xyz").not());
}

#[test]
fn test_first_match_only_by_default() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .arg("-q")
        .write_stdin("co\n")
        .assert()
        .success()
        .stdout("co: C+O\n");
}

#[test]
fn test_json_output() {
    let dir = TempDir::new().unwrap();
    let output = chemsplit(&dir)
        .args(["--all", "-q", "--format", "json"])
        .write_stdin("HoHo\nxyz\n")
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["words_checked"], 2);
    assert_eq!(value["words_matched"], 1);
    assert_eq!(value["results"][0]["partitions"].as_array().unwrap().len(), 4);
    assert_eq!(value["results"][1]["word"], "xyz");
}

#[test]
fn test_reads_files_and_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("words.txt");
    let output = dir.path().join("out.txt");
    fs::write(&input, "12\tbacon\n7\tneon\n").unwrap();

    chemsplit(&dir)
        .arg(&input)
        .args(["-q", "--output"])
        .arg(&output)
        .assert()
        .success();

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("bacon: Ba+C+O+N"));
    assert!(written.contains("neon: Ne+O+N"));
}

#[test]
fn test_prose_mode_strips_accents() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--prose", "-q"])
        .write_stdin("Niño, sin!\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Niño: Ni+N+O"))
        .stdout(predicate::str::contains("sin: "));
}

#[test]
fn test_formula_flag() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--formula", "-q", "split", "hho"])
        .assert()
        .success()
        .stdout(predicate::str::contains("H+H+O [H2O]"));
}

#[test]
fn test_split_subcommand() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["-q", "split", "co", "Na"])
        .assert()
        .success()
        .stdout("co: C+O | Co\nNa: Na\n");
}

#[test]
fn test_symbols_subcommand() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .arg("symbols")
        .assert()
        .success()
        .stdout(predicate::str::contains("Hydrogen"))
        .stdout(predicate::str::contains("Og"));
}

#[test]
fn test_custom_alphabet() {
    let dir = TempDir::new().unwrap();
    let alphabet = dir.path().join("alphabet.txt");
    fs::write(&alphabet, "# two-letter codes\nAb\nA\nBc\n").unwrap();

    chemsplit(&dir)
        .arg("--alphabet")
        .arg(&alphabet)
        .args(["-q", "split", "abc"])
        .assert()
        .success()
        .stdout("abc: A+Bc\n");
}

#[test]
fn test_colliding_alphabet_fails() {
    let dir = TempDir::new().unwrap();
    let alphabet = dir.path().join("alphabet.txt");
    fs::write(&alphabet, "Ab\nAB\n").unwrap();

    chemsplit(&dir)
        .arg("--alphabet")
        .arg(&alphabet)
        .args(["split", "ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ab"));
}

#[test]
fn test_stats_chart() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--stats", "-q"])
        .write_stdin("neon\nbacon\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Token occurrences:"));
}

#[test]
fn test_fail_on_miss() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--fail-on-miss", "-q"])
        .write_stdin("neon\nxyz\n")
        .assert()
        .code(1);

    chemsplit(&dir)
        .args(["--fail-on-miss", "-q"])
        .write_stdin("neon\n")
        .assert()
        .success();
}

#[test]
fn test_local_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".chemsplit.toml"), "all_matches = true\n").unwrap();

    chemsplit(&dir)
        .arg("-q")
        .write_stdin("co\n")
        .assert()
        .success()
        .stdout("co: C+O | Co\n");
}

#[test]
fn test_summary_on_stderr() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .write_stdin("neon\nxyz\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("1 of 2 words matched"));
}

#[test]
fn test_completion() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chemsplit"));
}

#[test]
fn test_zero_jobs_rejected() {
    let dir = TempDir::new().unwrap();
    chemsplit(&dir)
        .args(["--jobs", "0", "split", "co"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--jobs must be at least 1"));
}
