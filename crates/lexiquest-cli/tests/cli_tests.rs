//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lexiquest() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lexiquest").unwrap()
}

fn init_in(dir: &TempDir) {
    lexiquest()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
}

fn import_in(dir: &TempDir) {
    lexiquest()
        .current_dir(dir.path())
        .args(["import", "--pack", "packs/german-starter.toml"])
        .assert()
        .success();
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    lexiquest()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lexiquest.toml"))
        .stdout(predicate::str::contains("Created packs/german-starter.toml"));

    assert!(dir.path().join("lexiquest.toml").exists());
    assert!(dir.path().join("packs/german-starter.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);

    lexiquest()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn validate_starter_pack() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);

    lexiquest()
        .current_dir(dir.path())
        .args(["validate", "--pack", "packs/german-starter.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("German Starter"))
        .stdout(predicate::str::contains("8 words"))
        .stdout(predicate::str::contains("Pack is valid."));
}

#[test]
fn validate_nonexistent_pack() {
    lexiquest()
        .args(["validate", "--pack", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn import_writes_state_file() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);

    lexiquest()
        .current_dir(dir.path())
        .args(["import", "--pack", "packs/german-starter.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 'German Starter'"));

    assert!(dir.path().join("lexiquest-state.json").exists());
}

#[test]
fn sessions_and_stats_start_empty() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);

    lexiquest()
        .current_dir(dir.path())
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions yet"));

    lexiquest()
        .current_dir(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stats yet"));
}

#[test]
fn play_grades_a_round_and_records_the_session() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);
    import_in(&dir);

    lexiquest()
        .current_dir(dir.path())
        .args([
            "play",
            "--language",
            "german",
            "--words",
            "2",
            "--vocabulary",
            "5",
            "--ratio",
            "0",
            "--seed",
            "7",
        ])
        .write_stdin("definitely wrong\nalso wrong\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Round score: 0.00% (0 of 2 correct)"))
        .stdout(predicate::str::contains("Session complete!"));

    lexiquest()
        .current_dir(dir.path())
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("german"));

    lexiquest()
        .current_dir(dir.path())
        .args(["stats", "--language", "german"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.00%"));
}

#[test]
fn play_resumes_a_session_with_pending_words() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);
    import_in(&dir);

    // Skip both words so the session stays active.
    let output = lexiquest()
        .current_dir(dir.path())
        .args([
            "play",
            "--language",
            "german",
            "--words",
            "2",
            "--vocabulary",
            "5",
            "--ratio",
            "0",
            "--seed",
            "11",
        ])
        .write_stdin("\n\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("remains active"));
    let id = stdout
        .lines()
        .find_map(|line| line.strip_prefix("Session "))
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string();

    lexiquest()
        .current_dir(dir.path())
        .args(["play", "--language", "german", "--session", &id])
        .write_stdin("wrong\nwrong\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Session {id}")))
        .stdout(predicate::str::contains("(random)").not())
        .stdout(predicate::str::contains("Session complete!"));
}

#[test]
fn play_rejects_unsupported_language() {
    let dir = TempDir::new().unwrap();
    init_in(&dir);
    import_in(&dir);

    lexiquest()
        .current_dir(dir.path())
        .args(["play", "--language", "klingon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}
