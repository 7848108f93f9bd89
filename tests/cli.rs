use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn bin() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sealbox"))
}

// explicit small cost parameters keep CLI tests fast
const FAST_COST: [&str; 6] = ["--log-n", "4", "--r", "1", "--p", "1"];

#[test]
fn seal_creates_container_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"plaintext contents").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .args(FAST_COST)
        .assert()
        .success()
        .stdout(predicate::str::contains("sealed"));

    let sealed = dir.path().join("note.txt.sbx");
    assert!(sealed.exists());
    // header + payload + trailing MAC
    assert_eq!(
        fs::read(&sealed).unwrap().len(),
        96 + b"plaintext contents".len() + 32
    );
}

#[test]
fn seal_and_open_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"roundtrip me").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .args(FAST_COST)
        .assert()
        .success();

    let restored = dir.path().join("restored.txt");
    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("open")
        .arg(dir.path().join("note.txt.sbx"))
        .arg("--output")
        .arg(&restored)
        .assert()
        .success()
        .stdout(predicate::str::contains("opened"));

    assert_eq!(fs::read(&restored).unwrap(), b"roundtrip me");
}

#[test]
fn open_infers_output_from_sbx_extension() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.pdf");
    fs::write(&input, b"pdf bytes").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .args(FAST_COST)
        .assert()
        .success();

    fs::remove_file(&input).unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("open")
        .arg(dir.path().join("doc.pdf.sbx"))
        .assert()
        .success();

    assert_eq!(fs::read(&input).unwrap(), b"pdf bytes");
}

#[test]
fn wrong_passphrase_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"secret").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .args(FAST_COST)
        .assert()
        .success();

    bin()
        .env("SEALBOX_PASSPHRASE", "wrong_pw")
        .arg("open")
        .arg(dir.path().join("note.txt.sbx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "wrong passphrase or corrupted container",
        ));
}

#[test]
fn tampered_container_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"integrity matters").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .args(FAST_COST)
        .assert()
        .success();

    let sealed = dir.path().join("note.txt.sbx");
    let mut bytes = fs::read(&sealed).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 1;
    fs::write(&sealed, &bytes).unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("open")
        .arg(&sealed)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wrong passphrase or corrupted"));
}

#[test]
fn open_rejects_non_container() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.sbx");
    fs::write(&bogus, b"this is not a sealed file").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("open")
        .arg(&bogus)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a sealbox container"));
}

#[test]
fn info_prints_cost_parameters() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"x").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .arg("--log-n")
        .arg("5")
        .arg("--r")
        .arg("2")
        .arg("--p")
        .arg("3")
        .assert()
        .success();

    bin()
        .arg("info")
        .arg(dir.path().join("note.txt.sbx"))
        .assert()
        .success()
        .stdout(predicate::str::contains("N:       32 (log2 = 5)"))
        .stdout(predicate::str::contains("r:       2"))
        .stdout(predicate::str::contains("p:       3"));
}

#[test]
fn seal_with_budget_flags() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"tuned").unwrap();

    bin()
        .env("SEALBOX_PASSPHRASE", "pw")
        .arg("seal")
        .arg(&input)
        .arg("--max-mem")
        .arg("1")
        .arg("--max-time")
        .arg("0.05")
        .assert()
        .success();

    assert!(dir.path().join("note.txt.sbx").exists());
}

#[test]
fn mismatched_confirmation_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("note.txt");
    fs::write(&input, b"data").unwrap();

    // no env var: passphrase + confirmation come from piped stdin
    bin()
        .env_remove("SEALBOX_PASSPHRASE")
        .arg("seal")
        .arg(&input)
        .args(FAST_COST)
        .write_stdin("first\nsecond\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passphrases do not match"));
}
