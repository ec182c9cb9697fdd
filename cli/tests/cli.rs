use assert_cmd::prelude::*;
use insta_cmd::assert_cmd_snapshot;
use std::process::Command;

#[test]
fn normalize_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("cql2dnf")?;
    cmd.arg("tests/data/product.json");

    assert_cmd_snapshot!(cmd, @r###"
    success: true
    exit_code: 0
    ----- stdout -----
    (a = 1 AND b = 2) OR (a = 1 AND c = 3)

    ----- stderr -----
    "###);

    Ok(())
}

#[test]
fn normalize_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let input = r#"{"Compound": {
        "children": [
            {"Simple": {"predicate": {"left": {"Property": "a"}, "op": "Eq", "right": {"Integer": 1}}}},
            {"Simple": {"predicate": {"left": {"Property": "b"}, "op": "Eq", "right": {"Integer": 2}}}}
        ],
        "operators": ["And"],
        "inverted": true
    }}"#;

    assert_cmd::Command::cargo_bin("cql2dnf")?
        .arg("-")
        .write_stdin(input)
        .assert()
        .success()
        .stdout("NOT (a = 1) OR NOT (b = 2)\n");

    Ok(())
}

#[test]
fn heap_limit_from_config() -> Result<(), Box<dyn std::error::Error>> {
    Command::cargo_bin("cql2dnf")?
        .arg("--config")
        .arg("tests/data/strict.toml")
        .arg("tests/data/product.json")
        .assert()
        .failure();

    Command::cargo_bin("cql2dnf")?
        .arg("tests/data/does-not-exist.json")
        .assert()
        .failure();

    Ok(())
}
