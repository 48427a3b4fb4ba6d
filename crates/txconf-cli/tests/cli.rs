use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const SAMPLE: &str = r#"<subsystem xmlns="urn:jboss:domain:transactions:2.1">
    <object-store type="hornetq" path="store"/>
</subsystem>"#;

fn txconf() -> Result<Command, Box<dyn std::error::Error>> {
    Ok(Command::cargo_bin("txconf")?)
}

#[test]
fn test_parse_text_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    txconf()?
        .arg("parse")
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "/subsystem=transactions:add(object-store-type=hornetq, object-store-path=\"store\")",
        ))
        .stdout(predicate::str::contains(
            "/subsystem=transactions/log-store=log-store:add(log-store-type=hornetq)",
        ));
    Ok(())
}

#[test]
fn test_parse_json_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("standalone-tx.xml");
    let output = dir.path().join("ops.json");
    fs::write(&input, SAMPLE)?;

    txconf()?
        .arg("parse")
        .arg(&input)
        .args(["--format", "json", "-o"])
        .arg(&output)
        .assert()
        .success();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output)?)?;
    let ops = json.as_array().ok_or("expected an array")?;
    assert_eq!(ops.len(), 2);
    let first = ops.first().ok_or("missing first operation")?;
    assert_eq!(first["operation"], "add");
    assert_eq!(first["address"][0]["key"], "subsystem");
    assert_eq!(first["parameters"]["object-store-type"], "hornetq");
    Ok(())
}

#[test]
fn test_parse_error_reports_kind() -> Result<(), Box<dyn std::error::Error>> {
    txconf()?
        .arg("parse")
        .write_stdin(r#"<subsystem xmlns="urn:jboss:domain:transactions:9.9"/>"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported schema version"));
    Ok(())
}

#[test]
fn test_missing_input_file() -> Result<(), Box<dyn std::error::Error>> {
    txconf()?
        .args(["parse", "does-not-exist.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read input file"));
    Ok(())
}

#[test]
fn test_empty_stdin() -> Result<(), Box<dyn std::error::Error>> {
    txconf()?
        .arg("parse")
        .write_stdin("   ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input provided on stdin"));
    Ok(())
}

#[test]
fn test_size_limit_flag() -> Result<(), Box<dyn std::error::Error>> {
    txconf()?
        .args(["parse", "--max-size", "10"])
        .write_stdin(SAMPLE)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max size exceeded"));
    Ok(())
}

#[test]
fn test_versions_lists_namespaces_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let output = txconf()?.arg("versions").output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let labels: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split('\t').next())
        .collect();
    assert_eq!(labels, ["1.0", "1.1", "1.2", "1.3", "1.4", "2.0", "2.1"]);
    assert!(stdout.contains("urn:jboss:domain:transactions:2.1 (current)"));
    Ok(())
}

#[test]
fn test_upgrade_rewrites_namespace() -> Result<(), Box<dyn std::error::Error>> {
    txconf()?
        .arg("upgrade")
        .write_stdin(
            r#"<subsystem xmlns="urn:jboss:domain:transactions:1.3">
                <use-hornetq-store enable-async-io="true"/>
            </subsystem>"#,
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("urn:jboss:domain:transactions:2.1"))
        .stdout(predicate::str::contains(r#"<object-store type="hornetq"/>"#))
        .stdout(predicate::str::contains(r#"<hornetq-store enable-async-io="true"/>"#));
    Ok(())
}
