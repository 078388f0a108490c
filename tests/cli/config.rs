//! Tests for `.confseal.toml`.

use crate::support::*;

#[test]
fn test_config_supplies_keys_and_format() {
    let t = Test::with_file("app.settings", SAMPLE_JSON);
    t.write(
        ".confseal.toml",
        "[[files]]\npath = \"app.settings\"\nformat = \"json\"\nkeys = [\"db.password\"]\n",
    );

    let output = t
        .cmd_with_passphrase()
        .args(["encrypt", "-i", "app.settings", "-o", "enc.settings"])
        .output()
        .unwrap();
    assert_success(&output);

    let value = json(&t.read("enc.settings"));
    assert_envelope(value["db"]["password"].as_str().unwrap());
    assert_eq!(value["db"]["user"], "admin");
}

#[test]
fn test_key_flag_overrides_config() {
    let t = Test::with_file("config.json", SAMPLE_JSON);
    t.write(
        ".confseal.toml",
        "[[files]]\npath = \"config.json\"\nkeys = [\"db.password\"]\n",
    );

    let output = t.encrypt("config.json", "out.json", &["db.user"]);
    assert_success(&output);

    let value = json(&t.read("out.json"));
    assert_eq!(value["db"]["password"], "s3cr3t");
    assert_envelope(value["db"]["user"].as_str().unwrap());
}

#[test]
fn test_explicit_config_path() {
    let t = Test::with_file("config.json", SAMPLE_JSON);
    t.write(
        "conf/project.toml",
        "[[files]]\npath = \"../config.json\"\nkeys = [\"db.password\"]\n",
    );

    let output = t
        .cmd_with_passphrase()
        .args(["--config", "conf/project.toml", "encrypt", "-i", "config.json", "-o", "-"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_envelope(json(&stdout(&output))["db"]["password"].as_str().unwrap());
}

#[test]
fn test_missing_explicit_config_fails() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    let output = t
        .cmd_with_passphrase()
        .args(["--config", "nope.toml", "encrypt", "-i", "config.json", "-o", "-", "-k", "db.password"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "config file not found");
}

#[test]
fn test_config_unknown_field_fails() {
    let t = Test::with_file("config.json", SAMPLE_JSON);
    t.write(".confseal.toml", "strategyy = \"symmetric\"\n");

    let output = t.encrypt("config.json", "out.json", &["db.password"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "failed to parse config file");
}
