use assert_cmd::Command;
use serde_json::Value;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("libris-cli").unwrap();
    cmd.env("LIBRIS_CONFIG_DIR", std::env::temp_dir().join("libris-cli-no-config"))
        .env_remove("LIBRIS_ENV")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn help_lists_subcommands() {
    let output = cli().arg("--help").assert().success().get_output().stdout.clone();
    let help = String::from_utf8(output).unwrap();
    assert!(help.contains("serve"));
    assert!(help.contains("openapi"));
    assert!(help.contains("config"));
}

#[test]
fn openapi_prints_merged_document() {
    let doc = stdout_json(cli().arg("openapi"));
    assert_eq!(doc["info"]["title"], "Libris API");
    assert!(doc["paths"]["/api/books"]["get"].is_object());
    assert!(doc["paths"]["/api/login"]["post"].is_object());
    assert!(doc["components"]["schemas"]["Book"].is_object());
}

#[test]
fn config_reflects_environment_overrides() {
    let settings = stdout_json(
        cli()
            .env("LIBRIS_SERVER__PORT", "9123")
            .env("LIBRIS_CATALOG__SEED_SAMPLE_BOOKS", "false")
            .arg("config"),
    );
    assert_eq!(settings["environment"], "local");
    assert_eq!(settings["server"]["port"], 9123);
    assert_eq!(settings["catalog"]["seed_sample_books"], false);
}

#[test]
fn unknown_environment_fails() {
    cli().env("LIBRIS_ENV", "qa").arg("config").assert().failure();
}
