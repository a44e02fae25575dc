
use predicates::{boolean::PredicateBooleanExt, str::contains};
use setup::DEFAULT_TIMEOUT;

use crate::setup::make_cli;

#[test]
/// Both credential settings are required, as flags or env vars.
fn test_missing_required_args() {
    let mut cmd = make_cli();

    let assert = cmd.timeout(DEFAULT_TIMEOUT).assert();

    assert.failure().stderr(
        contains("the following required arguments were not provided:")
            .and(contains("--service-account-json <SERVICE_ACCOUNT_JSON>"))
            .and(contains("--file-id <FILE_ID>")),
    );
}

#[test]
fn test_start_server_from_env() {
    let mut cmd = make_cli();

    let assert = cmd
        .timeout(DEFAULT_TIMEOUT)
        .env("SERVICE_ACCOUNT_JSON", "{}")
        .env("DRIVE_FILE_ID", "test-file")
        .arg("--bind")
        .arg("127.0.0.1:0")
        .assert();

    // Credentials aren't validated at startup, only when a request needs
    // them, so a placeholder document is enough to get the server up.
    assert
        .interrupted(/* We expect a timeout here */)
        .stdout(contains("Listening on: http://127.0.0.1"));
}

#[test]
fn test_start_server_from_flags() {
    let mut cmd = make_cli();

    let assert = cmd
        .timeout(DEFAULT_TIMEOUT)
        .arg("--service-account-json")
        .arg("{}")
        .arg("--file-id")
        .arg("test-file")
        .arg("--bind")
        .arg("127.0.0.1:0")
        .assert();

    assert
        .interrupted(/* We expect a timeout here */)
        .stdout(contains("Listening on: http://127.0.0.1"));
}
