//! End-to-end CLI tests for the auth-cookie binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Builds a command isolated from the user's config directory.
fn auth_cookie(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("auth-cookie").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG");
    cmd
}

/// Turns `encode` output into the session JSON and a `Cookie` request header.
fn parse_encode_output(stdout: &str) -> (String, String) {
    let mut session = String::new();
    let mut pairs = Vec::new();
    for line in stdout.lines() {
        if let Some(json) = line.strip_prefix("session = ") {
            session = json.to_string();
        } else if let Some(set_cookie) = line.strip_prefix("Set-Cookie: ") {
            if set_cookie.contains("Max-Age=0") {
                continue;
            }
            let pair = set_cookie.split("; ").next().unwrap();
            pairs.push(pair.to_string());
        }
    }
    (session, pairs.join("; "))
}

#[test]
fn test_binary_help_displays_usage() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Store and rebuild"));
}

#[test]
fn test_binary_version_displays_version() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth-cookie"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args(["config", "--invalid-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_without_subcommand_returns_error() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home).assert().failure();
}

#[test]
fn test_config_shows_defaults_without_file() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = not found (using defaults)"))
        .stdout(predicate::str::contains(
            "cookie_prefix = security_authentication_proxy",
        ))
        .stdout(predicate::str::contains("additional_cookies = 5"))
        .stdout(predicate::str::contains("same_site = Lax"));
}

#[test]
fn test_config_reads_default_file_and_cli_overrides() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("auth-cookie");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("config.toml"),
        "cookie_prefix = \"testcookie\"\nadditional_cookies = 3\nsecure = false\n",
    )
    .unwrap();

    auth_cookie(&home)
        .args(["config", "--additional-cookies", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config_file = loaded"))
        .stdout(predicate::str::contains("cookie_prefix = testcookie"))
        .stdout(predicate::str::contains("additional_cookies = 9"))
        .stdout(predicate::str::contains("secure = false"));
}

#[test]
fn test_config_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join("auth-cookie");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "cookie_count = 3\n").unwrap();

    auth_cookie(&home)
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_encode_short_credential_is_inline() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args(["encode", "Bearer eyToken"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"session = {"credentials":{"authHeaderValue":"Bearer eyToken"}}"#,
        ))
        .stdout(predicate::str::contains("Set-Cookie").not());
}

#[test]
fn test_encode_reads_credential_from_stdin() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .arg("encode")
        .write_stdin("Bearer eyToken\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""authHeaderValue":"Bearer eyToken""#));
}

#[test]
fn test_encode_empty_stdin_fails() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args(["encode", "-"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No credential provided"));
}

#[test]
fn test_encode_then_decode_split_credential() {
    let home = TempDir::new().unwrap();
    let credential = format!("Bearer {}", "eyCombinedToken.".repeat(40));

    let output = auth_cookie(&home)
        .args([
            "encode",
            credential.as_str(),
            "--cookie-prefix",
            "testcookie",
            "--primary-budget",
            "10",
            "--chunk-size",
            "20",
            "--additional-cookies",
            "50",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(r#"session = {"credentials":{"authHeaderValueExtra":true}}"#));
    assert!(stdout.contains("Set-Cookie: testcookie1="));
    for attribute in ["Secure", "HttpOnly", "SameSite=Lax", "Path=/"] {
        assert!(stdout.contains(attribute), "missing {attribute}");
    }

    let (session, cookie_header) = parse_encode_output(&stdout);
    auth_cookie(&home)
        .args([
            "decode",
            "--cookie-header",
            cookie_header.as_str(),
            "--session",
            session.as_str(),
            "--cookie-prefix",
            "testcookie",
            "--additional-cookies",
            "50",
        ])
        .assert()
        .success()
        .stdout(format!("authorization: {credential}\n"));
}

#[test]
fn test_encode_clears_stale_cookies() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args([
            "encode",
            "Bearer eyToken",
            "--cookie-header",
            "testcookie1=old; testcookie2=old",
            "--cookie-prefix",
            "testcookie",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set-Cookie: testcookie1=; "))
        .stdout(predicate::str::contains("Set-Cookie: testcookie2=; "))
        .stdout(predicate::str::contains("Max-Age=0"))
        .stdout(predicate::str::contains("Expires="));
}

#[test]
fn test_decode_inline_session() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args([
            "decode",
            "--cookie-header",
            "other=1",
            "--session",
            r#"{"credentials":{"authHeaderValue":"Bearer eyToken"},"username":"alice"}"#,
        ])
        .assert()
        .success()
        .stdout("authorization: Bearer eyToken\n");
}

#[test]
fn test_decode_missing_chunk_fails_without_output() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args([
            "decode",
            "--cookie-header",
            "other=1",
            "--session",
            r#"{"credentials":{"authHeaderValueExtra":true}}"#,
        ])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("No credential available"))
        .stderr(predicate::str::contains("chunk 1"));
}

#[test]
fn test_decode_rejects_ambiguous_session() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args([
            "decode",
            "--cookie-header",
            "",
            "--session",
            r#"{"credentials":{"authHeaderValue":"x","authHeaderValueExtra":true}}"#,
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid session cookie"));
}

#[test]
fn test_decode_reads_session_from_cookie_header() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args([
            "decode",
            "--cookie-header",
            r#"other=1; security_authentication={"credentials":{"authHeaderValue":"Bearer eyToken"}}"#,
        ])
        .assert()
        .success()
        .stdout("authorization: Bearer eyToken\n");
}

#[test]
fn test_decode_without_session_cookie_fails() {
    let home = TempDir::new().unwrap();
    auth_cookie(&home)
        .args(["decode", "--cookie-header", "other=1"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Invalid session cookie"));
}
