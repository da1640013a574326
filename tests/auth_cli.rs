mod support;

use predicates::prelude::*;
use support::{tb_cmd, tb_json, TestHome};

#[test]
fn full_login_flow() {
    let home = TestHome::initialized();

    let issued = tb_json(
        &home,
        &[
            "auth",
            "send-code",
            "--email",
            "Ana@Example.com",
            "--name",
            "Ana",
        ],
    );
    assert_eq!(issued["command"].as_str(), Some("auth send-code"));
    assert_eq!(issued["data"]["email"].as_str(), Some("ana@example.com"));
    let code = issued["data"]["code"].as_str().expect("code");
    assert_eq!(code.len(), 6);

    let verified = tb_json(
        &home,
        &["auth", "verify", "--email", "ana@example.com", "--code", code],
    );
    assert_eq!(verified["data"]["name"].as_str(), Some("Ana"));

    let whoami = tb_json(&home, &["auth", "whoami"]);
    assert_eq!(
        whoami["data"]["email"].as_str(),
        Some("ana@example.com")
    );
}

#[test]
fn wrong_code_is_an_auth_rejection() {
    let home = TestHome::initialized();

    let issued = tb_json(
        &home,
        &[
            "auth",
            "send-code",
            "--email",
            "ana@example.com",
            "--name",
            "Ana",
        ],
    );
    let code = issued["data"]["code"].as_str().expect("code");
    let wrong = if code == "111111" { "222222" } else { "111111" };

    tb_cmd(&home)
        .args(["auth", "verify", "--email", "ana@example.com", "--code", wrong])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn verify_without_code_is_an_auth_rejection() {
    let home = TestHome::initialized();

    tb_cmd(&home)
        .args([
            "auth",
            "verify",
            "--email",
            "ghost@example.com",
            "--code",
            "123456",
        ])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("No login code"));
}

#[test]
fn codes_are_single_use() {
    let home = TestHome::initialized();

    let issued = tb_json(
        &home,
        &[
            "auth",
            "send-code",
            "--email",
            "ana@example.com",
            "--name",
            "Ana",
        ],
    );
    let code = issued["data"]["code"].as_str().expect("code").to_string();

    tb_cmd(&home)
        .args(["auth", "verify", "--email", "ana@example.com", "--code", &code])
        .assert()
        .success();

    tb_cmd(&home)
        .args(["auth", "verify", "--email", "ana@example.com", "--code", &code])
        .assert()
        .failure()
        .code(3);
}

#[test]
fn identity_is_stable_across_logins() {
    let home = TestHome::initialized();

    let first = support::login(&home, "ana@example.com", "Ana");
    tb_cmd(&home).args(["auth", "logout"]).assert().success();
    let second = support::login(&home, "ana@example.com", "Ana");

    assert_eq!(first, second);
}

#[test]
fn logout_clears_session() {
    let home = TestHome::initialized();
    support::login(&home, "ana@example.com", "Ana");

    let logout = tb_json(&home, &["auth", "logout"]);
    assert_eq!(logout["data"]["logged_out"].as_bool(), Some(true));

    tb_cmd(&home)
        .args(["auth", "whoami"])
        .assert()
        .failure()
        .code(2);

    // A second logout is a clean no-op.
    let again = tb_json(&home, &["auth", "logout"]);
    assert_eq!(again["data"]["logged_out"].as_bool(), Some(false));
}

#[test]
fn rejects_invalid_email() {
    let home = TestHome::initialized();

    tb_cmd(&home)
        .args(["auth", "send-code", "--email", "not-an-email", "--name", "Ana"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid email"));
}
