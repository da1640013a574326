use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory for one test
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    /// A home with `tb init` already run
    pub fn initialized() -> Self {
        let home = Self::new();
        tb_cmd(&home).arg("init").assert().success();
        home
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A `tb` invocation pointed at the test home
pub fn tb_cmd(home: &TestHome) -> Command {
    let mut cmd = Command::cargo_bin("tb").expect("tb binary");
    cmd.env("TB_DATA_DIR", home.path());
    cmd
}

/// Run a command with `--json` and parse the envelope
pub fn tb_json(home: &TestHome, args: &[&str]) -> Value {
    let output = tb_cmd(home)
        .args(args)
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("json envelope")
}

/// Log a user in through the full send-code/verify flow
pub fn login(home: &TestHome, email: &str, name: &str) -> String {
    let issued = tb_json(
        home,
        &["auth", "send-code", "--email", email, "--name", name],
    );
    let code = issued["data"]["code"].as_str().expect("code").to_string();

    let verified = tb_json(home, &["auth", "verify", "--email", email, "--code", &code]);
    verified["data"]["id"].as_str().expect("user id").to_string()
}

/// Create a board and return its id
pub fn new_board(home: &TestHome, title: &str) -> String {
    let value = tb_json(home, &["board", "new", title]);
    value["data"]["id"].as_str().expect("board id").to_string()
}

/// Create a list on a board and return its id
pub fn new_list(home: &TestHome, board: &str, title: &str) -> String {
    let value = tb_json(home, &["list", "new", board, title]);
    value["data"]["id"].as_str().expect("list id").to_string()
}

/// Create a task and return its id
pub fn new_task(home: &TestHome, board: &str, list: &str, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["task", "new", board, list, title];
    args.extend_from_slice(extra);
    let value = tb_json(home, &args);
    value["data"]["id"].as_str().expect("task id").to_string()
}
