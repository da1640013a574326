mod support;

use chrono::{Days, Local};
use predicates::prelude::*;
use support::{login, new_board, new_list, new_task, tb_cmd, tb_json, TestHome};

struct Fixture {
    home: TestHome,
    board_id: String,
    list_id: String,
}

fn fixture() -> Fixture {
    let home = TestHome::initialized();
    login(&home, "ana@example.com", "Ana");
    let board_id = new_board(&home, "Work");
    let list_id = new_list(&home, &board_id, "Inbox");
    Fixture {
        home,
        board_id,
        list_id,
    }
}

fn date_offset(days: i64) -> String {
    let today = Local::now().date_naive();
    let date = if days >= 0 {
        today + Days::new(days as u64)
    } else {
        today - Days::new((-days) as u64)
    };
    date.format("%Y-%m-%d").to_string()
}

#[test]
fn create_task_with_deadline() {
    let f = fixture();
    let tomorrow = date_offset(1);

    let value = tb_json(
        &f.home,
        &[
            "task",
            "new",
            &f.board_id,
            &f.list_id,
            "Ship report",
            "--deadline",
            &tomorrow,
            "--responsible",
            "ana",
        ],
    );
    assert_eq!(value["data"]["status"].as_str(), Some("pending"));
    assert_eq!(value["data"]["deadline"].as_str(), Some(tomorrow.as_str()));
}

#[test]
fn rejects_malformed_deadline() {
    let f = fixture();

    tb_cmd(&f.home)
        .args([
            "task",
            "new",
            &f.board_id,
            &f.list_id,
            "Bad",
            "--deadline",
            "31/12/2025",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Invalid deadline"))
        .stderr(predicate::str::contains("2025-12-31"));
}

#[test]
fn ls_classifies_deadlines() {
    let f = fixture();
    new_task(
        &f.home,
        &f.board_id,
        &f.list_id,
        "Late",
        &["--deadline", &date_offset(-1)],
    );
    new_task(
        &f.home,
        &f.board_id,
        &f.list_id,
        "Today",
        &["--deadline", &date_offset(0)],
    );
    new_task(&f.home, &f.board_id, &f.list_id, "Whenever", &[]);

    let value = tb_json(&f.home, &["task", "ls"]);
    assert_eq!(value["data"]["total"].as_u64(), Some(3));

    let tasks = value["data"]["tasks"].as_array().expect("tasks");
    let bucket_of = |title: &str| {
        tasks
            .iter()
            .find(|task| task["title"].as_str() == Some(title))
            .and_then(|task| task["deadline_bucket"].as_str())
            .map(str::to_string)
    };

    assert_eq!(bucket_of("Late").as_deref(), Some("overdue"));
    assert_eq!(bucket_of("Today").as_deref(), Some("today"));
    assert_eq!(bucket_of("Whenever").as_deref(), Some("no-deadline"));
}

#[test]
fn ls_filters_by_board_and_status() {
    let f = fixture();
    let other_board = new_board(&f.home, "Home");
    let other_list = new_list(&f.home, &other_board, "Chores");

    let work_task = new_task(&f.home, &f.board_id, &f.list_id, "Work thing", &[]);
    new_task(&f.home, &other_board, &other_list, "Home thing", &[]);

    tb_cmd(&f.home)
        .args(["task", "done", &work_task])
        .assert()
        .success();

    let by_board = tb_json(&f.home, &["task", "ls", "--board", "Home"]);
    assert_eq!(by_board["data"]["total"].as_u64(), Some(1));
    assert_eq!(
        by_board["data"]["tasks"][0]["title"].as_str(),
        Some("Home thing")
    );

    let completed = tb_json(&f.home, &["task", "ls", "--status", "completed"]);
    assert_eq!(completed["data"]["total"].as_u64(), Some(1));
    assert_eq!(
        completed["data"]["tasks"][0]["title"].as_str(),
        Some("Work thing")
    );
}

#[test]
fn update_is_partial_and_clears_with_empty_string() {
    let f = fixture();
    let task_id = new_task(
        &f.home,
        &f.board_id,
        &f.list_id,
        "Draft",
        &["--deadline", &date_offset(5)],
    );

    let updated = tb_json(
        &f.home,
        &[
            "task",
            "update",
            &task_id,
            "--title",
            "Final",
            "--description",
            "reviewed",
        ],
    );
    assert_eq!(updated["data"]["title"].as_str(), Some("Final"));
    assert_eq!(updated["data"]["description"].as_str(), Some("reviewed"));
    assert!(updated["data"]["deadline"].is_string());

    let cleared = tb_json(&f.home, &["task", "update", &task_id, "--deadline", ""]);
    assert!(cleared["data"]["deadline"].is_null());

    tb_cmd(&f.home)
        .args(["task", "update", &task_id])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("nothing to update"));
}

#[test]
fn done_and_reopen_toggle_status() {
    let f = fixture();
    let task_id = new_task(&f.home, &f.board_id, &f.list_id, "Flip me", &[]);

    let done = tb_json(&f.home, &["task", "done", &task_id]);
    assert_eq!(done["data"]["status"].as_str(), Some("completed"));

    let reopened = tb_json(&f.home, &["task", "reopen", &task_id]);
    assert_eq!(reopened["data"]["status"].as_str(), Some("pending"));
}

#[test]
fn rm_deletes_the_task() {
    let f = fixture();
    let task_id = new_task(&f.home, &f.board_id, &f.list_id, "Gone soon", &[]);

    tb_cmd(&f.home)
        .args(["task", "rm", &task_id])
        .assert()
        .success();

    tb_cmd(&f.home)
        .args(["task", "rm", &task_id])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Task not found"));
}
