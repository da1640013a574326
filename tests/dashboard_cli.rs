mod support;

use chrono::{Days, Local};
use support::{login, new_board, new_list, new_task, tb_cmd, tb_json, TestHome};

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
fn empty_dashboard_is_all_zero() {
    let home = TestHome::initialized();
    login(&home, "ana@example.com", "Ana");

    let value = tb_json(&home, &["dashboard"]);
    let summary = &value["data"]["summary"];
    for field in ["total", "pending", "completed", "overdue", "today", "soon"] {
        assert_eq!(summary[field].as_u64(), Some(0), "{field}");
    }
}

#[test]
fn counts_overdue_today_and_completed() {
    let home = TestHome::initialized();
    login(&home, "ana@example.com", "Ana");
    let board_id = new_board(&home, "Work");
    let list_id = new_list(&home, &board_id, "Inbox");

    // Overdue pending, due-today pending, no-deadline completed.
    new_task(
        &home,
        &board_id,
        &list_id,
        "Late",
        &["--deadline", &date_offset(-1)],
    );
    new_task(
        &home,
        &board_id,
        &list_id,
        "Today",
        &["--deadline", &date_offset(0)],
    );
    let done_id = new_task(&home, &board_id, &list_id, "Done", &[]);
    tb_cmd(&home)
        .args(["task", "done", &done_id])
        .assert()
        .success();

    let value = tb_json(&home, &["dashboard"]);
    let summary = &value["data"]["summary"];
    assert_eq!(summary["total"].as_u64(), Some(3));
    assert_eq!(summary["overdue"].as_u64(), Some(1));
    assert_eq!(summary["today"].as_u64(), Some(1));
    assert_eq!(summary["soon"].as_u64(), Some(0));
    assert_eq!(summary["completed"].as_u64(), Some(1));
    assert_eq!(summary["pending"].as_u64(), Some(2));
}

#[test]
fn soon_spans_tomorrow_through_three_days() {
    let home = TestHome::initialized();
    login(&home, "ana@example.com", "Ana");
    let board_id = new_board(&home, "Work");
    let list_id = new_list(&home, &board_id, "Inbox");

    for days in [1, 2, 3, 4] {
        new_task(
            &home,
            &board_id,
            &list_id,
            &format!("In {days}d"),
            &["--deadline", &date_offset(days)],
        );
    }

    let value = tb_json(&home, &["dashboard"]);
    let summary = &value["data"]["summary"];
    assert_eq!(summary["soon"].as_u64(), Some(3));
    assert_eq!(summary["total"].as_u64(), Some(4));
}

#[test]
fn completed_tasks_still_bucket_by_deadline() {
    let home = TestHome::initialized();
    login(&home, "ana@example.com", "Ana");
    let board_id = new_board(&home, "Work");
    let list_id = new_list(&home, &board_id, "Inbox");

    let task_id = new_task(
        &home,
        &board_id,
        &list_id,
        "Late but done",
        &["--deadline", &date_offset(-2)],
    );
    tb_cmd(&home)
        .args(["task", "done", &task_id])
        .assert()
        .success();

    let value = tb_json(&home, &["dashboard"]);
    let summary = &value["data"]["summary"];
    assert_eq!(summary["overdue"].as_u64(), Some(1));
    assert_eq!(summary["completed"].as_u64(), Some(1));
    assert_eq!(summary["pending"].as_u64(), Some(0));
}

#[test]
fn per_board_breakdown_is_reported() {
    let home = TestHome::initialized();
    login(&home, "ana@example.com", "Ana");

    let work = new_board(&home, "Work");
    let work_list = new_list(&home, &work, "Inbox");
    new_task(
        &home,
        &work,
        &work_list,
        "Late",
        &["--deadline", &date_offset(-1)],
    );

    let personal = new_board(&home, "Personal");
    let personal_list = new_list(&home, &personal, "Chores");
    new_task(&home, &personal, &personal_list, "Whenever", &[]);

    let value = tb_json(&home, &["dashboard"]);
    let boards = value["data"]["boards"].as_array().expect("boards");
    assert_eq!(boards.len(), 2);

    let overdue_of = |title: &str| {
        boards
            .iter()
            .find(|board| board["title"].as_str() == Some(title))
            .and_then(|board| board["summary"]["overdue"].as_u64())
    };
    assert_eq!(overdue_of("Work"), Some(1));
    assert_eq!(overdue_of("Personal"), Some(0));
}

#[test]
fn sample_data_shows_up_on_the_dashboard() {
    let home = TestHome::new();
    tb_cmd(&home)
        .args(["init", "--sample"])
        .assert()
        .success();

    let value = tb_json(&home, &["dashboard"]);
    let summary = &value["data"]["summary"];
    assert_eq!(summary["total"].as_u64(), Some(2));
    assert_eq!(summary["overdue"].as_u64(), Some(1));
    assert_eq!(summary["today"].as_u64(), Some(1));
    assert_eq!(summary["pending"].as_u64(), Some(2));
}
