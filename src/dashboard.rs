use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::board::{flatten_tasks, Board, Task, TaskStatus};
use crate::deadline::{classify, DeadlineBucket};

/// Aggregate counts over a collection of tasks
///
/// This is the one counting rule in the tree: `overdue`/`today`/`soon`
/// bucket by deadline classification alone (completion status does not
/// matter), `soon` covers tomorrow through three days out, and
/// `pending`/`completed` count by status. Every surface that shows counts
/// goes through [`aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
    pub today: usize,
    pub soon: usize,
}

impl DashboardSummary {
    fn add(&mut self, task: &Task, today: NaiveDate) {
        self.total += 1;

        match task.status {
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Completed => self.completed += 1,
        }

        match classify(task.deadline.as_deref(), today).bucket {
            DeadlineBucket::Overdue => self.overdue += 1,
            DeadlineBucket::Today => self.today += 1,
            DeadlineBucket::Tomorrow | DeadlineBucket::Soon => self.soon += 1,
            DeadlineBucket::NoDeadline | DeadlineBucket::OnTime => {}
        }
    }
}

/// Reduce tasks to dashboard counts for an explicit `today`
///
/// Order-independent; duplicates are counted, and a task with a malformed
/// deadline still counts toward `total` (it classifies as no-deadline).
pub fn aggregate<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    today: NaiveDate,
) -> DashboardSummary {
    let mut summary = DashboardSummary::default();
    for task in tasks {
        summary.add(task, today);
    }
    summary
}

/// Counts for a single board
#[derive(Debug, Clone, Serialize)]
pub struct BoardSummary {
    pub board_id: String,
    pub title: String,
    pub summary: DashboardSummary,
}

/// Dashboard over a user's whole board graph
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub date: NaiveDate,
    pub summary: DashboardSummary,
    pub boards: Vec<BoardSummary>,
}

/// Compute the dashboard for a set of boards
pub fn compute(boards: &[Board], today: NaiveDate) -> DashboardReport {
    let boards_summaries = boards
        .iter()
        .map(|board| BoardSummary {
            board_id: board.id.clone(),
            title: board.title.clone(),
            summary: aggregate(
                board.lists.iter().flat_map(|list| list.tasks.iter()),
                today,
            ),
        })
        .collect();

    DashboardReport {
        generated_at: Utc::now(),
        date: today,
        summary: aggregate(flatten_tasks(boards), today),
        boards: boards_summaries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::List;
    use chrono::{Days, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn task(deadline: Option<&str>, status: TaskStatus) -> Task {
        let now = Utc::now();
        Task {
            id: ulid::Ulid::new().to_string(),
            title: "task".to_string(),
            description: None,
            deadline: deadline.map(|s| s.to_string()),
            responsible: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn offset(days: i64) -> String {
        let date = if days >= 0 {
            today() + Days::new(days as u64)
        } else {
            today() - Days::new((-days) as u64)
        };
        date.format("%Y-%m-%d").to_string()
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = aggregate([].iter(), today());
        assert_eq!(summary, DashboardSummary::default());
        assert_eq!(summary.total, 0);
    }

    #[test]
    fn end_to_end_scenario() {
        // Overdue pending, due-today pending, no-deadline completed.
        let tasks = vec![
            task(Some(&offset(-1)), TaskStatus::Pending),
            task(Some(&offset(0)), TaskStatus::Pending),
            task(None, TaskStatus::Completed),
        ];

        let summary = aggregate(tasks.iter(), today());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.today, 1);
        assert_eq!(summary.soon, 0);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 2);
    }

    #[test]
    fn soon_covers_tomorrow_through_three_days() {
        let tasks = vec![
            task(Some(&offset(1)), TaskStatus::Pending),
            task(Some(&offset(2)), TaskStatus::Pending),
            task(Some(&offset(3)), TaskStatus::Pending),
            task(Some(&offset(4)), TaskStatus::Pending),
        ];

        let summary = aggregate(tasks.iter(), today());
        assert_eq!(summary.soon, 3);
    }

    #[test]
    fn bucketing_ignores_completion_status() {
        // A completed task past its deadline still shows as overdue.
        let tasks = vec![task(Some(&offset(-2)), TaskStatus::Completed)];

        let summary = aggregate(tasks.iter(), today());
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.pending, 0);
    }

    #[test]
    fn order_does_not_matter() {
        let mut tasks = vec![
            task(Some(&offset(-1)), TaskStatus::Pending),
            task(Some(&offset(0)), TaskStatus::Completed),
            task(Some(&offset(2)), TaskStatus::Pending),
            task(None, TaskStatus::Pending),
        ];

        let forward = aggregate(tasks.iter(), today());
        tasks.reverse();
        let backward = aggregate(tasks.iter(), today());
        assert_eq!(forward, backward);
    }

    #[test]
    fn malformed_deadlines_still_count_toward_total() {
        let tasks = vec![
            task(Some("garbage"), TaskStatus::Pending),
            task(Some(&offset(0)), TaskStatus::Pending),
        ];

        let summary = aggregate(tasks.iter(), today());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.today, 1);
        assert_eq!(summary.overdue, 0);
    }

    #[test]
    fn duplicates_are_counted() {
        let one = task(Some(&offset(0)), TaskStatus::Pending);
        let twice = vec![one.clone(), one];

        let summary = aggregate(twice.iter(), today());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.today, 2);
    }

    #[test]
    fn per_board_summaries_sum_to_overall() {
        let now = Utc::now();
        let board = |title: &str, tasks: Vec<Task>| Board {
            id: ulid::Ulid::new().to_string(),
            user_id: "user-1".to_string(),
            title: title.to_string(),
            lists: vec![List {
                id: ulid::Ulid::new().to_string(),
                title: "Inbox".to_string(),
                position: 0,
                tasks,
                created_at: now,
            }],
            created_at: now,
        };

        let boards = vec![
            board(
                "Work",
                vec![
                    task(Some(&offset(-1)), TaskStatus::Pending),
                    task(Some(&offset(1)), TaskStatus::Pending),
                ],
            ),
            board("Home", vec![task(None, TaskStatus::Completed)]),
        ];

        let report = compute(&boards, today());
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.boards.len(), 2);

        let by_board_total: usize = report.boards.iter().map(|b| b.summary.total).sum();
        assert_eq!(by_board_total, report.summary.total);
        assert_eq!(report.boards[0].summary.overdue, 1);
        assert_eq!(report.boards[0].summary.soon, 1);
        assert_eq!(report.boards[1].summary.completed, 1);
    }
}
