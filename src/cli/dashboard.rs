//! tb dashboard command implementation.

use std::path::PathBuf;

use chrono::Local;

use crate::dashboard;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::Context;

pub struct DashboardOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: DashboardOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;

    let boards = ctx.board_store().boards_for_user(&user.id)?;
    let today = Local::now().date_naive();
    let report = dashboard::compute(&boards, today);
    let summary = report.summary;

    let mut human = HumanOutput::new(format!("Dashboard for {}", user.name));
    human.push_summary("Total", summary.total.to_string());
    human.push_summary("Pending", summary.pending.to_string());
    human.push_summary("Completed", summary.completed.to_string());
    human.push_summary("Overdue", summary.overdue.to_string());
    human.push_summary("Due today", summary.today.to_string());
    human.push_summary("Due soon", summary.soon.to_string());
    for board in &report.boards {
        human.push_detail(format!(
            "{}: {} tasks (overdue {}, today {}, soon {}, completed {})",
            board.title,
            board.summary.total,
            board.summary.overdue,
            board.summary.today,
            board.summary.soon,
            board.summary.completed,
        ));
    }
    if summary.overdue > 0 {
        human.push_warning(format!("{} task(s) overdue", summary.overdue));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "dashboard",
        &report,
        Some(&human),
    )
}
