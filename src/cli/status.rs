//! tb status command implementation.

use std::path::PathBuf;

use crate::board::flatten_tasks;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;

pub struct StatusOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct StatusReport {
    data_dir: PathBuf,
    initialized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserInfo>,
    boards: usize,
    tasks: usize,
}

#[derive(serde::Serialize)]
struct UserInfo {
    id: String,
    email: String,
    name: String,
}

pub fn run(options: StatusOptions) -> Result<()> {
    let storage = Storage::resolve(options.data_dir)?;
    let initialized = storage.is_initialized();

    let mut report = StatusReport {
        data_dir: storage.data_dir().to_path_buf(),
        initialized,
        user: None,
        boards: 0,
        tasks: 0,
    };

    if initialized {
        let ctx = super::Context::load(Some(storage.data_dir().to_path_buf()))?;
        if let Some(user) = ctx.auth_service().current_user()? {
            let boards = ctx.board_store().boards_for_user(&user.id)?;
            report.boards = boards.len();
            report.tasks = flatten_tasks(&boards).len();
            report.user = Some(UserInfo {
                id: user.id,
                email: user.email,
                name: user.name,
            });
        }
    }

    let mut human = HumanOutput::new("tb status");
    human.push_summary("data dir", report.data_dir.display().to_string());
    human.push_summary("initialized", report.initialized.to_string());
    match &report.user {
        Some(user) => {
            human.push_summary("user", format!("{} <{}>", user.name, user.email));
            human.push_summary("boards", report.boards.to_string());
            human.push_summary("tasks", report.tasks.to_string());
        }
        None => {
            human.push_summary("user", "not logged in".to_string());
            if report.initialized {
                human.push_next_step("tb auth send-code --email <email> --name <name>");
            } else {
                human.push_next_step("tb init");
            }
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "status",
        &report,
        Some(&human),
    )
}
