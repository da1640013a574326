//! tb task command implementations.

use std::path::PathBuf;

use chrono::Local;

use crate::board::{Board, Task, TaskDraft, TaskPatch, TaskStatus};
use crate::deadline::{classify, DeadlineBucket};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::Context;

pub struct NewOptions {
    pub board: String,
    pub list: String,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub responsible: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct LsOptions {
    pub board: Option<String>,
    pub status: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct UpdateOptions {
    pub task: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub responsible: Option<String>,
    pub status: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DoneOptions {
    pub task: String,
    pub reopen: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub task: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// One task with its location and current classification
#[derive(serde::Serialize)]
struct TaskView {
    id: String,
    board: String,
    list: String,
    title: String,
    status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    deadline: Option<String>,
    deadline_bucket: DeadlineBucket,
    deadline_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    responsible: Option<String>,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<TaskView>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let task = ctx.board_store().create_task(
        &user.id,
        &options.board,
        &options.list,
        TaskDraft {
            title: options.title,
            description: options.description,
            deadline: options.deadline,
            responsible: options.responsible,
        },
    )?;

    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    if let Some(deadline) = &task.deadline {
        let today = Local::now().date_naive();
        let status = classify(Some(deadline), today);
        human.push_summary("Deadline", format!("{deadline} ({})", status.label));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task new",
        &task,
        Some(&human),
    )
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;

    let status_filter = match options.status.as_deref() {
        Some(raw) => Some(raw.parse::<TaskStatus>()?),
        None => None,
    };

    let mut boards = ctx.board_store().boards_for_user(&user.id)?;
    if let Some(key) = options.board.as_deref() {
        boards = vec![select_board(boards, key)?];
    }

    let today = Local::now().date_naive();
    let mut tasks = Vec::new();
    for board in &boards {
        for list in &board.lists {
            for task in &list.tasks {
                if let Some(filter) = status_filter {
                    if task.status != filter {
                        continue;
                    }
                }
                tasks.push(view_of(board, &list.title, task, today));
            }
        }
    }

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(format!(
            "[{}] {} {} ({} / {}) · {}",
            task.status, task.id, task.title, task.board, task.list, task.deadline_label
        ));
    }

    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task ls",
        &output,
        Some(&human),
    )
}

pub fn run_update(options: UpdateOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;

    let status = match options.status.as_deref() {
        Some(raw) => Some(raw.parse::<TaskStatus>()?),
        None => None,
    };

    let task = ctx.board_store().update_task(
        &user.id,
        &options.task,
        TaskPatch {
            title: options.title,
            description: options.description,
            deadline: options.deadline,
            responsible: options.responsible,
            status,
        },
    )?;

    let mut human = HumanOutput::new("Task updated");
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task update",
        &task,
        Some(&human),
    )
}

pub fn run_done(options: DoneOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;

    let status = if options.reopen {
        TaskStatus::Pending
    } else {
        TaskStatus::Completed
    };
    let task = ctx
        .board_store()
        .set_task_status(&user.id, &options.task, status)?;

    let header = if options.reopen {
        "Task reopened"
    } else {
        "Task completed"
    };
    let command = if options.reopen {
        "task reopen"
    } else {
        "task done"
    };

    let mut human = HumanOutput::new(header);
    push_task_summary(&mut human, &task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &task,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct TaskRemovedOutput {
    id: String,
    title: String,
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let removed = ctx.board_store().delete_task(&user.id, &options.task)?;

    let output = TaskRemovedOutput {
        id: removed.id,
        title: removed.title,
    };

    let mut human = HumanOutput::new("Task removed");
    human.push_summary("Title", output.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task rm",
        &output,
        Some(&human),
    )
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    if let Some(deadline) = &task.deadline {
        human.push_summary("Deadline", deadline.clone());
    }
}

fn view_of(board: &Board, list_title: &str, task: &Task, today: chrono::NaiveDate) -> TaskView {
    let status = classify(task.deadline.as_deref(), today);
    TaskView {
        id: task.id.clone(),
        board: board.title.clone(),
        list: list_title.to_string(),
        title: task.title.clone(),
        status: task.status,
        deadline: task.deadline.clone(),
        deadline_bucket: status.bucket,
        deadline_label: status.label,
        responsible: task.responsible.clone(),
    }
}

fn select_board(boards: Vec<Board>, key: &str) -> Result<Board> {
    if let Some(board) = boards.iter().find(|board| board.id == key) {
        return Ok(board.clone());
    }

    let mut matches = boards
        .iter()
        .filter(|board| board.title.eq_ignore_ascii_case(key.trim()));
    match (matches.next(), matches.next()) {
        (Some(board), None) => Ok(board.clone()),
        (Some(_), Some(_)) => Err(Error::InvalidArgument(format!(
            "board title '{}' is ambiguous, use the id",
            key
        ))),
        _ => Err(Error::BoardNotFound(key.to_string())),
    }
}
