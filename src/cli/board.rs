//! tb board command implementations.

use std::path::PathBuf;

use crate::board::Board;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::Context;

pub struct NewOptions {
    pub title: String,
    pub with_lists: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct LsOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RenameOptions {
    pub board: String,
    pub title: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub board: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let board = ctx
        .board_store()
        .create_board(&user.id, &options.title, options.with_lists)?;

    let mut human = HumanOutput::new("Board created");
    human.push_summary("ID", board.id.clone());
    human.push_summary("Title", board.title.clone());
    if !board.lists.is_empty() {
        let titles: Vec<&str> = board.lists.iter().map(|list| list.title.as_str()).collect();
        human.push_summary("Lists", titles.join(", "));
    }
    human.push_next_step(format!("tb list new {} <title>", board.title));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board new",
        &board,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct BoardListOutput {
    total: usize,
    boards: Vec<Board>,
}

pub fn run_ls(options: LsOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let boards = ctx.board_store().boards_for_user(&user.id)?;

    let mut human = HumanOutput::new("Boards");
    human.push_summary("Total", boards.len().to_string());
    for board in &boards {
        let tasks: usize = board.lists.iter().map(|list| list.tasks.len()).sum();
        human.push_detail(format!(
            "{} {} ({} lists, {} tasks)",
            board.id,
            board.title,
            board.lists.len(),
            tasks
        ));
    }

    let output = BoardListOutput {
        total: boards.len(),
        boards,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board ls",
        &output,
        Some(&human),
    )
}

pub fn run_rename(options: RenameOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let board = ctx
        .board_store()
        .rename_board(&user.id, &options.board, &options.title)?;

    let mut human = HumanOutput::new("Board renamed");
    human.push_summary("ID", board.id.clone());
    human.push_summary("Title", board.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board rename",
        &board,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct BoardRemovedOutput {
    id: String,
    title: String,
    lists_removed: usize,
    tasks_removed: usize,
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let removed = ctx.board_store().delete_board(&user.id, &options.board)?;

    let tasks_removed: usize = removed.lists.iter().map(|list| list.tasks.len()).sum();
    let output = BoardRemovedOutput {
        id: removed.id,
        title: removed.title,
        lists_removed: removed.lists.len(),
        tasks_removed,
    };

    let mut human = HumanOutput::new("Board removed");
    human.push_summary("Title", output.title.clone());
    human.push_summary("Lists removed", output.lists_removed.to_string());
    human.push_summary("Tasks removed", output.tasks_removed.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board rm",
        &output,
        Some(&human),
    )
}
