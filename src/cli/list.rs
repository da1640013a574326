//! tb list command implementations.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::Context;

pub struct NewOptions {
    pub board: String,
    pub title: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RenameOptions {
    pub board: String,
    pub list: String,
    pub title: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub board: String,
    pub list: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let list = ctx
        .board_store()
        .create_list(&user.id, &options.board, &options.title)?;

    let mut human = HumanOutput::new("List created");
    human.push_summary("ID", list.id.clone());
    human.push_summary("Title", list.title.clone());
    human.push_summary("Position", list.position.to_string());
    human.push_next_step(format!(
        "tb task new {} {} <title>",
        options.board, list.title
    ));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list new",
        &list,
        Some(&human),
    )
}

pub fn run_rename(options: RenameOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let list = ctx
        .board_store()
        .rename_list(&user.id, &options.board, &options.list, &options.title)?;

    let mut human = HumanOutput::new("List renamed");
    human.push_summary("ID", list.id.clone());
    human.push_summary("Title", list.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list rename",
        &list,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct ListRemovedOutput {
    id: String,
    title: String,
    tasks_removed: usize,
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    let removed = ctx
        .board_store()
        .delete_list(&user.id, &options.board, &options.list)?;

    let output = ListRemovedOutput {
        id: removed.id,
        title: removed.title,
        tasks_removed: removed.tasks.len(),
    };

    let mut human = HumanOutput::new("List removed");
    human.push_summary("Title", output.title.clone());
    human.push_summary("Tasks removed", output.tasks_removed.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list rm",
        &output,
        Some(&human),
    )
}
