//! tb chat command implementation.

use std::path::PathBuf;

use crate::error::Result;
use crate::integrations::assistant::AssistantClient;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::Context;

pub struct ChatOptions {
    pub message: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: ChatOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;

    let client = AssistantClient::from_config(&ctx.config.integrations.assistant)?;
    let reply = client.send(&user.id, &options.message)?;

    let mut human = HumanOutput::new("Assistant");
    human.push_detail(reply.response.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "chat",
        &reply,
        Some(&human),
    )
}
