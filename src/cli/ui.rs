//! tb ui command implementation.

use std::path::PathBuf;

use crate::error::Result;

use super::Context;

pub struct UiOptions {
    pub data_dir: Option<PathBuf>,
}

pub fn run(options: UiOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;
    crate::ui::run(ctx.board_store(), user)
}
