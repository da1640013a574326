//! tb auth command implementations.

use std::path::PathBuf;

use chrono::Utc;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::Context;

pub struct SendCodeOptions {
    pub email: String,
    pub name: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct VerifyOptions {
    pub email: String,
    pub code: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct WhoamiOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct LogoutOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run_send_code(options: SendCodeOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let issued = ctx
        .auth_service()
        .send_code(&options.email, &options.name, Utc::now())?;

    // There is no mail delivery; the code is handed straight back.
    let mut human = HumanOutput::new("Login code issued");
    human.push_summary("email", issued.email.clone());
    human.push_summary("code", issued.code.clone());
    human.push_summary("expires at", issued.expires_at.to_rfc3339());
    human.push_next_step(format!(
        "tb auth verify --email {} --code {}",
        issued.email, issued.code
    ));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "auth send-code",
        &issued,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct VerifiedOutput {
    id: String,
    email: String,
    name: String,
}

pub fn run_verify(options: VerifyOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx
        .auth_service()
        .verify_code(&options.email, &options.code, Utc::now())?;

    let output = VerifiedOutput {
        id: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
    };

    let mut human = HumanOutput::new("Logged in");
    human.push_summary("user", format!("{} <{}>", user.name, user.email));
    human.push_next_step("tb board ls");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "auth verify",
        &output,
        Some(&human),
    )
}

pub fn run_whoami(options: WhoamiOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let user = ctx.auth_service().require_user()?;

    let output = VerifiedOutput {
        id: user.id.clone(),
        email: user.email.clone(),
        name: user.name.clone(),
    };

    let mut human = HumanOutput::new("Signed in");
    human.push_summary("user", format!("{} <{}>", user.name, user.email));
    human.push_summary("id", user.id);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "auth whoami",
        &output,
        Some(&human),
    )
}

#[derive(serde::Serialize)]
struct LogoutOutput {
    logged_out: bool,
}

pub fn run_logout(options: LogoutOptions) -> Result<()> {
    let ctx = Context::load(options.data_dir)?;
    let logged_out = ctx.auth_service().logout()?;

    let header = if logged_out {
        "Logged out"
    } else {
        "No active session"
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "auth logout",
        &LogoutOutput { logged_out },
        Some(&HumanOutput::new(header)),
    )
}
