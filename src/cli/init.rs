//! tb init command implementation
//!
//! Creates the data directory and default config, optionally seeding the
//! sample data set (a demo user with one board and a couple of dated tasks).

use std::path::PathBuf;

use chrono::{Days, Local, Utc};
use uuid::Uuid;

use crate::auth::{User, UserRegistry};
use crate::board::{BoardStore, TaskDraft};
use crate::config::Config;
use crate::deadline::DATE_FORMAT;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;

const SAMPLE_EMAIL: &str = "admin@task.com";
const SAMPLE_NAME: &str = "Admin";

pub struct InitOptions {
    pub sample: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct InitReport {
    data_dir: PathBuf,
    created: InitCreated,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample: Option<SampleReport>,
}

#[derive(serde::Serialize)]
struct InitCreated {
    data_dir: bool,
    config: bool,
}

#[derive(serde::Serialize)]
struct SampleReport {
    user: String,
    board_id: String,
    tasks: usize,
}

pub fn run(options: InitOptions) -> Result<()> {
    let storage = Storage::resolve(options.data_dir)?;

    let created_dir = !storage.is_initialized();
    storage.init_all()?;

    let config_path = storage.config_file();
    let created_config = !config_path.exists();
    if created_config {
        Config::default().save(&config_path)?;
    }
    let config = Config::load(&config_path)?;

    let sample = if options.sample {
        Some(seed_sample(&storage, &config)?)
    } else {
        None
    };

    let report = InitReport {
        data_dir: storage.data_dir().to_path_buf(),
        created: InitCreated {
            data_dir: created_dir,
            config: created_config,
        },
        sample,
    };

    let header = if created_dir || created_config {
        "tb init: initialized data directory".to_string()
    } else {
        "tb init: nothing to do".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", storage.data_dir().display().to_string());
    human.push_summary(
        "created",
        match (created_dir, created_config) {
            (true, _) => "data dir, tb.toml".to_string(),
            (false, true) => "tb.toml".to_string(),
            (false, false) => "none".to_string(),
        },
    );
    if let Some(sample) = &report.sample {
        human.push_summary(
            "sample",
            format!("{} ({} tasks)", sample.user, sample.tasks),
        );
        human.push_next_step("tb board ls");
        human.push_next_step("tb dashboard");
    } else {
        human.push_next_step("tb auth send-code --email <email> --name <name>");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &report,
        Some(&human),
    )
}

/// Seed the demo user, board, and tasks, and sign the demo user in
fn seed_sample(storage: &Storage, config: &Config) -> Result<SampleReport> {
    let user = storage.update_json(&storage.users_file(), |registry: &mut UserRegistry| {
        if let Some(user) = registry.find_by_email(SAMPLE_EMAIL) {
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: SAMPLE_EMAIL.to_string(),
            name: SAMPLE_NAME.to_string(),
            created_at: Utc::now(),
        };
        registry.insert(user.clone())?;
        Ok(user)
    })?;

    let store = BoardStore::new(storage.clone(), config.boards.clone());
    let board = store.create_board(&user.id, "Sample Project", true)?;
    let inbox = match board.lists.first() {
        Some(list) => list.id.clone(),
        None => store.create_list(&user.id, &board.id, "To Do")?.id,
    };

    let today = Local::now().date_naive();
    let yesterday = today - Days::new(1);

    store.create_task(
        &user.id,
        &board.id,
        &inbox,
        TaskDraft {
            title: "Overdue task".to_string(),
            description: Some("This one slipped".to_string()),
            deadline: Some(yesterday.format(DATE_FORMAT).to_string()),
            responsible: Some(SAMPLE_NAME.to_string()),
        },
    )?;
    store.create_task(
        &user.id,
        &board.id,
        &inbox,
        TaskDraft {
            title: "Due today".to_string(),
            description: Some("Finish before midnight".to_string()),
            deadline: Some(today.format(DATE_FORMAT).to_string()),
            responsible: Some(SAMPLE_NAME.to_string()),
        },
    )?;

    storage.write_session(&user.id)?;

    Ok(SampleReport {
        user: SAMPLE_EMAIL.to_string(),
        board_id: board.id,
        tasks: 2,
    })
}
