//! Command-line interface for tb
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is defined in its own submodule.

use clap::{Parser, Subcommand};

use crate::auth::AuthService;
use crate::board::BoardStore;
use crate::config::Config;
use crate::error::Result;
use crate::storage::Storage;

mod auth;
mod board;
mod chat;
mod dashboard;
mod init;
mod list;
mod status;
mod task;
mod ui;

/// tb - Task Board
///
/// Personal boards, lists, and tasks from the terminal, with deadline
/// tracking, a dashboard, email-code login, and an assistant proxy.
#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TB_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the data directory
    Init {
        /// Seed sample data (demo user, board, and tasks)
        #[arg(long)]
        sample: bool,
    },

    /// Show data directory and session status
    Status,

    /// Login with an email code
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Board management
    #[command(subcommand)]
    Board(BoardCommands),

    /// List management within a board
    #[command(subcommand)]
    List(ListCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Show the dashboard (deadline and completion counts)
    Dashboard,

    /// Send a message to the configured assistant
    Chat {
        /// Message text
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Open the interactive board viewer
    Ui,
}

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Issue a login code for an email address
    SendCode {
        /// Email address to log in with
        #[arg(long)]
        email: String,

        /// Display name, used when the account is created
        #[arg(long)]
        name: String,
    },

    /// Verify a login code and sign in
    Verify {
        /// Email address the code was issued for
        #[arg(long)]
        email: String,

        /// The 6-digit code
        #[arg(long)]
        code: String,
    },

    /// Show the signed-in user
    Whoami,

    /// Drop the current session
    Logout,
}

/// Board subcommands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Create a new board
    New {
        /// Board title
        title: String,

        /// Seed the default lists from config
        #[arg(long)]
        with_lists: bool,
    },

    /// List boards
    Ls,

    /// Rename a board
    Rename {
        /// Board id or title
        board: String,

        /// New title
        title: String,
    },

    /// Remove a board and everything on it
    Rm {
        /// Board id or title
        board: String,
    },
}

/// List subcommands
#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Create a new list on a board
    New {
        /// Board id or title
        board: String,

        /// List title
        title: String,
    },

    /// Rename a list
    Rename {
        /// Board id or title
        board: String,

        /// List id or title
        list: String,

        /// New title
        title: String,
    },

    /// Remove a list and its tasks
    Rm {
        /// Board id or title
        board: String,

        /// List id or title
        list: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task in a list
    New {
        /// Board id or title
        board: String,

        /// List id or title
        list: String,

        /// Task title
        title: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// Person responsible
        #[arg(long)]
        responsible: Option<String>,
    },

    /// List tasks with their deadline classification
    Ls {
        /// Only tasks on this board
        #[arg(long)]
        board: Option<String>,

        /// Filter by status: pending, completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Update fields of a task (empty string clears an optional field)
    Update {
        /// Task id
        task: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New deadline as YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,

        /// New responsible
        #[arg(long)]
        responsible: Option<String>,

        /// New status: pending, completed
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark a task completed
    Done {
        /// Task id
        task: String,
    },

    /// Mark a task pending again
    Reopen {
        /// Task id
        task: String,
    },

    /// Remove a task
    Rm {
        /// Task id
        task: String,
    },
}

/// Shared command context: storage plus loaded config
pub(crate) struct Context {
    pub storage: Storage,
    pub config: Config,
}

impl Context {
    /// Resolve storage and config; errors unless `tb init` has run
    pub(crate) fn load(data_dir: Option<std::path::PathBuf>) -> Result<Self> {
        let storage = Storage::resolve(data_dir)?;
        storage.ensure_initialized()?;
        let config = Config::load(&storage.config_file())?;
        Ok(Self { storage, config })
    }

    pub(crate) fn board_store(&self) -> BoardStore {
        BoardStore::new(self.storage.clone(), self.config.boards.clone())
    }

    pub(crate) fn auth_service(&self) -> AuthService {
        AuthService::new(self.storage.clone(), self.config.auth.clone())
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init { sample } => init::run(init::InitOptions {
                sample,
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Status => status::run(status::StatusOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Auth(cmd) => match cmd {
                AuthCommands::SendCode { email, name } => {
                    auth::run_send_code(auth::SendCodeOptions {
                        email,
                        name,
                        data_dir: self.data_dir,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                AuthCommands::Verify { email, code } => auth::run_verify(auth::VerifyOptions {
                    email,
                    code,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                AuthCommands::Whoami => auth::run_whoami(auth::WhoamiOptions {
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                AuthCommands::Logout => auth::run_logout(auth::LogoutOptions {
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Board(cmd) => match cmd {
                BoardCommands::New { title, with_lists } => board::run_new(board::NewOptions {
                    title,
                    with_lists,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                BoardCommands::Ls => board::run_ls(board::LsOptions {
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                BoardCommands::Rename { board, title } => {
                    board::run_rename(board::RenameOptions {
                        board,
                        title,
                        data_dir: self.data_dir,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                BoardCommands::Rm { board } => board::run_rm(board::RmOptions {
                    board,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::List(cmd) => match cmd {
                ListCommands::New { board, title } => list::run_new(list::NewOptions {
                    board,
                    title,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ListCommands::Rename { board, list, title } => {
                    list::run_rename(list::RenameOptions {
                        board,
                        list,
                        title,
                        data_dir: self.data_dir,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                ListCommands::Rm { board, list } => list::run_rm(list::RmOptions {
                    board,
                    list,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    board,
                    list,
                    title,
                    description,
                    deadline,
                    responsible,
                } => task::run_new(task::NewOptions {
                    board,
                    list,
                    title,
                    description,
                    deadline,
                    responsible,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Ls { board, status } => task::run_ls(task::LsOptions {
                    board,
                    status,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Update {
                    task,
                    title,
                    description,
                    deadline,
                    responsible,
                    status,
                } => task::run_update(task::UpdateOptions {
                    task,
                    title,
                    description,
                    deadline,
                    responsible,
                    status,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Done { task } => task::run_done(task::DoneOptions {
                    task,
                    reopen: false,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Reopen { task } => task::run_done(task::DoneOptions {
                    task,
                    reopen: true,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Rm { task } => task::run_rm(task::RmOptions {
                    task,
                    data_dir: self.data_dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Dashboard => dashboard::run(dashboard::DashboardOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Chat { message } => chat::run(chat::ChatOptions {
                message: message.join(" "),
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Ui => ui::run(ui::UiOptions {
                data_dir: self.data_dir,
            }),
        }
    }
}
