//! Command-line interface for dz
//!
//! This module defines the CLI structure using clap derive macros.
//! Each user action triggers exactly one mutation-and-persist sequence
//! against the board session.

use clap::{Parser, Subcommand};

use crate::error::Result;

mod auth;
mod board;
mod log;

/// dz - DoneZo board
///
/// A three-column task board (To-Do, In Progress, Done) with local or
/// remote persistence and an activity log.
#[derive(Parser, Debug)]
#[command(name = "dz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "DZ_DATA_DIR")]
    pub data_dir: Option<std::path::PathBuf>,

    /// Identity for the remote backend
    #[arg(long, global = true, env = "DZ_EMAIL")]
    pub email: Option<String>,

    /// Persistence backend: local or remote (overrides dz.toml)
    #[arg(long, global = true, env = "DZ_BACKEND")]
    pub backend: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to a column
    Add {
        /// Title (required, max 50 characters)
        title: String,

        /// Column: To-Do, In Progress, or Done
        #[arg(short, long, default_value = "To-Do")]
        category: String,

        /// Description (max 200 characters)
        #[arg(short, long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Move a task to another column
    Move {
        /// Task id
        id: String,

        /// Target column
        category: String,
    },

    /// Edit a task's title, description, or due date
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// List tasks, optionally for one column
    Ls {
        /// Column to list (all columns when omitted)
        #[arg(short, long)]
        category: Option<String>,

        /// Sort order by creation time: asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
    },

    /// Show per-column task counts
    Status,

    /// Show recent activity log entries
    Log {
        /// Number of entries to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Sign in for the remote backend
    Login {
        /// Identity key (email)
        email: String,
    },

    /// Sign out
    Logout,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let globals = board::Globals {
            data_dir: self.data_dir,
            email: self.email,
            backend: self.backend,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add {
                title,
                category,
                description,
                due,
            } => board::run_add(board::AddOptions {
                title,
                category,
                description,
                due,
                globals,
            }),
            Commands::Move { id, category } => {
                board::run_move(board::MoveOptions {
                    id,
                    category,
                    globals,
                })
            }
            Commands::Edit {
                id,
                title,
                description,
                due,
            } => board::run_edit(board::EditOptions {
                id,
                title,
                description,
                due,
                globals,
            }),
            Commands::Rm { id } => board::run_rm(board::RmOptions { id, globals }),
            Commands::Ls { category, order } => {
                board::run_ls(board::LsOptions {
                    category,
                    order,
                    globals,
                })
            }
            Commands::Status => board::run_status(globals),
            Commands::Log { limit } => log::run(log::LogOptions { limit, globals }),
            Commands::Login { email } => auth::run_login(email, globals),
            Commands::Logout => auth::run_logout(globals),
        }
    }
}
