//! dz - DoneZo board library
//!
//! This library provides the core of a three-column task board:
//! authoritative in-memory state, pluggable persistence, an append-only
//! activity log, and read-only display projections.
//!
//! # Core Concepts
//!
//! - **Board**: the full set of tasks partitioned by the fixed
//!   categories To-Do, In Progress, and Done
//! - **Session**: the mutation-and-persist sequence behind every user
//!   action; in-memory state changes first, persistence follows
//! - **Persistence strategy**: a local JSON snapshot or a remote REST
//!   task service, interchangeable behind one trait
//! - **Activity log**: append-only, display-only audit trail
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `task`: task entity, categories, validation
//! - `board`: the board state store and its invariants
//! - `session`: mutate-persist-record orchestration
//! - `persist`: local and remote persistence strategies
//! - `activity`: activity log recorder
//! - `view`: sort projections and counts
//! - `identity`: identity for the remote backend
//! - `config`: configuration loading from `dz.toml`
//! - `storage`: data directory layout
//! - `lock`: file locking and atomic writes

pub mod activity;
pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod lock;
pub mod output;
pub mod persist;
pub mod session;
pub mod storage;
pub mod task;
pub mod view;

pub use error::{Error, Result};
