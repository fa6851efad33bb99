//! dz log command: show recent activity entries.

use serde::Serialize;

use crate::activity::{ActivityEntry, ActivityLog};
use crate::cli::board::Globals;
use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::storage::Storage;

pub struct LogOptions {
    pub limit: Option<usize>,
    pub globals: Globals,
}

#[derive(Serialize)]
struct LogReport {
    entries: Vec<ActivityEntry>,
    total_shown: usize,
}

pub fn run(options: LogOptions) -> Result<()> {
    let storage = Storage::resolve(options.globals.data_dir.clone())?;
    let config = Config::load_from_dir(storage.root());
    let limit = options.limit.unwrap_or(config.activity.display_limit);

    let log = ActivityLog::with_retention(storage.activity_file(), config.activity.retain);
    let entries = log.recent(limit)?;

    let report = LogReport {
        total_shown: entries.len(),
        entries,
    };

    let mut human = HumanOutput::new("Activity");
    if report.entries.is_empty() {
        human.push_detail("no activity recorded");
    }
    for entry in &report.entries {
        human.push_detail(format!(
            "{}: {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.message
        ));
    }

    emit_success(options.globals.output(), "log", &report, Some(&human))
}
