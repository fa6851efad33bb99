//! dz login/logout: persist or clear the remote-backend identity.

use serde::Serialize;

use crate::cli::board::Globals;
use crate::error::Result;
use crate::identity;
use crate::output::{emit_success, HumanOutput};
use crate::storage::Storage;

#[derive(Serialize)]
struct LoginReport {
    email: String,
}

#[derive(Serialize)]
struct LogoutReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
}

pub fn run_login(email: String, globals: Globals) -> Result<()> {
    let storage = Storage::resolve(globals.data_dir.clone())?;
    identity::persist_identity(&storage, &email)?;

    let report = LoginReport {
        email: email.trim().to_string(),
    };
    let human = HumanOutput::new(format!("Signed in as {}", report.email));
    emit_success(globals.output(), "login", &report, Some(&human))
}

pub fn run_logout(globals: Globals) -> Result<()> {
    let storage = Storage::resolve(globals.data_dir.clone())?;
    let cleared = identity::clear_identity(&storage)?;

    let human = match &cleared {
        Some(email) => HumanOutput::new(format!("Signed out {email}")),
        None => HumanOutput::new("Nobody was signed in"),
    };
    let report = LogoutReport { email: cleared };
    emit_success(globals.output(), "logout", &report, Some(&human))
}
