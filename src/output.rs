//! Shared output formatting for dz CLI commands.

use serde::Serialize;

use crate::error::Result;

pub const SCHEMA_VERSION: &str = "dz.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_warnings(&mut self, values: &[String]) {
        self.warnings.extend(values.iter().cloned());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);

    lines.join("\n")
}

/// Global flags that take their value as a separate argument; the
/// value must not be mistaken for the subcommand.
const VALUE_FLAGS: &[&str] = &["--data-dir", "--email", "--backend"];

pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(mut args: impl Iterator<Item = String>) -> String {
    while let Some(arg) = args.next() {
        if !arg.starts_with('-') {
            return arg;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
        }
    }

    "dz".to_string()
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &crate::error::Error) -> Vec<String> {
    use crate::error::Error;

    match err {
        Error::NotFound(_) => vec!["dz ls to list task ids".to_string()],
        Error::InvalidCategory(_) => {
            vec!["categories are To-Do, In Progress, Done".to_string()]
        }
        Error::InvalidArgument(msg) if msg.contains("identity") || msg.contains("email") => {
            vec!["dz login <email>".to_string()]
        }
        Error::InvalidConfig(_) => vec!["fix dz.toml then retry".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_output_sections_render_in_order() {
        let mut output = HumanOutput::new("Task created");
        output.push_summary("id", "abc");
        output.push_detail("title: A");
        output.push_warning("persistence failed: backend down");

        let rendered = format_human(&output);
        assert!(rendered.starts_with("Task created"));
        let summary_at = rendered.find("Summary:").unwrap();
        let details_at = rendered.find("Details:").unwrap();
        let warnings_at = rendered.find("Warnings:").unwrap();
        assert!(summary_at < details_at && details_at < warnings_at);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let output = HumanOutput::new("Board");
        assert_eq!(format_human(&output), "Board");
    }

    fn infer(args: &[&str]) -> String {
        infer_command_name(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn command_name_skips_global_flag_values() {
        assert_eq!(infer(&["--data-dir", "/tmp/x", "status", "--json"]), "status");
        assert_eq!(infer(&["--email", "a@b.c", "--backend", "remote", "add"]), "add");
        assert_eq!(infer(&["--data-dir=/tmp/x", "--json", "ls"]), "ls");
        assert_eq!(infer(&["-q", "log"]), "log");
        assert_eq!(infer(&[]), "dz");
    }
}
