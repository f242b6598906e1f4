pub mod assign;
pub mod completions;
pub mod equals;
pub mod set;

use crate::output::{OutputMode, pretty_kv, pretty_rule, render_mode};
use cowstate_core::{State, UpdateReport};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// Result of an `assign` or `set` command.
#[derive(Debug, Serialize)]
pub struct UpdateOutput {
    pub state: Value,
    pub changed: Vec<String>,
    pub removed: Vec<String>,
    /// True when the input state came back untouched.
    pub noop: bool,
}

impl UpdateOutput {
    pub fn new(state: &State, report: &UpdateReport) -> Self {
        Self {
            state: Value::Object(state.clone()),
            changed: report.set_properties().map(str::to_string).collect(),
            removed: report.removed_properties().map(str::to_string).collect(),
            noop: report.is_noop(),
        }
    }
}

pub fn render_update(output: OutputMode, result: &UpdateOutput) -> anyhow::Result<()> {
    render_mode(output, result, render_update_text, render_update_pretty)
}

fn render_update_text(result: &UpdateOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}", result.state)?;
    if result.noop {
        writeln!(w, "noop")
    } else {
        writeln!(
            w,
            "changed={} removed={}",
            result.changed.join(","),
            result.removed.join(",")
        )
    }
}

fn render_update_pretty(result: &UpdateOutput, w: &mut dyn Write) -> io::Result<()> {
    let body = serde_json::to_string_pretty(&result.state).map_err(io::Error::other)?;
    writeln!(w, "{body}")?;
    pretty_rule(w)?;
    if result.noop {
        return pretty_kv(w, "result", "unchanged (original state returned)");
    }
    pretty_kv(w, "result", "updated (state copied once)")?;
    if !result.changed.is_empty() {
        pretty_kv(w, "changed", result.changed.join(", "))?;
    }
    if !result.removed.is_empty() {
        pretty_kv(w, "removed", result.removed.join(", "))?;
    }
    Ok(())
}
