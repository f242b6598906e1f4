//! `cowstate assign`: apply a JSON change set to a JSON state document.
//!
//! Properties whose new value is deep-equal to the current one are skipped;
//! if nothing changes the original document is echoed back and `--in-place`
//! leaves the file untouched.

use crate::cmd::{UpdateOutput, render_update};
use crate::input;
use crate::output::OutputMode;
use anyhow::Result;
use clap::Args;
use cowstate_core::config::EffectiveConfig;
use cowstate_core::{ChangeSet, as_state, assign_with_report};
use std::path::PathBuf;
use tracing::info;

/// Arguments for `cowstate assign`.
#[derive(Args, Debug)]
pub struct AssignArgs {
    /// State document (JSON object). `-` reads stdin.
    pub state: PathBuf,

    /// Change set (JSON object of property -> new value). `-` reads stdin.
    pub changes: PathBuf,

    /// Write the result back to the state file when it changed.
    #[arg(long)]
    pub in_place: bool,

    /// Store JSON `null` as a value instead of deleting the property.
    #[arg(long)]
    pub keep_null: bool,
}

pub fn run_assign(args: &AssignArgs, output: OutputMode, config: &EffectiveConfig) -> Result<()> {
    input::ensure_single_stdin(&[args.state.as_path(), args.changes.as_path()])?;

    let state_doc = input::read_json(&args.state)?;
    let state = as_state(&state_doc)?;
    let null_deletes = config.null_deletes && !args.keep_null;
    let changes = ChangeSet::from_json(input::read_json(&args.changes)?, null_deletes)?;

    let (next, report) = assign_with_report(state, changes);
    info!(
        changed = report.changes.len(),
        noop = report.is_noop(),
        "assign complete"
    );

    if args.in_place && !report.is_noop() {
        input::write_json(&args.state, &serde_json::Value::Object((*next).clone()))?;
    }

    render_update(output, &UpdateOutput::new(&next, &report))
}
