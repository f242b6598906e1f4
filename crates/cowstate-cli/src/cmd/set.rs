//! `cowstate set`: the single-property form of `assign`.
//!
//! Omitting the value, or passing `--delete`, deletes the property. A JSON
//! `null` value follows the same rule as `assign`: it deletes unless
//! `null_deletes` is off or `--keep-null` is given.

use crate::cmd::{UpdateOutput, render_update};
use crate::input;
use crate::output::OutputMode;
use anyhow::Result;
use clap::Args;
use cowstate_core::config::EffectiveConfig;
use cowstate_core::{ChangeKind, PropertyChange, UpdateReport, as_state, set};
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::info;

/// Arguments for `cowstate set`.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// State document (JSON object). `-` reads stdin.
    pub state: PathBuf,

    /// Property name to set or delete.
    pub property: String,

    /// New value as JSON (`42`, `'"text"'`, `'{"a": 1}'`). Omit to delete.
    #[arg(allow_negative_numbers = true)]
    pub value: Option<String>,

    /// Delete the property.
    #[arg(long, conflicts_with = "value")]
    pub delete: bool,

    /// Store JSON `null` as a value instead of deleting the property.
    #[arg(long, conflicts_with = "delete")]
    pub keep_null: bool,

    /// Write the result back to the state file when it changed.
    #[arg(long)]
    pub in_place: bool,
}

pub fn run_set(args: &SetArgs, output: OutputMode, config: &EffectiveConfig) -> Result<()> {
    let null_deletes = config.null_deletes && !args.keep_null;
    let value = if args.delete {
        None
    } else {
        args.value
            .as_deref()
            .map(input::parse_json_arg)
            .transpose()?
            .filter(|value| !(null_deletes && value.is_null()))
    };
    let state_doc = input::read_json(&args.state)?;
    let state = as_state(&state_doc)?;

    let kind = if value.is_some() {
        ChangeKind::Set
    } else {
        ChangeKind::Removed
    };
    let next = set(state, &args.property, value);

    let report = match next {
        Cow::Borrowed(_) => UpdateReport::default(),
        Cow::Owned(_) => UpdateReport {
            changes: vec![PropertyChange {
                property: args.property.clone(),
                kind,
            }],
            cloned: true,
        },
    };
    info!(property = %args.property, noop = report.is_noop(), "set complete");

    if args.in_place && !report.is_noop() {
        input::write_json(&args.state, &serde_json::Value::Object((*next).clone()))?;
    }

    render_update(output, &UpdateOutput::new(&next, &report))
}
