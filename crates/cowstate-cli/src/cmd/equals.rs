use crate::input;
use crate::output::{OutputMode, render_mode};
use anyhow::Result;
use clap::Args;
use cowstate_core::equals;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for `cowstate equals`.
#[derive(Args, Debug)]
pub struct EqualsArgs {
    /// First JSON document. `-` reads stdin.
    pub left: PathBuf,

    /// Second JSON document. `-` reads stdin.
    pub right: PathBuf,
}

#[derive(Debug, Serialize)]
struct EqualsOutput {
    equal: bool,
}

/// Compare two documents by deep equality.
///
/// Returns whether they are equal; output is skipped when `quiet`.
pub fn run_equals(args: &EqualsArgs, output: OutputMode, quiet: bool) -> Result<bool> {
    input::ensure_single_stdin(&[args.left.as_path(), args.right.as_path()])?;

    let left = input::read_json(&args.left)?;
    let right = input::read_json(&args.right)?;
    let equal = equals(&left, &right);
    tracing::debug!(equal, "compared documents");

    if !quiet {
        render_mode(
            output,
            &EqualsOutput { equal },
            |v, w| writeln!(w, "{}", v.equal),
            |v, w| {
                if v.equal {
                    writeln!(w, "equal")
                } else {
                    writeln!(w, "different")
                }
            },
        )?;
    }

    Ok(equal)
}
