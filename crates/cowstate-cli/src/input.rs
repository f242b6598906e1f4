//! Reading and writing JSON documents named on the command line.
//!
//! A path of `-` means stdin. Only one argument per invocation may read
//! stdin.

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// Returns true if `path` names stdin.
pub fn is_stdin(path: &Path) -> bool {
    path == Path::new("-")
}

/// Fail unless at most one of `paths` is stdin.
pub fn ensure_single_stdin(paths: &[&Path]) -> Result<()> {
    if paths.iter().filter(|path| is_stdin(path)).count() > 1 {
        bail!("only one input may be read from stdin (`-`)");
    }
    Ok(())
}

/// Read and parse a JSON document from a file or stdin.
pub fn read_json(path: &Path) -> Result<Value> {
    let (content, source) = if is_stdin(path) {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        (buf, "<stdin>".to_string())
    } else {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        (content, path.display().to_string())
    };

    tracing::debug!(source = %source, bytes = content.len(), "read JSON input");
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON from {source}"))
}

/// Parse a command-line value as JSON.
pub fn parse_json_arg(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).with_context(|| {
        format!("Failed to parse value as JSON: {raw} (quote strings, e.g. '\"{raw}\"')")
    })
}

/// Write `value` back to `path` as pretty JSON with a trailing newline.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    if is_stdin(path) {
        bail!("--in-place needs a file path, not stdin");
    }
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote updated state");
    Ok(())
}
