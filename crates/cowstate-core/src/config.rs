use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

/// On-disk configuration, shared by the project and user files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub update: UpdateConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// `pretty`, `text` or `json`.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Whether a JSON `null` in a change set deletes the property.
    #[serde(default)]
    pub null_deletes: Option<bool>,
}

impl Config {
    /// Layer `self` over `base`: fields set in `self` win.
    #[must_use]
    pub fn layered_over(self, base: Self) -> Self {
        Self {
            output: OutputConfig {
                format: self.output.format.or(base.output.format),
            },
            update: UpdateConfig {
                null_deletes: self.update.null_deletes.or(base.update.null_deletes),
            },
        }
    }
}

/// Resolved settings after layering files, env and flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub resolved_output: String,
    pub null_deletes: bool,
}

pub fn load_project_config(project_root: &Path) -> Result<Config> {
    load_config_file(&project_root.join(".cowstate/config.toml"))
}

pub fn load_user_config() -> Result<Config> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config_file(&config_dir.join("cowstate/config.toml"))
}

fn load_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<Config>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load project and user config and resolve the effective settings.
///
/// Output precedence: `cli_format` (from `--format`/`--json`), then the
/// `FORMAT` env var, then config files (project over user), then TTY
/// detection.
pub fn resolve_config(project_root: &Path, cli_format: Option<&str>) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    let merged = project.layered_over(user);

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_format,
        env_format.as_deref(),
        merged.output.format.as_deref(),
        std::io::stdout().is_terminal(),
    );

    Ok(EffectiveConfig {
        resolved_output,
        null_deletes: merged.update.null_deletes.unwrap_or_else(default_true),
    })
}

fn resolve_output(
    cli_format: Option<&str>,
    env_format: Option<&str>,
    config_format: Option<&str>,
    is_tty: bool,
) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "compact" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    let chosen = [cli_format, env_format, config_format]
        .into_iter()
        .flatten()
        .find_map(normalize_output_mode);

    match chosen {
        Some(mode) => mode.to_string(),
        None if is_tty => "pretty".to_string(),
        None => "text".to_string(),
    }
}

const fn default_true() -> bool {
    true
}
