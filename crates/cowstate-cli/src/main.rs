#![forbid(unsafe_code)]

mod cmd;
mod input;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cowstate_core::config;
use output::{CliError, OutputMode, render_error};
use std::env;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cowstate: copy-on-write JSON state updates",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format (pretty, text, json).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Output format requested on the command line, if any.
    fn format_flag(&self) -> Option<&'static str> {
        if self.json {
            return Some(OutputMode::Json.as_str());
        }
        self.format.map(OutputMode::as_str)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Update",
        about = "Apply a change set to a state document",
        long_about = "Apply a JSON object of property changes to a JSON object state. \
                      Unchanged properties are skipped; a null value deletes the property.",
        after_help = "EXAMPLES:\n    # Apply changes and print the result\n    cowstate assign state.json changes.json\n\n    # Update the file only if something changed\n    cowstate assign state.json changes.json --in-place\n\n    # Read changes from stdin\n    echo '{\"count\": 2}' | cowstate assign state.json -"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Update",
        about = "Set or delete one property",
        long_about = "Set one property of a JSON object state to a JSON value, or delete it when no value \
                      (or --delete) is given. Like assign, a null value deletes unless --keep-null is set.",
        after_help = "EXAMPLES:\n    # Set a number\n    cowstate set state.json count 3\n\n    # Set a string\n    cowstate set state.json name '\"ada\"'\n\n    # Delete a property\n    cowstate set state.json stale --delete"
    )]
    Set(cmd::set::SetArgs),

    #[command(
        next_help_heading = "Compare",
        about = "Compare two JSON documents by deep equality",
        long_about = "Compare two JSON documents structurally. Exits 0 when equal, 1 when different.",
        after_help = "EXAMPLES:\n    # Compare two files\n    cowstate equals a.json b.json\n\n    # Use only the exit code\n    cowstate equals a.json b.json --quiet"
    )]
    Equals(cmd::equals::EqualsArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    cowstate completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COWSTATE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "cowstate=debug,cowstate_core=debug,info"
        } else {
            "cowstate=info,cowstate_core=info,warn"
        })
    });

    let format = env::var("COWSTATE_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Exit code for a failed command (1 is reserved for `equals` mismatches).
const EXIT_ERROR: u8 = 2;

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let resolved = env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|root| config::resolve_config(&root, cli.format_flag()));
    let effective = match resolved {
        Ok(effective) => effective,
        Err(err) => {
            // Without config only the flag can pick the format.
            let output = cli
                .format_flag()
                .map_or(OutputMode::Text, OutputMode::from_resolved);
            return fail(output, &err);
        }
    };
    let output = OutputMode::from_resolved(&effective.resolved_output);

    let command_result = match cli.command {
        Commands::Assign(ref args) => {
            cmd::assign::run_assign(args, output, &effective).map(|()| ExitCode::SUCCESS)
        }
        Commands::Set(ref args) => {
            cmd::set::run_set(args, output, &effective).map(|()| ExitCode::SUCCESS)
        }
        Commands::Equals(ref args) => cmd::equals::run_equals(args, output, cli.quiet)
            .map(|equal| if equal { ExitCode::SUCCESS } else { ExitCode::FAILURE }),
        Commands::Completions(ref args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
                .map(|()| ExitCode::SUCCESS)
        }
    };

    command_result.or_else(|err| fail(output, &err))
}

/// Render `err` and map it to [`EXIT_ERROR`].
fn fail(output: OutputMode, err: &anyhow::Error) -> anyhow::Result<ExitCode> {
    render_error(output, &CliError::from_anyhow(err))?;
    Ok(ExitCode::from(EXIT_ERROR))
}
