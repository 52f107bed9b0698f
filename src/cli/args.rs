//! CLI argument definitions and parsing structures

use clap::{Args, Parser, Subcommand};
use jobwrap_config::{CliOverrides, ExecMode};
use std::path::{Path, PathBuf};

/// jobwrap - run an external command once per queued job
#[derive(Parser, Debug)]
#[command(name = "jobwrap")]
#[command(about = "Run an external command once per queued job")]
#[command(long_about = r#"
jobwrap turns any command into a job-queue worker. Each job runs the command
once: the job payload becomes its arguments, its stdout becomes the job
result, and the last lines of its stderr are reported as warnings.

EXAMPLES:
  # Run one job locally, payload from stdin, payload passed as base64
  echo -n 'hello' | jobwrap run --name greet --cmd ./greet.sh

  # Forward the payload as shell-style arguments
  echo '"two words" third' | jobwrap run --name echo --cmd echo --mode args

  # Show the effective configuration and where each value came from
  jobwrap config

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .jobwrap/config.toml
  Use --config to specify an explicit config file path
  The queue address is read from JOBWRAP_QUEUE_HOST and JOBWRAP_QUEUE_PORT
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single job and print its result
    Run(RunArgs),

    /// Show the effective configuration
    Config {
        #[command(flatten)]
        worker: WorkerArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Worker settings that override the config file
#[derive(Args, Debug, Clone, Default)]
pub struct WorkerArgs {
    /// Job name this worker serves
    #[arg(long)]
    pub name: Option<String>,

    /// Command to run for each job
    #[arg(long = "cmd")]
    pub command: Option<String>,

    /// Fixed argument placed before the job's own (repeatable)
    #[arg(long = "arg", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// How the payload reaches the command: payload (base64) or args
    #[arg(long)]
    pub mode: Option<ExecMode>,

    /// Number of trailing stderr lines reported as warnings
    #[arg(long)]
    pub warning_lines: Option<usize>,

    /// Kill the command after this many seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

impl WorkerArgs {
    #[must_use]
    pub fn to_overrides(&self, config_path: Option<&Path>) -> CliOverrides {
        CliOverrides {
            config_path: config_path.map(Path::to_path_buf),
            name: self.name.clone(),
            command: self.command.clone(),
            args: self.args.clone(),
            mode: self.mode,
            warning_lines: self.warning_lines,
            timeout_secs: self.timeout_secs,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub worker: WorkerArgs,

    /// Job id (default: a random UUID)
    #[arg(long)]
    pub id: Option<String>,

    /// Payload file; `-` or absent reads stdin
    #[arg(long)]
    pub input: Option<String>,

    /// Result file; absent writes stdout
    #[arg(long)]
    pub output: Option<String>,

    /// Print a JSON job report instead of the raw result
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "jobwrap",
            "run",
            "--name",
            "resize",
            "--cmd",
            "/bin/resize",
            "--arg",
            "--fast",
            "--arg",
            "-q",
            "--mode",
            "args",
            "--warning-lines",
            "2",
            "--timeout",
            "30",
            "--id",
            "job-1",
        ])
        .unwrap();

        let Commands::Run(run) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(run.worker.args, vec!["--fast", "-q"]);
        assert_eq!(run.worker.mode, Some(ExecMode::Args));
        assert_eq!(run.id.as_deref(), Some("job-1"));

        let overrides = run.worker.to_overrides(None);
        assert_eq!(overrides.name.as_deref(), Some("resize"));
        assert_eq!(overrides.command.as_deref(), Some("/bin/resize"));
        assert_eq!(overrides.warning_lines, Some(2));
        assert_eq!(overrides.timeout_secs, Some(30));
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["jobwrap", "run", "--mode", "shell"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["jobwrap", "config", "--json", "-v", "--config", "x.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
        assert!(matches!(cli.command, Commands::Config { json: true, .. }));
    }
}
