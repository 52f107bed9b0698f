use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::model::{DEFAULT_WARNING_LINES, ExecMode, WorkerConfig};

/// Directory searched for in the working directory and its ancestors
pub const CONFIG_DIR: &str = ".jobwrap";
/// File name inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    worker: Option<WorkerSection>,
}

/// The `[worker]` table. Every field is optional; absent fields fall through
/// to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerSection {
    pub name: Option<String>,
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub mode: Option<ExecMode>,
    pub warning_lines: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Source of a configuration value for attribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::ConfigFile(path) => write!(f, "config file ({})", path.display()),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// Values supplied on the command line. `None` and an empty `args` mean
/// "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub name: Option<String>,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub mode: Option<ExecMode>,
    pub warning_lines: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// A validated worker configuration plus where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub worker: WorkerConfig,
    /// The config file that was loaded, if any
    pub config_path: Option<PathBuf>,
    pub source_attribution: BTreeMap<String, ConfigSource>,
}

impl ResolvedConfig {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is given.
    ///
    /// # Errors
    ///
    /// Unreadable or malformed config files, and values that fail
    /// [`WorkerConfigBuilder::build`](crate::WorkerConfigBuilder::build).
    pub fn discover(cli: &CliOverrides) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::WorkingDirectory {
            reason: e.to_string(),
        })?;
        Self::discover_from(&start_dir, cli)
    }

    /// Discover and load configuration starting from a specific directory.
    ///
    /// # Errors
    ///
    /// See [`discover`](Self::discover).
    pub fn discover_from(start_dir: &Path, cli: &CliOverrides) -> Result<Self, ConfigError> {
        let config_path = match &cli.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => discover_config_file_from(start_dir),
        };

        let file = match &config_path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                load_config_file(path)?
            }
            None => WorkerSection::default(),
        };

        Self::merge(config_path, file, cli)
    }

    fn merge(
        config_path: Option<PathBuf>,
        file: WorkerSection,
        cli: &CliOverrides,
    ) -> Result<Self, ConfigError> {
        let mut attribution = BTreeMap::new();
        let file_source = config_path
            .clone()
            .map_or(ConfigSource::Defaults, ConfigSource::ConfigFile);

        for key in ["args", "mode", "warning_lines", "timeout"] {
            attribution.insert(key.to_string(), ConfigSource::Defaults);
        }

        let mut pick = |key: &str, from_cli: bool, from_file: bool| {
            if from_cli {
                attribution.insert(key.to_string(), ConfigSource::Cli);
            } else if from_file {
                attribution.insert(key.to_string(), file_source.clone());
            }
        };

        pick("name", cli.name.is_some(), file.name.is_some());
        pick("command", cli.command.is_some(), file.command.is_some());
        pick("args", !cli.args.is_empty(), file.args.is_some());
        pick("mode", cli.mode.is_some(), file.mode.is_some());
        pick(
            "warning_lines",
            cli.warning_lines.is_some(),
            file.warning_lines.is_some(),
        );
        pick(
            "timeout",
            cli.timeout_secs.is_some(),
            file.timeout_secs.is_some(),
        );

        let mut builder = WorkerConfig::builder()
            .mode(cli.mode.or(file.mode).unwrap_or_default())
            .warning_lines(
                cli.warning_lines
                    .or(file.warning_lines)
                    .unwrap_or(DEFAULT_WARNING_LINES),
            );

        if let Some(name) = cli.name.clone().or(file.name) {
            builder = builder.name(name);
        }
        if let Some(command) = cli.command.clone().or(file.command) {
            builder = builder.command(command);
        }
        if cli.args.is_empty() {
            builder = builder.args(file.args.unwrap_or_default());
        } else {
            builder = builder.args(cli.args.iter().cloned());
        }
        if let Some(secs) = cli.timeout_secs.or(file.timeout_secs) {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            worker: builder.build()?,
            config_path,
            source_attribution: attribution,
        })
    }

    /// Effective configuration as `key -> (value, source)`.
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let worker = &self.worker;
        let timeout = worker
            .timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()));

        [
            ("name", worker.name.clone()),
            ("command", worker.command.clone()),
            ("args", worker.args.join(" ")),
            ("mode", worker.mode.to_string()),
            ("warning_lines", worker.warning_lines.to_string()),
            ("timeout", timeout),
        ]
        .into_iter()
        .map(|(key, value)| {
            let source = self
                .source_attribution
                .get(key)
                .map_or_else(|| ConfigSource::Defaults.to_string(), ToString::to_string);
            (key.to_string(), (value, source))
        })
        .collect()
    }
}

/// Search `start_dir` and its ancestors for `.jobwrap/config.toml`.
///
/// The search stops at the first directory holding a repository marker
/// (`.git`, `.hg`, `.svn`) or at the filesystem root.
#[must_use]
pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = Some(start_dir);

    while let Some(dir) = current {
        let candidate = dir.join(CONFIG_DIR).join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }

        if [".git", ".hg", ".svn"].iter().any(|m| dir.join(m).exists()) {
            break;
        }
        current = dir.parent();
    }

    None
}

/// Load the `[worker]` section of a TOML config file.
///
/// # Errors
///
/// [`ConfigError::Read`] if the file cannot be read and
/// [`ConfigError::Parse`] if it is not valid TOML for this schema.
pub fn load_config_file(path: &Path) -> Result<WorkerSection, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let config: TomlConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(config.worker.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE);
        fs::write(&path, body).unwrap();
        path
    }

    fn repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        temp
    }

    #[test]
    fn test_discover_finds_config_in_ancestor() {
        let temp = repo();
        let path = write_config(temp.path(), "[worker]\nname = \"resize\"\n");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_config_file_from(&nested), Some(path));
    }

    #[test]
    fn test_discover_stops_at_repository_root() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "[worker]\nname = \"outer\"\n");
        let inner = temp.path().join("project");
        fs::create_dir_all(inner.join(".git")).unwrap();

        assert_eq!(discover_config_file_from(&inner), None);
    }

    #[test]
    fn test_file_values_and_defaults() {
        let temp = repo();
        let path = write_config(
            temp.path(),
            r#"
[worker]
name = "resize"
command = "/usr/local/bin/resize"
args = ["--fast"]
mode = "args"
timeout_secs = 30
"#,
        );

        let resolved = ResolvedConfig::discover_from(temp.path(), &CliOverrides::default()).unwrap();

        assert_eq!(resolved.worker.name, "resize");
        assert_eq!(resolved.worker.command, "/usr/local/bin/resize");
        assert_eq!(resolved.worker.args, vec!["--fast"]);
        assert_eq!(resolved.worker.mode, ExecMode::Args);
        assert_eq!(resolved.worker.warning_lines, DEFAULT_WARNING_LINES);
        assert_eq!(resolved.worker.timeout, Some(Duration::from_secs(30)));
        assert_eq!(resolved.config_path, Some(path.clone()));

        let file_source = ConfigSource::ConfigFile(path);
        assert_eq!(resolved.source_attribution["name"], file_source);
        assert_eq!(resolved.source_attribution["mode"], file_source);
        assert_eq!(
            resolved.source_attribution["warning_lines"],
            ConfigSource::Defaults
        );
    }

    #[test]
    fn test_cli_overrides_file() {
        let temp = repo();
        write_config(
            temp.path(),
            "[worker]\nname = \"resize\"\ncommand = \"from-file\"\nargs = [\"--file\"]\nwarning_lines = 9\n",
        );
        let cli = CliOverrides {
            command: Some("from-cli".to_string()),
            args: vec!["--cli".to_string()],
            ..CliOverrides::default()
        };

        let resolved = ResolvedConfig::discover_from(temp.path(), &cli).unwrap();

        assert_eq!(resolved.worker.name, "resize");
        assert_eq!(resolved.worker.command, "from-cli");
        assert_eq!(resolved.worker.args, vec!["--cli"]);
        assert_eq!(resolved.worker.warning_lines, 9);
        assert_eq!(resolved.source_attribution["command"], ConfigSource::Cli);
        assert_eq!(resolved.source_attribution["args"], ConfigSource::Cli);
        assert!(matches!(
            resolved.source_attribution["warning_lines"],
            ConfigSource::ConfigFile(_)
        ));
    }

    #[test]
    fn test_no_file_cli_only() {
        let temp = repo();
        let cli = CliOverrides {
            name: Some("job".to_string()),
            command: Some("cmd".to_string()),
            ..CliOverrides::default()
        };

        let resolved = ResolvedConfig::discover_from(temp.path(), &cli).unwrap();

        assert_eq!(resolved.config_path, None);
        assert_eq!(resolved.worker.mode, ExecMode::Payload);

        let effective = resolved.effective_config();
        assert_eq!(effective["name"], ("job".to_string(), "CLI".to_string()));
        assert_eq!(
            effective["timeout"],
            ("none".to_string(), "defaults".to_string())
        );
    }

    #[test]
    fn test_missing_name_reported() {
        let temp = repo();
        let err = ResolvedConfig::discover_from(temp.path(), &CliOverrides::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingName);
    }

    #[test]
    fn test_explicit_missing_file_is_read_error() {
        let temp = repo();
        let cli = CliOverrides {
            config_path: Some(temp.path().join("nope.toml")),
            ..CliOverrides::default()
        };
        let err = ResolvedConfig::discover_from(temp.path(), &cli).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let temp = repo();
        write_config(temp.path(), "[worker]\nname = \"x\"\nshell = true\n");
        let err = ResolvedConfig::discover_from(temp.path(), &CliOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_bad_mode_is_parse_error() {
        let temp = repo();
        let path = write_config(temp.path(), "[worker]\nmode = \"shell\"\n");
        assert!(matches!(
            load_config_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let temp = repo();
        let path = write_config(temp.path(), "");
        assert_eq!(load_config_file(&path).unwrap(), WorkerSection::default());
    }
}
