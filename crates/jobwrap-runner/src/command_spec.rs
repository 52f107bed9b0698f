use std::collections::HashMap;
use std::ffi::OsString;
use tokio::process::Command as TokioCommand;

// ============================================================================
// CommandSpec - argv-style process specification
// ============================================================================

/// Specification for a command to execute.
///
/// Arguments are kept as discrete elements and handed to the OS as an argv
/// vector; nothing here goes through a shell.
///
/// # Example
///
/// ```rust
/// use jobwrap_runner::CommandSpec;
/// use std::ffi::OsString;
///
/// let cmd = CommandSpec::new("/usr/local/bin/resize")
///     .arg("--fast")
///     .args(["in.png", "out.png"])
///     .env("JOBWRAP_JOB_ID", "42");
///
/// assert_eq!(cmd.program, OsString::from("/usr/local/bin/resize"));
/// assert_eq!(cmd.args.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandSpec {
    /// The program to execute
    pub program: OsString,
    /// Arguments as discrete elements (NOT shell strings)
    pub args: Vec<OsString>,
    /// Optional environment overrides
    pub env: Option<HashMap<OsString, OsString>>,
}

impl CommandSpec {
    /// Create a new `CommandSpec` with the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: None,
        }
    }

    /// Add a single argument to the command.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments to the command, keeping their order.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the command.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.env
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Program name for log and error messages.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Convert this `CommandSpec` into a `tokio::process::Command`.
    ///
    /// Stdio is left for the caller to configure.
    #[must_use]
    pub fn to_tokio_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref env) = self.env {
            for (key, value) in env {
                cmd.env(key, value);
            }
        }

        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_new() {
        let cmd = CommandSpec::new("worker");
        assert_eq!(cmd.program, OsString::from("worker"));
        assert!(cmd.args.is_empty());
        assert!(cmd.env.is_none());
    }

    #[test]
    fn test_command_spec_builder_chain_keeps_order() {
        let cmd = CommandSpec::new("worker")
            .arg("--fixed")
            .args(["first", "second"])
            .arg("last");

        assert_eq!(
            cmd.args,
            vec![
                OsString::from("--fixed"),
                OsString::from("first"),
                OsString::from("second"),
                OsString::from("last"),
            ]
        );
    }

    #[test]
    fn test_command_spec_env() {
        let cmd = CommandSpec::new("worker")
            .env("JOBWRAP_JOB_ID", "1")
            .env("JOBWRAP_JOB_NAME", "resize");
        let env = cmd.env.as_ref().unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(
            env.get(&OsString::from("JOBWRAP_JOB_NAME")),
            Some(&OsString::from("resize"))
        );
    }

    #[test]
    fn test_command_spec_default() {
        let cmd = CommandSpec::default();
        assert_eq!(cmd.program, OsString::new());
        assert!(cmd.args.is_empty());
        assert!(cmd.env.is_none());
    }

    #[test]
    fn test_command_spec_shell_metacharacters_preserved() {
        let cmd = CommandSpec::new("echo")
            .arg("$(whoami)")
            .arg("`id`")
            .arg("a b;c|d");

        assert_eq!(cmd.args[0], OsString::from("$(whoami)"));
        assert_eq!(cmd.args[1], OsString::from("`id`"));
        assert_eq!(cmd.args[2], OsString::from("a b;c|d"));
    }

    #[test]
    fn test_program_name_lossy() {
        assert_eq!(CommandSpec::new("/bin/sh").program_name(), "/bin/sh");
    }
}
