use crate::error::SetupError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    program: String,
    args: Vec<String>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Cmd {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the same command through `sudo`.
    pub fn elevated(self) -> Self {
        Cmd::new("sudo").arg(self.program).args(self.args)
    }

    #[cfg(test)]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Everything the installer needs from the machine it runs on.
pub trait HostOps {
    /// Runs a command with inherited stdio; a non-zero exit is an error.
    fn run(&self, cmd: &Cmd) -> Result<(), SetupError>;
    /// Runs a command and returns its stdout; a non-zero exit is an error.
    fn capture(&self, cmd: &Cmd) -> Result<String, SetupError>;
    /// Looks a binary up on PATH.
    fn locate(&self, binary: &str) -> Option<PathBuf>;
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;
    /// Puts `dir` in front of PATH for this process and anything it spawns.
    fn prepend_path(&self, dir: &Path);
}

pub struct SystemHost;

impl HostOps for SystemHost {
    fn run(&self, cmd: &Cmd) -> Result<(), SetupError> {
        debug!("exec: {cmd}");
        let status = cmd
            .to_command()
            .stdin(Stdio::null())
            .status()
            .map_err(|cause| SetupError::CommandSpawn {
                command: cmd.to_string(),
                cause,
            })?;
        if !status.success() {
            return Err(SetupError::CommandFailed {
                command: cmd.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn capture(&self, cmd: &Cmd) -> Result<String, SetupError> {
        debug!("exec (captured): {cmd}");
        let output = cmd
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|cause| SetupError::CommandSpawn {
                command: cmd.to_string(),
                cause,
            })?;
        if !output.status.success() {
            return Err(SetupError::CommandFailed {
                command: cmd.to_string(),
                code: output.status.code(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn locate(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        fs_err::remove_file(path)
    }

    fn prepend_path(&self, dir: &Path) {
        let current = std::env::var_os("PATH").unwrap_or_default();
        let mut parts: Vec<PathBuf> = std::env::split_paths(&current)
            .filter(|p| p != dir)
            .collect();
        parts.insert(0, dir.to_path_buf());
        match std::env::join_paths(parts) {
            Ok(joined) => std::env::set_var("PATH", joined),
            Err(e) => debug!("PATH left unchanged, {} cannot be joined: {e}", dir.display()),
        }
    }
}

pub fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
