//! Recording stand-ins for the host and the version endpoint.

use crate::config::{Channel, TOOL};
use crate::error::SetupError;
use crate::ops::{Cmd, HostOps};
use crate::versioning::VersionSource;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct FakeHost {
    calls: RefCell<Vec<String>>,
    installed: RefCell<Option<(String, PathBuf)>>,
    after_install: RefCell<Option<(String, PathBuf)>>,
    fail_on: Option<String>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// `bdy version` prints `version_output`; the lookup finds `path`.
    pub fn with_installed(self, version_output: &str, path: &str) -> Self {
        *self.installed.borrow_mut() = Some((version_output.into(), path.into()));
        self
    }

    /// State the host switches to once the first install command succeeds.
    pub fn after_install(self, version_output: &str, path: &str) -> Self {
        *self.after_install.borrow_mut() = Some((version_output.into(), path.into()));
        self
    }

    /// Any command whose rendered line contains `fragment` exits with 1.
    pub fn failing_on(mut self, fragment: &str) -> Self {
        self.fail_on = Some(fragment.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, cmd: &Cmd) -> Result<(), SetupError> {
        let line = cmd.to_string();
        self.calls.borrow_mut().push(line.clone());
        match &self.fail_on {
            Some(fragment) if line.contains(fragment.as_str()) => Err(SetupError::CommandFailed {
                command: line,
                code: Some(1),
            }),
            _ => Ok(()),
        }
    }
}

impl HostOps for FakeHost {
    fn run(&self, cmd: &Cmd) -> Result<(), SetupError> {
        self.record(cmd)?;
        if let Some(next) = self.after_install.borrow_mut().take() {
            *self.installed.borrow_mut() = Some(next);
        }
        Ok(())
    }

    fn capture(&self, cmd: &Cmd) -> Result<String, SetupError> {
        self.record(cmd)?;
        if cmd.program() != TOOL {
            return Ok(String::new());
        }
        match &*self.installed.borrow() {
            Some((version, _)) => Ok(version.clone()),
            None => Err(SetupError::CommandSpawn {
                command: cmd.to_string(),
                cause: std::io::ErrorKind::NotFound.into(),
            }),
        }
    }

    fn locate(&self, binary: &str) -> Option<PathBuf> {
        if binary != TOOL {
            return None;
        }
        self.installed.borrow().as_ref().map(|(_, path)| path.clone())
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        self.calls.borrow_mut().push(format!("rm {}", path.display()));
        Ok(())
    }

    fn prepend_path(&self, dir: &Path) {
        self.calls
            .borrow_mut()
            .push(format!("PATH+={}", dir.display()));
    }
}

pub struct FixedVersion {
    version: String,
    requests: Cell<usize>,
}

impl FixedVersion {
    pub fn new(version: &str) -> Self {
        FixedVersion {
            version: version.into(),
            requests: Cell::new(0),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }
}

impl VersionSource for FixedVersion {
    fn latest(&self, _channel: Channel) -> Result<String, SetupError> {
        self.requests.set(self.requests.get() + 1);
        Ok(self.version.clone())
    }
}
