use crate::config::TOOL;
use crate::ops::{Cmd, HostOps};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;

// X.Y.Z or X.Y.Z-suffix at the start of a line
static VERSION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+(-[\w.]+)?").unwrap());

/// What the host currently has on PATH. `None` means the query failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Installation {
    pub version: Option<String>,
    pub path: Option<PathBuf>,
}

pub fn is_installed(host: &dyn HostOps) -> bool {
    host.locate(TOOL).is_some()
}

pub fn current_version(host: &dyn HostOps) -> Option<String> {
    host.capture(&Cmd::new(TOOL).arg("version"))
        .ok()
        .map(|out| extract_version(&out))
}

pub fn current_path(host: &dyn HostOps) -> Option<PathBuf> {
    host.locate(TOOL)
}

pub fn inspect(host: &dyn HostOps) -> Installation {
    Installation {
        version: current_version(host),
        path: current_path(host),
    }
}

/// `bdy version` may print an update notice around the real version, so the
/// last version-looking line wins. Falls back to the whole trimmed output.
pub fn extract_version(output: &str) -> String {
    let trimmed = output.trim();
    trimmed
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| VERSION_LINE.is_match(line))
        .unwrap_or(trimmed)
        .to_string()
}
