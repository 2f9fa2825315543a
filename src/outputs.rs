use crate::error::SetupError;
use crate::probe::Installation;
use fs_err::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const UNKNOWN: &str = "unknown";

/// Final result of a run, handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outputs {
    pub bdy_version: String,
    pub bdy_path: String,
    /// Directory later steps need on PATH, when the binary landed somewhere unusual.
    pub bin_dir: Option<PathBuf>,
}

impl Outputs {
    pub fn from_probe(found: Installation, bin_dir: Option<PathBuf>) -> Self {
        Outputs {
            bdy_version: found.version.unwrap_or_else(|| UNKNOWN.to_string()),
            bdy_path: found
                .path
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            bin_dir,
        }
    }
}

/// Writes step outputs the way GitHub Actions expects them: through the
/// runner's command files when present, workflow commands on stdout otherwise.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    output_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
}

impl Reporter {
    pub fn new(
        output_file: Option<PathBuf>,
        env_file: Option<PathBuf>,
        path_file: Option<PathBuf>,
    ) -> Self {
        Reporter {
            output_file,
            env_file,
            path_file,
        }
    }

    pub fn from_env() -> Self {
        Reporter::new(
            command_file("GITHUB_OUTPUT"),
            command_file("GITHUB_ENV"),
            command_file("GITHUB_PATH"),
        )
    }

    pub fn publish(&self, outputs: &Outputs) -> Result<(), SetupError> {
        self.export_variable("BDY_VERSION", &outputs.bdy_version)?;
        self.export_variable("BDY_PATH", &outputs.bdy_path)?;
        self.set_output("bdy_version", &outputs.bdy_version)?;
        self.set_output("bdy_path", &outputs.bdy_path)?;
        if let Some(dir) = &outputs.bin_dir {
            self.add_path(dir)?;
        }
        Ok(())
    }

    pub fn export_variable(&self, name: &str, value: &str) -> Result<(), SetupError> {
        match &self.env_file {
            Some(file) => append(file, &key_value_message(name, value)?),
            None => {
                println!(
                    "::set-env name={}::{}",
                    escape_property(name),
                    escape_data(value)
                );
                Ok(())
            }
        }
    }

    pub fn set_output(&self, name: &str, value: &str) -> Result<(), SetupError> {
        match &self.output_file {
            Some(file) => append(file, &key_value_message(name, value)?),
            None => {
                println!();
                println!(
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                );
                Ok(())
            }
        }
    }

    pub fn add_path(&self, dir: &Path) -> Result<(), SetupError> {
        match &self.path_file {
            Some(file) => append(file, &format!("{}\n", dir.display())),
            None => {
                println!("::add-path::{}", escape_data(&dir.display().to_string()));
                Ok(())
            }
        }
    }
}

fn command_file(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn append(file: &Path, text: &str) -> Result<(), SetupError> {
    let mut handle = OpenOptions::new().create(true).append(true).open(file)?;
    handle.write_all(text.as_bytes())?;
    Ok(())
}

fn key_value_message(name: &str, value: &str) -> Result<String, SetupError> {
    heredoc(name, value, &format!("ghadelimiter_{}", Uuid::new_v4()))
}

fn heredoc(name: &str, value: &str, delimiter: &str) -> Result<String, SetupError> {
    if name.contains(delimiter) || value.contains(delimiter) {
        return Err(SetupError::DelimiterCollision {
            name: name.to_string(),
            delimiter: delimiter.to_string(),
        });
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
