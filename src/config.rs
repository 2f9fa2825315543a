use crate::error::SetupError;
use std::fmt;

/// Binary, npm package and apt package name of the CLI being installed.
pub const TOOL: &str = "bdy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Dev,
    Beta,
    Stage,
    Master,
    Prod,
}

impl Channel {
    pub const NAMES: &'static [&'static str] = &["dev", "beta", "stage", "master", "prod"];

    pub fn parse(raw: &str) -> Result<Self, SetupError> {
        match raw {
            "dev" => Ok(Channel::Dev),
            "beta" => Ok(Channel::Beta),
            "stage" => Ok(Channel::Stage),
            "master" => Ok(Channel::Master),
            "prod" => Ok(Channel::Prod),
            other => Err(SetupError::InvalidConfiguration {
                field: "env",
                value: other.to_string(),
                allowed: Self::NAMES,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Dev => "dev",
            Channel::Beta => "beta",
            Channel::Stage => "stage",
            Channel::Master => "master",
            Channel::Prod => "prod",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    Download,
    Apt,
    Npm,
}

impl InstallMethod {
    pub const NAMES: &'static [&'static str] = &["download", "apt", "npm"];

    pub fn parse(raw: &str) -> Result<Self, SetupError> {
        match raw {
            "download" => Ok(InstallMethod::Download),
            "apt" => Ok(InstallMethod::Apt),
            "npm" => Ok(InstallMethod::Npm),
            other => Err(SetupError::InvalidConfiguration {
                field: "installation_method",
                value: other.to_string(),
                allowed: Self::NAMES,
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InstallMethod::Download => "download",
            InstallMethod::Apt => "apt",
            InstallMethod::Npm => "npm",
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input values exactly as the pipeline handed them over.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub env: Option<String>,
    pub version: Option<String>,
    pub installation_method: Option<String>,
    pub skip_if_installed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub env: Channel,
    pub version: Option<String>,
    pub installation_method: InstallMethod,
    pub skip_if_installed: bool,
}

impl Inputs {
    pub fn resolve(raw: &RawInputs) -> Result<Self, SetupError> {
        let env = match non_empty(&raw.env) {
            Some(v) => Channel::parse(v)?,
            None => Channel::Prod,
        };
        let installation_method = match non_empty(&raw.installation_method) {
            Some(v) => InstallMethod::parse(v)?,
            None => InstallMethod::Download,
        };
        let skip_if_installed = match non_empty(&raw.skip_if_installed) {
            Some(v) => parse_bool("skip_if_installed", v)?,
            None => false,
        };
        Ok(Inputs {
            env,
            version: non_empty(&raw.version).map(str::to_string),
            installation_method,
            skip_if_installed,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// YAML 1.2 core schema booleans, the same set the actions toolkit accepts
fn parse_bool(field: &'static str, value: &str) -> Result<bool, SetupError> {
    match value {
        "true" | "True" | "TRUE" => Ok(true),
        "false" | "False" | "FALSE" => Ok(false),
        other => Err(SetupError::InvalidConfiguration {
            field,
            value: other.to_string(),
            allowed: &["true", "false"],
        }),
    }
}
