use reqwest::StatusCode;
use std::any::Any;
use thiserror::Error;

pub const UNKNOWN_FAILURE: &str = "An unknown error occurred";

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Invalid {field}: {value}. Must be one of: {}", allowed.join(", "))]
    InvalidConfiguration {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Unsupported platform: {0}. Only linux, darwin and win32 are supported.")]
    UnsupportedPlatform(String),

    #[error("Unsupported architecture: {0}. Only x64 and arm64 are supported.")]
    UnsupportedArchitecture(String),

    #[error("Unsupported platform/architecture combination: {platform}-{architecture}")]
    UnsupportedCombination {
        platform: &'static str,
        architecture: &'static str,
    },

    #[error("Installation method '{method}' is not supported on {platform}. It requires linux.")]
    UnsupportedMethodForPlatform {
        method: &'static str,
        platform: &'static str,
    },

    // the cause is rendered inline, so it is not chained as a source
    #[error("Failed to fetch latest version from {url}: {cause}")]
    VersionFetchFailed { url: String, cause: FetchFailure },

    #[error(
        "Failed to download BDY CLI {version} from {channel} channel. \
         The version may not exist or the URL is incorrect: {url}"
    )]
    DownloadFailed {
        version: String,
        channel: &'static str,
        url: String,
    },

    #[error("`{command}` failed with {}", exit_description(*code))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("could not start `{command}`: {cause}")]
    CommandSpawn {
        command: String,
        cause: std::io::Error,
    },

    #[error("Unable to write {name}: its name or value contains the delimiter {delimiter}")]
    DelimiterCollision { name: String, delimiter: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("{0}")]
    Status(StatusCode),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

fn exit_description(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

/// Flattens a run failure into the single line reported to the pipeline.
pub fn normalize_error(err: &anyhow::Error) -> String {
    let message = format!("{err:#}");
    if message.trim().is_empty() {
        UNKNOWN_FAILURE.to_string()
    } else {
        message
    }
}

pub fn normalize_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        UNKNOWN_FAILURE.to_string()
    }
}
