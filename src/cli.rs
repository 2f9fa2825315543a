use crate::config::RawInputs;
use crate::installer::DEFAULT_INSTALL_DIR;
use crate::versioning::DEFAULT_BASE_URL;
use clap::builder::FalseyValueParser;
use clap::Parser;
use std::path::PathBuf;

/// Inputs arrive as `INPUT_<NAME>` environment variables when run as a
/// pipeline step; the flags are there for local runs.
#[derive(Parser, Debug)]
#[command(
    version,
    name = "setup-bdy",
    about = "Install the BDY CLI in a CI step and report its version and path"
)]
pub struct Cli {
    /// Release channel: dev, beta, stage, master or prod (default prod)
    #[arg(long, env = "INPUT_ENV")]
    pub env: Option<String>,

    /// Exact version to install; the channel's latest when omitted
    #[arg(long = "bdy-version", env = "INPUT_VERSION")]
    pub bdy_version: Option<String>,

    /// download, apt or npm (default download)
    #[arg(long, env = "INPUT_INSTALLATION_METHOD")]
    pub installation_method: Option<String>,

    /// true/false: keep an already installed bdy instead of reinstalling
    #[arg(long, env = "INPUT_SKIP_IF_INSTALLED")]
    pub skip_if_installed: Option<String>,

    /// Root of the release host (latest endpoint, artifacts, apt repository)
    #[arg(long, env = "SETUP_BDY_BASE_URL", default_value = DEFAULT_BASE_URL, hide = true)]
    pub base_url: String,

    /// Where the download method extracts the binary on linux and darwin
    #[arg(long, env = "SETUP_BDY_INSTALL_DIR", default_value = DEFAULT_INSTALL_DIR, hide = true)]
    pub install_dir: PathBuf,

    /// Verbose logging (also enabled by the runner's debug mode)
    #[arg(short, long, env = "RUNNER_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,
}

/// Exit code for an argument error: help and version requests succeed, anything else
/// is a failed run.
pub fn usage_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

impl Cli {
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            env: self.env.clone(),
            version: self.bdy_version.clone(),
            installation_method: self.installation_method.clone(),
            skip_if_installed: self.skip_if_installed.clone(),
        }
    }
}
