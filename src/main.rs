mod cli;
mod config;
mod error;
mod installer;
mod logging;
mod ops;
mod outputs;
mod platform;
mod probe;
mod setup;
#[cfg(test)]
mod testing;
mod versioning;

use anyhow::{Context, Result};
use clap::Parser;
use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use crate::cli::Cli;
use crate::ops::SystemHost;
use crate::outputs::Reporter;
use crate::setup::Setup;
use crate::versioning::HttpVersionSource;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(cli::usage_exit_code(&err));
        }
    };
    logging::init(cli.debug);
    let message = match panic::catch_unwind(AssertUnwindSafe(|| run(&cli))) {
        Ok(Ok(())) => return ExitCode::SUCCESS,
        Ok(Err(err)) => error::normalize_error(&err),
        Err(payload) => error::normalize_panic(payload.as_ref()),
    };
    tracing::error!("{message}");
    ExitCode::FAILURE
}

fn run(cli: &Cli) -> Result<()> {
    let host = SystemHost;
    let versions = HttpVersionSource::new(&cli.base_url);
    let outputs = Setup::new(&host, &versions, &cli.base_url, &cli.install_dir).run(
        &cli.raw_inputs(),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )?;
    Reporter::from_env()
        .publish(&outputs)
        .context("reporting step outputs")?;
    Ok(())
}
