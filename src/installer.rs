use crate::config::{Channel, InstallMethod, TOOL};
use crate::error::SetupError;
use crate::ops::{path_arg, Cmd, HostOps};
use crate::platform::{Platform, PlatformInfo};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_INSTALL_DIR: &str = "/usr/local/bin";

const APT_KEYRING: &str = "/usr/share/keyrings/buddy.gpg";
const APT_KEYSERVER: &str = "hkp://keyserver.ubuntu.com:80";
const APT_KEY_ID: &str = "eb39332e766364ca6220e8dc631c5a16310cc0ad";
const APT_SOURCE_LIST: &str = "/etc/apt/sources.list.d/buddy.list";

/// Everything one installation run needs to know.
#[derive(Debug, Clone)]
pub struct InstallRequest<'a> {
    pub method: InstallMethod,
    pub channel: Channel,
    pub version: &'a str,
    pub platform: &'a PlatformInfo,
    pub base_url: &'a str,
    pub install_dir: &'a Path,
}

pub fn validate_method(method: InstallMethod, platform: Platform) -> Result<(), SetupError> {
    if method == InstallMethod::Apt && platform != Platform::Linux {
        return Err(SetupError::UnsupportedMethodForPlatform {
            method: method.as_str(),
            platform: platform.as_str(),
        });
    }
    Ok(())
}

pub fn artifact_url(
    base_url: &str,
    channel: Channel,
    version: &str,
    info: &PlatformInfo,
) -> String {
    format!(
        "{}/{channel}/{version}/{}{}",
        base_url.trim_end_matches('/'),
        info.download_prefix,
        info.file_extension
    )
}

/// Channels other than prod are published as npm dist-tags.
pub fn npm_package(channel: Channel) -> String {
    match channel {
        Channel::Prod => TOOL.to_string(),
        other => format!("{TOOL}@{other}"),
    }
}

/// Runs the selected strategy. Returns a directory that has to be put on PATH
/// for the binary to be found, if the strategy left it outside the usual places.
pub fn install(
    host: &dyn HostOps,
    req: &InstallRequest<'_>,
) -> Result<Option<PathBuf>, SetupError> {
    match req.method {
        InstallMethod::Download => install_via_download(host, req),
        InstallMethod::Apt => {
            install_via_apt(host, req.base_url, req.channel)?;
            Ok(None)
        }
        InstallMethod::Npm => {
            install_via_npm(host, req.channel, req.platform.platform)?;
            Ok(None)
        }
    }
}

fn install_via_download(
    host: &dyn HostOps,
    req: &InstallRequest<'_>,
) -> Result<Option<PathBuf>, SetupError> {
    let info = req.platform;
    info!(
        "Installing BDY CLI {} via download method for {}...",
        req.version, info.download_prefix
    );
    let url = artifact_url(req.base_url, req.channel, req.version, info);
    let archive = PathBuf::from(format!("{TOOL}{}", info.file_extension));
    let dir = path_arg(req.install_dir);

    if info.platform == Platform::Darwin {
        host.run(&Cmd::new("mkdir").args(["-p", dir.as_str()]).elevated())?;
        host.run(&Cmd::new("chmod").args(["755", dir.as_str()]).elevated())?;
    }

    let fetch = Cmd::new("curl").args(["-fL", url.as_str(), "-o"]).arg(path_arg(&archive));
    if let Err(e) = host.run(&fetch) {
        warn!("download of {url} failed: {e}");
        return Err(SetupError::DownloadFailed {
            version: req.version.to_string(),
            channel: req.channel.as_str(),
            url,
        });
    }

    let (extract, bin_dir) = match info.platform {
        Platform::Windows => {
            let here = std::env::current_dir()?;
            (Cmd::new("tar").arg("-xf").arg(path_arg(&archive)), Some(here))
        }
        _ => {
            let extract = Cmd::new("tar")
                .arg("-zxf")
                .arg(path_arg(&archive))
                .args(["-C", dir.as_str()])
                .elevated();
            let custom = req.install_dir != Path::new(DEFAULT_INSTALL_DIR);
            (extract, custom.then(|| req.install_dir.to_path_buf()))
        }
    };
    let extracted = host.run(&extract);
    if let Err(e) = host.remove_file(&archive) {
        warn!("could not remove {}: {e}", archive.display());
    }
    extracted?;

    info!("BDY CLI installed successfully via download method");
    Ok(bin_dir)
}

pub fn apt_steps(base_url: &str, channel: Channel) -> Vec<Cmd> {
    let source = format!(
        "deb [arch=amd64 signed-by={APT_KEYRING}] {}/apt-repo {channel} main",
        base_url.trim_end_matches('/')
    );
    vec![
        Cmd::new("apt-get").arg("update").elevated(),
        Cmd::new("apt-get")
            .args(["install", "-y", "software-properties-common"])
            .elevated(),
        Cmd::new("gpg")
            .args(["--homedir", "/tmp", "--no-default-keyring"])
            .args(["--keyring", APT_KEYRING])
            .args(["--keyserver", APT_KEYSERVER])
            .args(["--recv-keys", APT_KEY_ID])
            .elevated(),
        Cmd::new("bash").arg("-c").arg(format!(
            "echo \"{source}\" | sudo tee {APT_SOURCE_LIST} > /dev/null"
        )),
        Cmd::new("apt-get").arg("update").elevated(),
        Cmd::new("apt-get").args(["install", "-y", TOOL]).elevated(),
    ]
}

fn install_via_apt(host: &dyn HostOps, base_url: &str, channel: Channel) -> Result<(), SetupError> {
    info!("Installing BDY CLI via APT...");
    for step in apt_steps(base_url, channel) {
        host.run(&step)?;
    }
    info!("BDY CLI installed successfully via APT");
    Ok(())
}

pub fn npm_command(channel: Channel, platform: Platform) -> Cmd {
    let cmd = Cmd::new("npm").args(["i", "-g"]).arg(npm_package(channel));
    match platform {
        Platform::Windows => cmd,
        _ => cmd.elevated(),
    }
}

fn install_via_npm(
    host: &dyn HostOps,
    channel: Channel,
    platform: Platform,
) -> Result<(), SetupError> {
    info!("Installing BDY CLI via NPM...");
    host.run(&npm_command(channel, platform))?;
    info!("BDY CLI installed successfully via NPM");
    Ok(())
}
