use crate::config::{Inputs, RawInputs};
use crate::error::SetupError;
use crate::installer::{self, InstallRequest};
use crate::ops::HostOps;
use crate::outputs::Outputs;
use crate::platform::PlatformInfo;
use crate::probe;
use crate::versioning::VersionSource;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct Setup<'a> {
    host: &'a dyn HostOps,
    versions: &'a dyn VersionSource,
    base_url: &'a str,
    install_dir: &'a Path,
}

impl<'a> Setup<'a> {
    pub fn new(
        host: &'a dyn HostOps,
        versions: &'a dyn VersionSource,
        base_url: &'a str,
        install_dir: &'a Path,
    ) -> Self {
        Setup {
            host,
            versions,
            base_url,
            install_dir,
        }
    }

    /// Installs the CLI if needed and reports what ended up on the host.
    /// `os` and `arch` are the runtime's raw identifiers.
    pub fn run(&self, raw: &RawInputs, os: &str, arch: &str) -> Result<Outputs, SetupError> {
        let inputs = Inputs::resolve(raw)?;
        let platform = PlatformInfo::resolve(os, arch)?;
        installer::validate_method(inputs.installation_method, platform.platform)?;
        debug!("inputs: {inputs:?}, platform: {platform:?}");

        if probe::is_installed(self.host) {
            let existing = probe::inspect(self.host);
            let shown = existing.version.as_deref().unwrap_or("unknown");
            if inputs.skip_if_installed {
                info!("BDY CLI is already installed ({shown}). Skipping installation.");
                return Ok(Outputs::from_probe(existing, None));
            }
            warn!("BDY CLI is already installed ({shown}). Reinstalling...");
        }

        let version = match &inputs.version {
            Some(v) => v.clone(),
            None => self.versions.latest(inputs.env)?,
        };
        info!("Using BDY CLI version: {version} from {} channel", inputs.env);

        let bin_dir = installer::install(
            self.host,
            &InstallRequest {
                method: inputs.installation_method,
                channel: inputs.env,
                version: &version,
                platform: &platform,
                base_url: self.base_url,
                install_dir: self.install_dir,
            },
        )?;
        if let Some(dir) = &bin_dir {
            self.host.prepend_path(dir);
        }

        Ok(Outputs::from_probe(probe::inspect(self.host), bin_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::DEFAULT_INSTALL_DIR;
    use crate::testing::{FakeHost, FixedVersion};
    use crate::versioning::DEFAULT_BASE_URL;
    use std::path::PathBuf;

    fn inputs(method: &str, version: Option<&str>, skip: bool) -> RawInputs {
        RawInputs {
            env: None,
            version: version.map(String::from),
            installation_method: Some(method.into()),
            skip_if_installed: Some(skip.to_string()),
        }
    }

    fn run(
        host: &FakeHost,
        versions: &FixedVersion,
        raw: &RawInputs,
        os: &str,
        arch: &str,
    ) -> Result<Outputs, SetupError> {
        let install_dir = Path::new(DEFAULT_INSTALL_DIR);
        Setup::new(host, versions, DEFAULT_BASE_URL, install_dir).run(raw, os, arch)
    }

    fn installs(host: &FakeHost) -> usize {
        host.calls().iter().filter(|c| c.starts_with("curl ") || c.contains("npm i -g")).count()
    }

    #[test]
    fn fresh_install_uses_latest_version() {
        let host = FakeHost::new().after_install("1.16.2\n", "/usr/local/bin/bdy");
        let versions = FixedVersion::new("1.16.2");
        let out = run(&host, &versions, &inputs("download", None, false), "linux", "x64").unwrap();
        assert_eq!(versions.requests(), 1);
        assert_eq!(
            host.calls()[0],
            "curl -fL https://es.buddy.works/bdy/prod/1.16.2/linux-x64.tar.gz -o bdy.tar.gz"
        );
        assert_eq!(out.bdy_version, "1.16.2");
        assert_eq!(out.bdy_path, "/usr/local/bin/bdy");
        assert_eq!(out.bin_dir, None);
    }

    #[test]
    fn explicit_version_skips_lookup() {
        let host = FakeHost::new().after_install("1.11.0-dev", "/usr/local/bin/bdy");
        let versions = FixedVersion::new("9.9.9");
        let raw = RawInputs {
            env: Some("dev".into()),
            ..inputs("download", Some("1.11.0-dev"), false)
        };
        let out = run(&host, &versions, &raw, "linux", "arm64").unwrap();
        assert_eq!(versions.requests(), 0);
        assert!(host.calls()[0].contains("/bdy/dev/1.11.0-dev/linux-arm64.tar.gz"));
        assert_eq!(out.bdy_version, "1.11.0-dev");
    }

    #[test]
    fn skip_when_installed() {
        let host = FakeHost::new()
            .with_installed("BDY CLI version:\n1.12.8", "/usr/bin/bdy")
            .after_install("1.16.2", "/usr/local/bin/bdy");
        let versions = FixedVersion::new("1.16.2");
        let out = run(&host, &versions, &inputs("download", None, true), "linux", "x64").unwrap();
        assert_eq!(installs(&host), 0);
        assert_eq!(versions.requests(), 0);
        assert_eq!(out.bdy_version, "1.12.8");
        assert_eq!(out.bdy_path, "/usr/bin/bdy");
    }

    #[test]
    fn reinstall_when_not_skipping() {
        let host = FakeHost::new()
            .with_installed("1.12.8", "/usr/bin/bdy")
            .after_install("1.16.2", "/usr/local/bin/bdy");
        let versions = FixedVersion::new("1.16.2");
        let out = run(&host, &versions, &inputs("npm", None, false), "linux", "x64").unwrap();
        assert_eq!(installs(&host), 1);
        // reported values come from the probe after installation
        assert_eq!(out.bdy_version, "1.16.2");
        assert_eq!(out.bdy_path, "/usr/local/bin/bdy");
    }

    #[test]
    fn skip_flag_without_install_still_installs() {
        let host = FakeHost::new().after_install("1.16.2", "/usr/local/bin/bdy");
        let versions = FixedVersion::new("1.16.2");
        run(&host, &versions, &inputs("download", None, true), "linux", "x64").unwrap();
        assert_eq!(installs(&host), 1);
    }

    #[test]
    fn unknown_outputs_when_probe_fails_after_install() {
        let host = FakeHost::new();
        let versions = FixedVersion::new("1.16.2");
        let out = run(&host, &versions, &inputs("npm", None, false), "darwin", "arm64").unwrap();
        assert_eq!(out.bdy_version, "unknown");
        assert_eq!(out.bdy_path, "unknown");
    }

    #[test]
    fn apt_on_darwin_fails_before_side_effects() {
        let host = FakeHost::new();
        let versions = FixedVersion::new("1.16.2");
        let raw = inputs("apt", None, false);
        let err = run(&host, &versions, &raw, "darwin", "arm64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedMethodForPlatform { .. }));
        assert!(host.calls().is_empty());
        assert_eq!(versions.requests(), 0);
    }

    #[test]
    fn invalid_inputs_fail_first() {
        let host = FakeHost::new();
        let versions = FixedVersion::new("1.16.2");
        let raw = RawInputs {
            env: Some("qa".into()),
            ..RawInputs::default()
        };
        // the platform is bad too, but inputs are checked first
        let err = run(&host, &versions, &raw, "freebsd", "x64").unwrap_err();
        assert!(matches!(err, SetupError::InvalidConfiguration { field: "env", .. }));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn unsupported_platform_aborts() {
        let host = FakeHost::new();
        let versions = FixedVersion::new("1.16.2");
        let err = run(&host, &versions, &RawInputs::default(), "darwin", "x64").unwrap_err();
        assert!(matches!(err, SetupError::UnsupportedCombination { .. }));
        assert!(host.calls().is_empty());
    }

    #[test]
    fn failed_step_aborts_without_outputs() {
        let host = FakeHost::new().failing_on("apt-get install -y software-properties-common");
        let versions = FixedVersion::new("1.16.2");
        let err = run(&host, &versions, &inputs("apt", None, false), "linux", "x64").unwrap_err();
        assert!(matches!(err, SetupError::CommandFailed { .. }));
        // nothing after the failing step, not even the re-probe
        assert_eq!(host.calls().len(), 2);
    }

    #[test]
    fn windows_download_puts_workdir_on_path() {
        let host = FakeHost::new().after_install("1.16.2", "C:\\work\\bdy.exe");
        let versions = FixedVersion::new("1.16.2");
        let out = run(&host, &versions, &inputs("download", None, false), "win32", "x64").unwrap();
        let here: PathBuf = std::env::current_dir().unwrap();
        assert_eq!(out.bin_dir.as_ref(), Some(&here));
        assert!(host.calls().contains(&format!("PATH+={}", here.display())));
    }
}
