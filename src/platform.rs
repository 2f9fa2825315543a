use crate::error::SetupError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    Darwin,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

impl Platform {
    /// Accepts both the Node (`darwin`, `win32`) and Rust (`macos`, `windows`) spellings.
    pub fn parse(raw: &str) -> Result<Self, SetupError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(Platform::Linux),
            "darwin" | "macos" => Ok(Platform::Darwin),
            "win32" | "windows" => Ok(Platform::Windows),
            _ => Err(SetupError::UnsupportedPlatform(raw.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Windows => "windows",
        }
    }

    fn download_name(self) -> &'static str {
        match self {
            Platform::Windows => "win",
            other => other.as_str(),
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Platform::Windows => ".zip",
            _ => ".tar.gz",
        }
    }
}

impl Arch {
    pub fn parse(raw: &str) -> Result<Self, SetupError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "x64" | "x86_64" | "amd64" => Ok(Arch::X64),
            "arm64" | "aarch64" => Ok(Arch::Arm64),
            _ => Err(SetupError::UnsupportedArchitecture(raw.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub architecture: Arch,
    pub download_prefix: String,
    pub file_extension: &'static str,
}

impl PlatformInfo {
    pub fn resolve(os: &str, arch: &str) -> Result<Self, SetupError> {
        let platform = Platform::parse(os)?;
        let architecture = Arch::parse(arch)?;
        // no published builds for intel macs or windows on arm
        if matches!(
            (platform, architecture),
            (Platform::Darwin, Arch::X64) | (Platform::Windows, Arch::Arm64)
        ) {
            return Err(SetupError::UnsupportedCombination {
                platform: platform.as_str(),
                architecture: architecture.as_str(),
            });
        }
        Ok(PlatformInfo {
            platform,
            architecture,
            download_prefix: format!("{}-{}", platform.download_name(), architecture),
            file_extension: platform.file_extension(),
        })
    }
}
