//! Host OS detection and per-OS constants.

use camino::Utf8PathBuf;
use rigup_types::StepError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    MacOs,
    Linux,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsFamily::MacOs => f.write_str("macos"),
            OsFamily::Linux => f.write_str("linux"),
        }
    }
}

/// Detect the OS family from the build target. Anything outside the two
/// supported families is a fatal error.
pub fn detect() -> Result<OsFamily, StepError> {
    match std::env::consts::OS {
        "macos" => Ok(OsFamily::MacOs),
        "linux" => Ok(OsFamily::Linux),
        other => Err(StepError::UnsupportedOs {
            os: other.to_string(),
        }),
    }
}

/// Where Homebrew puts its binaries. Differs by OS and, on macOS, by
/// architecture.
pub fn brew_bin_dir(family: OsFamily, arch: &str) -> Utf8PathBuf {
    match (family, arch) {
        (OsFamily::MacOs, "aarch64") => Utf8PathBuf::from("/opt/homebrew/bin"),
        (OsFamily::MacOs, _) => Utf8PathBuf::from("/usr/local/bin"),
        (OsFamily::Linux, _) => Utf8PathBuf::from("/home/linuxbrew/.linuxbrew/bin"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    fn detect_succeeds_on_supported_hosts() {
        assert!(detect().is_ok());
    }

    #[test]
    fn brew_bin_dir_by_family_and_arch() {
        assert_eq!(
            brew_bin_dir(OsFamily::MacOs, "aarch64").as_str(),
            "/opt/homebrew/bin"
        );
        assert_eq!(
            brew_bin_dir(OsFamily::MacOs, "x86_64").as_str(),
            "/usr/local/bin"
        );
        assert_eq!(
            brew_bin_dir(OsFamily::Linux, "x86_64").as_str(),
            "/home/linuxbrew/.linuxbrew/bin"
        );
    }
}
