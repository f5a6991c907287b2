//! XDG-style configuration path.
//!
//! `$XDG_CONFIG_HOME` is honored on every platform, so the config file sits
//! in the same place on Linux and macOS.

use anyhow::{Result, anyhow};
use std::path::PathBuf;

const APP_DIR: &str = "vntl";

/// Returns the configuration directory for vntl.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/vntl` if `XDG_CONFIG_HOME` is set and non-empty
/// 2. `~/.config/vntl` otherwise
pub fn config_dir() -> Result<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Failed to determine home directory"))?;
    Ok(home.join(".config").join(APP_DIR))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_xdg<F: FnOnce()>(value: Option<&str>, f: F) {
        let original = std::env::var_os("XDG_CONFIG_HOME");
        // SAFETY: environment tests are serialized
        unsafe {
            match value {
                Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        f();
        // SAFETY: environment tests are serialized
        unsafe {
            match original {
                Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_dir_default() {
        with_xdg(None, || {
            assert!(config_dir().unwrap().ends_with(".config/vntl"));
        });
    }

    #[test]
    #[serial]
    fn test_config_dir_xdg_override() {
        with_xdg(Some("/custom/config"), || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/config/vntl"));
        });
    }

    #[test]
    #[serial]
    fn test_config_dir_ignores_empty_xdg() {
        with_xdg(Some(""), || {
            assert!(config_dir().unwrap().ends_with(".config/vntl"));
        });
    }
}
