//! User configuration loading for ghost-edit.
//!
//! User config location: $XDG_CONFIG_HOME/ghost-edit/ghost-edit.toml
//! Fallback: the platform config directory (`~/.config` on Linux).

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::settings::GhostEditSettings;

const CONFIG_DIR_NAME: &str = "ghost-edit";
pub const CONFIG_FILE_NAME: &str = "ghost-edit.toml";

/// Errors from reading the user config file.
#[derive(Debug, Error)]
pub enum UserConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type UserConfigResult<T> = Result<T, UserConfigError>;

/// Returns the path to the user configuration file.
///
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/ghost-edit/ghost-edit.toml
/// 2. Otherwise: `dirs::config_dir()`/ghost-edit/ghost-edit.toml
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => dirs::config_dir()?,
    };
    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the user config.
///
/// A missing file is not an error and yields `Ok(None)`.
pub fn load_user_config() -> UserConfigResult<Option<GhostEditSettings>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path).map_err(|source| UserConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let settings = toml::from_str(&contents)
        .map_err(|source| UserConfigError::Parse { path, source })?;
    Ok(Some(settings))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::env;
    use std::ffi::OsString;
    use std::path::Path;

    /// Sets XDG_CONFIG_HOME for the guard's lifetime.
    pub(crate) struct XdgConfigHome {
        original: Option<OsString>,
    }

    impl XdgConfigHome {
        pub(crate) fn set(path: &Path) -> Self {
            let original = env::var_os("XDG_CONFIG_HOME");
            // SAFETY: callers are #[serial(xdg_env)], so no other test touches the env
            unsafe {
                env::set_var("XDG_CONFIG_HOME", path);
            }
            Self { original }
        }
    }

    impl Drop for XdgConfigHome {
        fn drop(&mut self) {
            // SAFETY: same as above, restoring the original env state
            unsafe {
                match self.original.take() {
                    Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                    None => env::remove_var("XDG_CONFIG_HOME"),
                }
            }
        }
    }
}
