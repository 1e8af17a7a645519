//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

const CONFIG_FILE: &str = "config.toml";
const APP_DIR: &str = "kino";

/// Resolves the config file path.
///
/// - If `dir` is `Some`, returns `{dir}/config.toml`.
/// - Otherwise follows the XDG base directory layout: `$XDG_CONFIG_HOME/kino/config.toml`,
///   falling back to `$HOME/.config/kino/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable (when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    config_path_from(
        std::env::var("XDG_CONFIG_HOME").ok().as_deref(),
        std::env::var("HOME").ok().as_deref(),
    )
}

/// XDG resolution over explicit variable values.
///
/// Empty and relative `XDG_CONFIG_HOME` values are ignored, as the XDG base
/// directory rules require.
fn config_path_from(xdg_config_home: Option<&str>, home: Option<&str>) -> Result<PathBuf> {
    let config_home = match (xdg_config_home, home) {
        (Some(xdg), _) if Path::new(xdg).is_absolute() => PathBuf::from(xdg),
        (_, Some(home)) if !home.is_empty() => Path::new(home).join(".config"),
        _ => bail!("neither XDG_CONFIG_HOME nor HOME environment variable is set"),
    };
    Ok(config_home.join(APP_DIR).join(CONFIG_FILE))
}
