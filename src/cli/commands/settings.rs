//! Effective configuration command.

use std::path::Path;

use crate::config::{self, Config};

/// Print where the config is read from and the settings in effect.
///
/// With `init`, the settings are also written out when no config file
/// exists yet.
pub fn cmd_config(config: &Config, explicit_path: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = explicit_path.map(Path::to_path_buf).or_else(config::config_path);

    if init {
        match (&path, explicit_path) {
            (Some(path), _) if path.exists() => {
                anyhow::bail!("Config file already exists: {}", path.display())
            }
            (_, Some(explicit)) => config::save_to(config, explicit)?,
            (_, None) => config::save(config)?,
        }
    }

    match path {
        Some(path) if path.exists() => println!("# Config file: {}", path.display()),
        Some(path) => println!("# Config file: {} (not found, using defaults)", path.display()),
        None => println!("# No config directory, using defaults"),
    }
    println!("# Platform in effect: {}", config.paths.platform());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
