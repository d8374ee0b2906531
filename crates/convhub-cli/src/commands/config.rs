use anyhow::{bail, Result};
use std::path::Path;

use convhub_config::Config;

use crate::cli::ConfigCommands;

pub fn handle(cmd: ConfigCommands, path: Option<&Path>) -> Result<()> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);

    match cmd {
        ConfigCommands::Show => {
            let config = if path.exists() {
                Config::load_from(&path)?
            } else {
                let mut config = Config::default();
                config.apply_env()?;
                config
            };
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => init(&path, force)?,
    }

    Ok(())
}

fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save(path)?;
    println!("✓ Created {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        init(&path, false).unwrap();
        assert!(path.exists());
        assert!(init(&path, false).is_err());
        assert!(init(&path, true).is_ok());

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
