//! Show or initialize the configuration.

use facegym_common::config::{config_file_path, AppConfig};

pub fn run(config: AppConfig, init: bool) -> anyhow::Result<()> {
    if init {
        let path = config_file_path();
        if path.exists() {
            anyhow::bail!("Config already exists at {}", path.display());
        }
        let written = AppConfig::default()
            .save()
            .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;
        println!("Wrote default configuration to {}", written.display());
        return Ok(());
    }

    let effective = config.sanitized()?;
    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(())
}
