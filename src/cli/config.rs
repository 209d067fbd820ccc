use std::fs;
use std::path::PathBuf;

use crate::session::FileTokenStore;

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PARTY_CONSOLE_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("party-console")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// The credential slot shared by every CLI invocation
pub fn token_store() -> anyhow::Result<FileTokenStore> {
    let config_dir = get_config_dir()?;
    Ok(FileTokenStore::in_dir(&config_dir))
}
