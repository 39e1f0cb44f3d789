// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{MakeError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = MakeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.launchers == Some(0) {
        return Err(MakeError::Config(
            "[config].launchers must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(rules) = &cfg.config.rules {
        if rules.as_os_str().is_empty() {
            return Err(MakeError::Config(
                "[config].rules must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
