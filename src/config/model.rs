// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Settings as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// rules = "Rulefile"
/// directory = "build"
/// launchers = 4
/// ```
///
/// All sections and keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,
}

/// `[config]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Rule file to read when none is given on the command line.
    #[serde(default)]
    pub rules: Option<PathBuf>,

    /// Directory the rule file's names are relative to.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Number of launcher tasks used to start workers (must be >= 1).
    #[serde(default)]
    pub launchers: Option<usize>,
}

/// Validated settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub config: ConfigSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection) -> Self {
        Self { config }
    }
}
