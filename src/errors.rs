// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::BuildError;
use crate::rules::parser::ParseError;

#[derive(Error, Debug)]
pub enum MakeError {
    #[error("Rule file parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path {0:?} isn't a directory")]
    InvalidDir(PathBuf),

    #[error("Cycle detected in dependency graph: {0}")]
    DependencyCycle(String),

    #[error("Target '{0}' cannot depend on itself")]
    SelfDependency(String),

    #[error("Rule file must contain at least one rule")]
    EmptyRuleSet,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, MakeError>;
