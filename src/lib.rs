// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod rules;
pub mod scan;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::dag::DepGraph;
use crate::engine::{make_controller, BuildMsg, ControllerOptions};
use crate::errors::MakeError;
use crate::rules::RuleSet;
use crate::scan::FileScan;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings file + CLI overrides
/// - rule file parsing and validation
/// - the file scan rooted at the build directory
/// - the build controller, whose single outcome becomes our result
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);
    let settings = config::load_optional(&config_path)?;

    let rules_path = rules_path(&args, &settings)?;
    let rule_set = rules::load_and_validate(&rules_path)
        .with_context(|| format!("loading rule file {}", rules_path.display()))?;

    if args.dry_run {
        print_dry_run(&rule_set);
        return Ok(());
    }

    let directory = args
        .directory
        .clone()
        .or_else(|| settings.config.directory.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let scan = FileScan::from_dir(&directory)?;

    let options = controller_options(&args, &settings);
    info!(
        rules = %rules_path.display(),
        directory = %directory.display(),
        launchers = options.launchers,
        "building"
    );

    let outcome = make_controller(&rule_set, Arc::new(scan), options)
        .await
        .context("build controller stopped without reporting a result")?;

    match outcome {
        BuildMsg::Success => {
            println!("Build was a success.");
            Ok(())
        }
        BuildMsg::Failed(err) => Err(MakeError::Build(err).into()),
    }
}

fn rules_path(args: &CliArgs, settings: &ConfigFile) -> Result<PathBuf> {
    args.rules
        .clone()
        .or_else(|| settings.config.rules.clone())
        .ok_or_else(|| anyhow!("no rule file given (pass RULES or set [config].rules)"))
}

fn controller_options(args: &CliArgs, settings: &ConfigFile) -> ControllerOptions {
    match args.launchers.or(settings.config.launchers) {
        Some(launchers) => ControllerOptions { launchers },
        None => ControllerOptions::default(),
    }
}

/// Simple dry-run output: print targets with their dependencies, then leaves.
fn print_dry_run(rule_set: &RuleSet) {
    let graph = DepGraph::build(rule_set);

    println!("dagmake dry-run");
    println!();

    println!("targets ({}):", graph.targets().len());
    for target in graph.targets() {
        let deps = rule_set.dependencies_of(target).unwrap_or(&[]);
        println!("  - {target} <- {}", deps.join(" "));
        let dependents = graph.dependents_of(target);
        if !dependents.is_empty() {
            println!("      needed by: {}", dependents.join(" "));
        }
    }

    println!("leaves ({}):", graph.leaves().len());
    for leaf in graph.leaves() {
        println!("  - {leaf}");
    }

    debug!("dry-run complete (nothing built)");
}
