#![allow(dead_code)]

use std::sync::Arc;

use dagmake::engine::{make_controller, BuildMsg, ControllerOptions};
use dagmake::rules::RuleSet;
use dagmake_test_utils::fake_scan::FakeScan;
use dagmake_test_utils::{init_tracing, with_timeout};

/// Run one build with default options and wait (bounded) for its outcome.
pub async fn run_build(rules: &RuleSet, scan: &FakeScan) -> BuildMsg {
    run_build_with(rules, scan, ControllerOptions::default()).await
}

pub async fn run_build_with(
    rules: &RuleSet,
    scan: &FakeScan,
    options: ControllerOptions,
) -> BuildMsg {
    init_tracing();
    let rx = make_controller(rules, Arc::new(scan.clone()), options);
    with_timeout(rx)
        .await
        .expect("controller dropped its result channel")
}

/// Assert `before` finished building before `after`.
pub fn assert_built_before(scan: &FakeScan, before: &str, after: &str) {
    let b = scan
        .build_position(before)
        .unwrap_or_else(|| panic!("{before} was not built"));
    let a = scan
        .build_position(after)
        .unwrap_or_else(|| panic!("{after} was not built"));
    assert!(
        b < a,
        "{before} must be built before {after}; order: {:?}",
        scan.builds()
    );
}
