// tests/build_failures.rs

mod common;
use crate::common::{run_build, run_build_with};

use std::time::Duration;

use dagmake::engine::{BuildMsg, ControllerOptions};
use dagmake::errors::MakeError;
use dagmake_test_utils::builders::RuleSetBuilder;
use dagmake_test_utils::day;
use dagmake_test_utils::fake_scan::FakeScan;

fn diamond() -> dagmake::rules::RuleSet {
    RuleSetBuilder::from_text(
        r#"
r  <- d1 d2;
d1 <- d3;
d2 <- d3 d4;
"#,
    )
    .build()
}

#[tokio::test]
async fn failing_branch_stops_its_dependents_but_not_siblings() {
    // The delay lets d2's branch finish before d1 reports its failure.
    let scan = FakeScan::new()
        .failing("d1")
        .slow("d1", Duration::from_millis(200));

    let msg = run_build(&diamond(), &scan).await;

    let BuildMsg::Failed(err) = msg else {
        panic!("expected a failed build, got {msg:?}");
    };
    assert_eq!(err.filename, "d1");
    assert!(err.to_string().contains("d1"), "message: {err}");

    assert_eq!(scan.build_count("d2"), 1);
    assert_eq!(scan.build_count("d3"), 1);
    assert_eq!(scan.build_count("d4"), 1);
    assert!(
        !scan.attempts().contains(&"r".to_string()),
        "r must never be built: {:?}",
        scan.attempts()
    );
}

#[tokio::test]
async fn failing_leaf_is_reported() {
    let rules = RuleSetBuilder::new().rule("out", &["src"]).build();
    let scan = FakeScan::new().failing("src");

    let err = run_build(&rules, &scan)
        .await
        .into_result()
        .expect_err("a missing leaf that cannot be built fails the run");

    assert_eq!(err.filename, "src");
    assert!(scan.builds().is_empty());
    assert_eq!(scan.attempts(), vec!["src"]);
}

#[tokio::test]
async fn independent_failures_report_one_of_them() {
    let rules = RuleSetBuilder::new()
        .rule("a", &["x"])
        .rule("b", &["y"])
        .build();
    let scan = FakeScan::new().failing("x").failing("y");

    let msg = run_build(&rules, &scan).await;

    let BuildMsg::Failed(err) = msg else {
        panic!("expected a failed build, got {msg:?}");
    };
    assert!(
        err.filename == "x" || err.filename == "y",
        "unexpected failing file {}",
        err.filename
    );
    let attempts = scan.attempts();
    assert!(!attempts.contains(&"a".to_string()));
    assert!(!attempts.contains(&"b".to_string()));
}

#[tokio::test]
async fn many_failures_in_a_wide_graph_still_resolve() {
    let parts: Vec<String> = (0..32).map(|i| format!("part{i}")).collect();
    let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
    let rules = RuleSetBuilder::new().rule("bundle", &part_refs).build();

    let mut scan = FakeScan::new();
    for (i, part) in parts.iter().enumerate() {
        scan = if i % 2 == 0 {
            scan.failing(part)
        } else {
            scan.existing(part, day(1))
        };
    }

    for launchers in [1, 4] {
        let msg = run_build_with(&rules, &scan, ControllerOptions { launchers }).await;

        let BuildMsg::Failed(err) = msg else {
            panic!("expected a failed build, got {msg:?}");
        };
        let index: usize = err
            .filename
            .trim_start_matches("part")
            .parse()
            .expect("error names one of the parts");
        assert_eq!(index % 2, 0, "only even parts fail");
    }
    assert_eq!(scan.build_count("bundle"), 0);
}

#[tokio::test]
async fn failure_deep_in_a_chain_cancels_everything_above() {
    let rules = RuleSetBuilder::from_text("c <- b; b <- a; a <- src;").build();
    let scan = FakeScan::new().existing("src", day(3)).failing("a");

    let msg = run_build(&rules, &scan).await;

    assert!(matches!(&msg, BuildMsg::Failed(e) if e.filename == "a"), "{msg:?}");
    assert_eq!(scan.attempts(), vec!["a"]);
}

#[tokio::test]
async fn build_error_converts_into_a_make_error() {
    let rules = RuleSetBuilder::new().rule("t", &["s"]).build();
    let scan = FakeScan::new().failing("s");

    let err: MakeError = run_build(&rules, &scan)
        .await
        .into_result()
        .expect_err("build fails")
        .into();

    assert!(matches!(&err, MakeError::Build(b) if b.filename == "s"));
    assert!(err.to_string().contains("'s'"), "message: {err}");
}
