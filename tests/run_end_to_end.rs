// tests/run_end_to_end.rs

use std::fs;
use std::path::Path;

use clap::Parser;
use dagmake::cli::CliArgs;
use dagmake::config;
use dagmake::errors::MakeError;
use dagmake_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn args(parts: &[&str]) -> CliArgs {
    let mut argv = vec!["dagmake"];
    argv.extend_from_slice(parts);
    CliArgs::try_parse_from(argv).expect("valid test arguments")
}

fn path_str(p: &Path) -> &str {
    p.to_str().expect("temp paths are UTF-8")
}

#[tokio::test]
async fn builds_a_rule_file_into_a_directory() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("out");
    fs::create_dir(&out)?;
    let rules = dir.path().join("Rules");
    fs::write(&rules, "app <- main.o util.o;\nmain.o <- main.c;\nutil.o <- util.c;\n")?;
    let settings = dir.path().join("absent.toml");

    dagmake::run(args(&[
        path_str(&rules),
        "-d",
        path_str(&out),
        "--config",
        path_str(&settings),
        "--launchers",
        "2",
    ]))
    .await?;

    for f in ["app", "main.o", "util.o", "main.c", "util.c"] {
        assert_eq!(fs::read_to_string(out.join(f))?, "0 times built.\n", "{f}");
    }
    Ok(())
}

#[tokio::test]
async fn settings_file_supplies_rules_and_directory() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let rules = dir.path().join("Rules");
    fs::write(&rules, "t <- s;")?;
    let settings = dir.path().join("Dagmake.toml");
    fs::write(
        &settings,
        format!(
            "[config]\nrules = {:?}\ndirectory = {:?}\nlaunchers = 1\n",
            path_str(&rules),
            path_str(dir.path())
        ),
    )?;

    dagmake::run(args(&["--config", path_str(&settings)])).await?;

    assert_eq!(fs::read_to_string(dir.path().join("t"))?, "0 times built.\n");
    assert_eq!(fs::read_to_string(dir.path().join("s"))?, "0 times built.\n");
    Ok(())
}

#[tokio::test]
async fn dry_run_builds_nothing() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let rules = dir.path().join("Rules");
    fs::write(&rules, "t <- s;")?;

    dagmake::run(args(&[
        path_str(&rules),
        "-d",
        path_str(dir.path()),
        "--config",
        path_str(&dir.path().join("absent.toml")),
        "--dry-run",
    ]))
    .await?;

    assert!(!dir.path().join("t").exists());
    assert!(!dir.path().join("s").exists());
    Ok(())
}

#[tokio::test]
async fn cyclic_rule_file_fails_before_touching_the_directory() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let rules = dir.path().join("Rules");
    fs::write(&rules, "a <- b; b <- a;")?;

    let err = dagmake::run(args(&[
        path_str(&rules),
        "-d",
        path_str(dir.path()),
        "--config",
        path_str(&dir.path().join("absent.toml")),
    ]))
    .await
    .expect_err("cycle is rejected");

    assert!(
        matches!(err.downcast_ref::<MakeError>(), Some(MakeError::DependencyCycle(_))),
        "{err:#}"
    );
    assert!(!dir.path().join("a").exists());
    Ok(())
}

#[tokio::test]
async fn build_directory_must_exist() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let rules = dir.path().join("Rules");
    fs::write(&rules, "t <- s;")?;

    let err = dagmake::run(args(&[
        path_str(&rules),
        "-d",
        path_str(&dir.path().join("nowhere")),
        "--config",
        path_str(&dir.path().join("absent.toml")),
    ]))
    .await
    .expect_err("directory is missing");

    assert!(
        matches!(err.downcast_ref::<MakeError>(), Some(MakeError::InvalidDir(_))),
        "{err:#}"
    );
    Ok(())
}

#[test]
fn settings_file_rejects_zero_launchers_and_unknown_keys() -> TestResult {
    let dir = tempfile::tempdir()?;

    let zero = dir.path().join("zero.toml");
    fs::write(&zero, "[config]\nlaunchers = 0\n")?;
    let err = config::load_and_validate(&zero).expect_err("zero launchers");
    assert!(matches!(err, MakeError::Config(_)), "{err}");

    let unknown = dir.path().join("unknown.toml");
    fs::write(&unknown, "[config]\njobs = 4\n")?;
    let err = config::load_and_validate(&unknown).expect_err("unknown key");
    assert!(matches!(err, MakeError::Toml(_)), "{err}");

    let absent = config::load_optional(dir.path().join("absent.toml"))?;
    assert_eq!(absent, config::ConfigFile::default());
    Ok(())
}
