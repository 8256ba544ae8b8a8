use clap::Parser;
use dupesweep::cli::Cli;
use dupesweep::error::ExitCode;
use dupesweep::run_app;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A scan root plus an empty config file, so runs don't read the user's config.
struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        let config = dir.path().join("dupesweep.toml");
        fs::write(&config, "").unwrap();
        Self { dir, config }
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    fn write(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, command: &str, extra: &[&str]) -> anyhow::Result<ExitCode> {
        let root = self.root();
        let mut argv: Vec<&str> = vec![
            "dupesweep",
            "--quiet",
            "--no-color",
            "--config",
            self.config.to_str().unwrap(),
            command,
            root.to_str().unwrap(),
        ];
        argv.extend_from_slice(extra);
        run_app(Cli::try_parse_from(argv).unwrap())
    }
}

#[test]
fn test_find_reports_duplicates() {
    let fx = Fixture::new();
    fx.write("a.txt", b"same");
    fx.write("b.txt", b"same");

    let code = fx.run("find", &["--output", "json"]).unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_find_without_duplicates() {
    let fx = Fixture::new();
    fx.write("a.txt", b"one");
    fx.write("b.txt", b"two");

    assert_eq!(fx.run("find", &[]).unwrap(), ExitCode::NoDuplicates);
    assert_eq!(
        fx.run("find", &["--output", "csv"]).unwrap(),
        ExitCode::NoDuplicates
    );
}

#[test]
fn test_find_missing_directory_is_error() {
    let fx = Fixture::new();
    fs::remove_dir(fx.root()).unwrap();

    let err = fx.run("find", &[]).unwrap_err();

    assert!(format!("{err:#}").contains("Path not found"));
}

#[test]
fn test_clean_dry_run_deletes_nothing() {
    let fx = Fixture::new();
    let a = fx.write("a.txt", b"same");
    let b = fx.write("b.txt", b"same");

    let code = fx
        .run("clean", &["--dry-run", "--permanent", "--output", "json"])
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(a.exists());
    assert!(b.exists());
}

#[test]
fn test_clean_permanent_with_yes() {
    let fx = Fixture::new();
    let a = fx.write("a.txt", b"same");
    let b = fx.write("b.txt", b"same");
    let c = fx.write("c.txt", b"other");

    let code = fx
        .run("clean", &["--permanent", "--yes", "--output", "csv"])
        .unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(a.exists());
    assert!(!b.exists());
    assert!(c.exists());
}

#[test]
fn test_clean_without_duplicates() {
    let fx = Fixture::new();
    fx.write("only.txt", b"single");

    let code = fx.run("clean", &["--permanent", "--yes"]).unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_permanent_from_config_file() {
    let fx = Fixture::new();
    fs::write(&fx.config, "permanent = true\n").unwrap();
    let a = fx.write("a.txt", b"same");
    let b = fx.write("b.txt", b"same");

    let code = fx.run("clean", &["--yes", "--output", "json"]).unwrap();

    assert_eq!(code, ExitCode::Success);
    assert!(a.exists());
    assert!(!b.exists());
}

#[test]
fn test_missing_config_file_is_error() {
    let fx = Fixture::new();
    fs::remove_file(&fx.config).unwrap();

    let err = fx.run("find", &[]).unwrap_err();

    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_malformed_config_file_is_error() {
    let fx = Fixture::new();
    fs::write(&fx.config, "io_threads = [").unwrap();

    assert!(fx.run("find", &[]).is_err());
}
