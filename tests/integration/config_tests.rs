use dupesweep::config::Config;
use dupesweep::scanner::HashAlgorithm;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.io_threads, 1);
    assert_eq!(config.algorithm, HashAlgorithm::Blake3);
}

#[test]
fn test_config_load_from_env() {
    // A private prefix keeps this away from runs that read DUPESWEEP_*
    std::env::set_var("DSTEST_ENV_IO_THREADS", "16");
    std::env::set_var("DSTEST_ENV_ALGORITHM", "sha256");
    std::env::set_var("DSTEST_ENV_CONTINUE_ON_ERROR", "true");

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed("DSTEST_ENV_"));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.io_threads, 16);
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert!(config.continue_on_error);

    std::env::remove_var("DSTEST_ENV_IO_THREADS");
    std::env::remove_var("DSTEST_ENV_ALGORITHM");
    std::env::remove_var("DSTEST_ENV_CONTINUE_ON_ERROR");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
io_threads = 8
algorithm = "sha256"
skip_hidden = true
ignore_patterns = ["*.tmp", "node_modules/"]
permanent = true
continue_on_error = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));
    let config: Config = figment.extract().unwrap();

    assert_eq!(config.io_threads, 8);
    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert!(config.skip_hidden);
    assert_eq!(config.ignore_patterns, vec!["*.tmp", "node_modules/"]);
    assert!(config.permanent);
    assert!(config.continue_on_error);
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "skip_hidden = true\n").unwrap();

    let config = Config::try_load_from_path(&config_path).unwrap();

    assert!(config.skip_hidden);
    assert_eq!(config.io_threads, 1);
    assert!(!config.permanent);
}

#[test]
fn test_unknown_algorithm_falls_back_to_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "algorithm = \"md5\"\n").unwrap();

    assert!(Config::try_load_from_path(&config_path).is_err());
    assert_eq!(Config::load_from_path(&config_path), Config::default());
}

#[test]
fn test_written_config_is_loadable() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    let config = Config {
        algorithm: HashAlgorithm::Sha256,
        ignore_patterns: vec!["target/".to_string()],
        ..Config::default()
    };

    fs::write(&config_path, config.to_toml().unwrap()).unwrap();
    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(&config_path));

    assert_eq!(figment.extract::<Config>().unwrap(), config);
}
