//! Tests for the assembly configuration system.

use std::sync::Mutex;

use assembly_core::config::{AssemblyConfig, ConfigOverrides};
use assembly_core::errors::ConfigError;
use assembly_core::{MiningTarget, PreferenceRule, RandomDensity, SupportThreshold, SurrogateMethod};

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all ASSEMBLY_ env vars to prevent cross-test contamination.
fn clear_assembly_env_vars() {
    for key in [
        "ASSEMBLY_MINING_TARGET",
        "ASSEMBLY_MINING_MIN_SUPPORT",
        "ASSEMBLY_MINING_MIN_SIZE",
        "ASSEMBLY_MINING_MAX_SIZE",
        "ASSEMBLY_SPECTRUM_SURROGATE",
        "ASSEMBLY_SPECTRUM_TRIALS",
        "ASSEMBLY_SPECTRUM_SEED",
        "ASSEMBLY_SPECTRUM_WORKERS",
        "ASSEMBLY_REDUCTION_RULE",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn test_layered_resolution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_assembly_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("assembly.toml"),
        r#"
[mining]
target = "maximal"
min_support = 4

[spectrum]
trials = 200

[reduction]
rule = "S"
"#,
    )
    .unwrap();

    // Env overrides the project file for trials.
    std::env::set_var("ASSEMBLY_SPECTRUM_TRIALS", "50");

    let overrides = ConfigOverrides {
        min_support: Some(7),
        ..Default::default()
    };

    let config = AssemblyConfig::load(dir.path(), Some(&overrides)).unwrap();

    assert_eq!(config.mining.effective_target(), MiningTarget::Maximal);
    assert_eq!(config.mining.effective_support(), SupportThreshold::Absolute(7));
    assert_eq!(config.spectrum.effective_trials(), 50);
    assert_eq!(config.reduction.effective_rule(), PreferenceRule::Cover1);

    clear_assembly_env_vars();
}

#[test]
fn test_load_missing_files_fallback() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_assembly_env_vars();

    let dir = tempdir();
    let config = AssemblyConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.mining.effective_target(), MiningTarget::Closed);
    assert_eq!(config.mining.effective_support(), SupportThreshold::Absolute(2));
    assert_eq!(config.mining.effective_min_size(), 2);
    assert_eq!(config.mining.effective_max_size(), usize::MAX);
    assert_eq!(config.spectrum.effective_surrogate(), SurrogateMethod::Swap);
    assert_eq!(config.spectrum.effective_surrogate_target(), MiningTarget::All);
    assert_eq!(config.spectrum.effective_trials(), 1000);
    assert_eq!(config.spectrum.effective_density(), RandomDensity::Uniform);
    assert_eq!(config.reduction.effective_rule(), PreferenceRule::Lenient1);
    assert!(!config.reduction.effective_synthesize());
}

#[test]
fn test_user_config_is_lowest_layer() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_assembly_env_vars();

    let home = tempdir();
    std::fs::create_dir_all(home.path().join(".assembly")).unwrap();
    std::fs::write(
        home.path().join(".assembly/config.toml"),
        "[mining]\nmin_size = 3\nmax_size = 9\n",
    )
    .unwrap();
    let project = tempdir();
    std::fs::write(project.path().join("assembly.toml"), "[mining]\nmax_size = 6\n").unwrap();

    let old_home = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());
    let config = AssemblyConfig::load(project.path(), None);
    match old_home {
        Some(h) => std::env::set_var("HOME", h),
        None => std::env::remove_var("HOME"),
    }

    let config = config.unwrap();
    assert_eq!(config.mining.min_size, Some(3));
    assert_eq!(config.mining.max_size, Some(6));
}

#[test]
fn test_env_unknown_identifier_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_assembly_env_vars();

    let dir = tempdir();
    std::env::set_var("ASSEMBLY_REDUCTION_RULE", "q");
    let result = AssemblyConfig::load(dir.path(), None);
    clear_assembly_env_vars();

    match result.unwrap_err() {
        ConfigError::InvalidValue { field, .. } => assert_eq!(field, "ASSEMBLY_REDUCTION_RULE"),
        other => panic!("Expected InvalidValue, got: {:?}", other),
    }
}

#[test]
fn test_env_codes_accepted() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_assembly_env_vars();

    let dir = tempdir();
    std::env::set_var("ASSEMBLY_MINING_TARGET", "m");
    std::env::set_var("ASSEMBLY_SPECTRUM_SURROGATE", "r");
    let config = AssemblyConfig::load(dir.path(), None).unwrap();
    clear_assembly_env_vars();

    assert_eq!(config.mining.effective_target(), MiningTarget::Maximal);
    assert_eq!(config.spectrum.effective_surrogate(), SurrogateMethod::Random);
}

#[test]
fn test_invalid_toml_syntax() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_assembly_env_vars();

    let dir = tempdir();
    std::fs::write(dir.path().join("assembly.toml"), "this is not valid toml {{{{").unwrap();

    match AssemblyConfig::load(dir.path(), None).unwrap_err() {
        ConfigError::ParseError { .. } => {}
        other => panic!("Expected ParseError, got: {:?}", other),
    }
}

#[test]
fn test_unknown_rule_in_toml_is_parse_error() {
    let result = AssemblyConfig::from_toml("[reduction]\nrule = \"bogus\"\n");
    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_zero_min_size_rejected() {
    let result = AssemblyConfig::from_toml("[mining]\nmin_size = 0\n");
    match result.unwrap_err() {
        ConfigError::ValidationFailed { field, .. } => assert_eq!(field, "mining.min_size"),
        other => panic!("Expected ValidationFailed, got: {:?}", other),
    }
}

#[test]
fn test_max_below_min_rejected() {
    let result = AssemblyConfig::from_toml("[mining]\nmin_size = 4\nmax_size = 3\n");
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_non_positive_sigma_rejected() {
    let result = AssemblyConfig::from_toml("[spectrum]\nsigma = 0.0\n");
    assert!(matches!(result, Err(ConfigError::ValidationFailed { .. })));
}

#[test]
fn test_percent_support_takes_precedence() {
    let config =
        AssemblyConfig::from_toml("[mining]\nmin_support = 9\nmin_support_percent = 12.5\n")
            .unwrap();
    assert_eq!(config.mining.effective_support(), SupportThreshold::Percent(12.5));
    assert_eq!(config.mining.effective_support().resolve(40), 5);
}

#[test]
fn test_identity_surrogate_runs_one_trial() {
    let config =
        AssemblyConfig::from_toml("[spectrum]\nsurrogate = \"identity\"\ntrials = 500\n").unwrap();
    assert_eq!(config.spectrum.effective_trials(), 1);

    let skipped =
        AssemblyConfig::from_toml("[spectrum]\nsurrogate = \"identity\"\ntrials = 0\n").unwrap();
    assert_eq!(skipped.spectrum.effective_trials(), 0);
}

#[test]
fn test_toml_round_trip() {
    let config = AssemblyConfig::from_toml(
        "[mining]\ntarget = \"closed\"\nmin_size = 3\n[reduction]\nrule = \"strict0\"\n",
    )
    .unwrap();
    let text = config.to_toml().unwrap();
    let again = AssemblyConfig::from_toml(&text).unwrap();
    assert_eq!(again.mining.min_size, Some(3));
    assert_eq!(again.reduction.effective_rule(), PreferenceRule::Strict0);
}
