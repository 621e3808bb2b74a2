use std::path::PathBuf;

use rednote_core::Strategy;

use super::*;

fn has_error(result: &ValidationResult, path: &str) -> bool {
    result.errors.iter().any(|e| e.path == path)
}

fn has_warning(result: &ValidationResult, path: &str) -> bool {
    result.warnings.iter().any(|w| w.path == path)
}

#[test]
fn test_validate_default_config() {
    let result = ConfigValidator::validate(&Config::default());
    assert!(result.is_valid(), "{:?}", result.errors);
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn test_validate_invalid_port() {
    let mut config = Config::default();
    config.browser.debug_port = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(has_error(&result, "browser.debug_port"));
}

#[test]
fn test_zero_step_timeout() {
    let mut config = Config::default();
    config.publish.timeouts.upload_ms = 0;

    let result = ConfigValidator::validate(&config);
    assert!(has_error(&result, "publish.timeouts.upload_ms"));
    assert_eq!(
        result.errors[0].to_string(),
        "publish.timeouts.upload_ms: must be greater than 0"
    );
}

#[test]
fn test_zero_deadline() {
    let mut config = Config::default();
    config.publish.deadline_secs = 0;

    assert!(has_error(
        &ConfigValidator::validate(&config),
        "publish.deadline_secs"
    ));
}

#[test]
fn test_long_deadline_warning() {
    let mut config = Config::default();
    config.publish.deadline_secs = 7200;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(has_warning(&result, "publish.deadline_secs"));
}

#[test]
fn test_empty_selector() {
    let mut config = Config::default();
    config.publish.selectors.submit_button = "  ".to_string();
    config.resolver.editor_selector = String::new();

    let result = ConfigValidator::validate(&config);
    assert!(has_error(&result, "publish.selectors.submit_button"));
    assert!(has_error(&result, "resolver.editor_selector"));
}

#[test]
fn test_invalid_url() {
    let mut config = Config::default();
    config.publish.url = "creator.xiaohongshu.com/publish".to_string();

    assert!(has_error(&ConfigValidator::validate(&config), "publish.url"));
}

#[test]
fn test_zero_ascent() {
    let mut config = Config::default();
    config.resolver.max_ascent = 0;

    assert!(has_error(
        &ConfigValidator::validate(&config),
        "resolver.max_ascent"
    ));
}

#[test]
fn test_no_strategies() {
    let mut config = Config::default();
    config.resolver.strategies.clear();

    assert!(has_error(
        &ConfigValidator::validate(&config),
        "resolver.strategies"
    ));
}

#[test]
fn test_duplicate_strategies_warning() {
    let mut config = Config::default();
    config.resolver.strategies = vec![Strategy::DirectSelector, Strategy::DirectSelector];

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(has_warning(&result, "resolver.strategies"));
}

#[test]
fn test_strategy_timeout_capped_warning() {
    let mut config = Config::default();
    config.resolver.strategy_timeout_ms = 120_000;

    assert!(has_warning(
        &ConfigValidator::validate(&config),
        "resolver.strategy_timeout_ms"
    ));
}

#[test]
fn test_headless_without_profile_warning() {
    let mut config = Config::default();
    config.browser.headless = true;

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(has_warning(&result, "browser.headless"));

    config.browser.profile_dir = Some(PathBuf::from("/tmp/profile"));
    assert!(!has_warning(
        &ConfigValidator::validate(&config),
        "browser.headless"
    ));
}

#[test]
fn test_missing_chrome_path() {
    let mut config = Config::default();
    config.browser.chrome_path = Some(PathBuf::from("/nonexistent/chrome"));

    assert!(has_error(
        &ConfigValidator::validate(&config),
        "browser.chrome_path"
    ));
}

#[test]
fn test_empty_suggestion_selector() {
    let mut config = Config::default();
    config.tags.suggestion_selector = Some(String::new());

    assert!(has_error(
        &ConfigValidator::validate(&config),
        "tags.suggestion_selector"
    ));
}
