//! Configuration validation.

use std::fmt;

use crate::schema::Config;

/// Deadlines above this are probably a unit mix-up (ms vs s).
const LONG_DEADLINE_SECS: u64 = 1800;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_publish(config, &mut result);
        Self::validate_resolver(config, &mut result);
        Self::validate_tags(config, &mut result);

        result
    }

    fn require_positive(result: &mut ValidationResult, path: &str, value: u64) {
        if value == 0 {
            result.add_error(ValidationError::new(path, "must be greater than 0"));
        }
    }

    fn require_selector(result: &mut ValidationResult, path: &str, selector: &str) {
        if selector.trim().is_empty() {
            result.add_error(ValidationError::new(path, "selector cannot be empty"));
        }
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }
        Self::require_positive(result, "browser.call_timeout_secs", browser.call_timeout_secs);
        Self::require_positive(result, "browser.load_timeout_secs", browser.load_timeout_secs);

        if browser.headless && browser.profile_dir.is_none() {
            result.add_warning(ValidationWarning::new(
                "browser.headless",
                "headless mode with the default profile: log in once with `rednote browser` first",
            ));
        }

        if let Some(path) = &browser.chrome_path {
            if !path.exists() {
                result.add_error(ValidationError::new(
                    "browser.chrome_path",
                    format!("Chrome executable does not exist: {}", path.display()),
                ));
            }
        }
    }

    fn validate_publish(config: &Config, result: &mut ValidationResult) {
        let publish = &config.publish;

        if !publish.url.starts_with("http://") && !publish.url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "publish.url",
                "url must start with http:// or https://",
            ));
        }

        if publish.image_tab_label.trim().is_empty() {
            result.add_error(ValidationError::new(
                "publish.image_tab_label",
                "tab label cannot be empty",
            ));
        }

        Self::require_positive(result, "publish.deadline_secs", publish.deadline_secs);
        if publish.deadline_secs > LONG_DEADLINE_SECS {
            result.add_warning(ValidationWarning::new(
                "publish.deadline_secs",
                format!(
                    "deadline of {}s is very long (>{}s), \
                     a stuck page will hold the browser that long",
                    publish.deadline_secs, LONG_DEADLINE_SECS
                ),
            ));
        }

        let timeouts = &publish.timeouts;
        for (path, value) in [
            ("publish.timeouts.setup_ms", timeouts.setup_ms),
            ("publish.timeouts.upload_ms", timeouts.upload_ms),
            ("publish.timeouts.title_ms", timeouts.title_ms),
            ("publish.timeouts.content_ms", timeouts.content_ms),
            ("publish.timeouts.submit_ms", timeouts.submit_ms),
            ("publish.timeouts.poll_interval_ms", timeouts.poll_interval_ms),
        ] {
            Self::require_positive(result, path, value);
        }

        let selectors = &publish.selectors;
        for (path, selector) in [
            ("publish.selectors.upload_region", &selectors.upload_region),
            ("publish.selectors.creator_tab", &selectors.creator_tab),
            ("publish.selectors.upload_input", &selectors.upload_input),
            ("publish.selectors.title_input", &selectors.title_input),
            ("publish.selectors.submit_button", &selectors.submit_button),
        ] {
            Self::require_selector(result, path, selector);
        }
    }

    fn validate_resolver(config: &Config, result: &mut ValidationResult) {
        let resolver = &config.resolver;

        if resolver.strategies.is_empty() {
            result.add_error(ValidationError::new(
                "resolver.strategies",
                "at least one strategy is required",
            ));
        }

        let mut seen = resolver.strategies.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != resolver.strategies.len() {
            result.add_warning(ValidationWarning::new(
                "resolver.strategies",
                "duplicate strategies are raced twice",
            ));
        }

        if resolver.max_ascent == 0 {
            result.add_error(ValidationError::new(
                "resolver.max_ascent",
                "max_ascent must be at least 1",
            ));
        }

        Self::require_positive(
            result,
            "resolver.strategy_timeout_ms",
            resolver.strategy_timeout_ms,
        );
        Self::require_positive(result, "resolver.poll_interval_ms", resolver.poll_interval_ms);
        Self::require_selector(result, "resolver.editor_selector", &resolver.editor_selector);
        Self::require_selector(result, "resolver.paragraph_selector", &resolver.paragraph_selector);

        if resolver.placeholder_text.is_empty() {
            result.add_error(ValidationError::new(
                "resolver.placeholder_text",
                "placeholder text cannot be empty",
            ));
        }

        if resolver.strategy_timeout_ms > config.publish.timeouts.content_ms {
            result.add_warning(ValidationWarning::new(
                "resolver.strategy_timeout_ms",
                "longer than publish.timeouts.content_ms, which caps it",
            ));
        }
    }

    fn validate_tags(config: &Config, result: &mut ValidationResult) {
        if let Some(selector) = &config.tags.suggestion_selector {
            Self::require_selector(result, "tags.suggestion_selector", selector);
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
