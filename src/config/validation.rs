use crate::config::types::{Config, FetchConfig, LocatorConfig, PanelConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_locator_config(&config.locator)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_panel_config(&config.panel)?;
    Ok(())
}

fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.probe_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "probe-timeout-ms must be greater than 0".to_string(),
        ));
    }

    if config.max_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-bytes must be >= 1".to_string(),
        ));
    }

    if !config.body_slack.is_finite() || config.body_slack < 1.0 {
        return Err(ConfigError::Validation(format!(
            "body-slack must be >= 1.0, got {}",
            config.body_slack
        )));
    }

    Ok(())
}

fn validate_locator_config(config: &LocatorConfig) -> Result<(), ConfigError> {
    if config.scheme != "http" && config.scheme != "https" {
        return Err(ConfigError::Validation(format!(
            "scheme must be 'http' or 'https', got '{}'",
            config.scheme
        )));
    }

    if config.paths.is_empty() {
        return Err(ConfigError::Validation(
            "locator needs at least one candidate path".to_string(),
        ));
    }

    for path in &config.paths {
        validate_candidate_path(path)?;
    }

    Ok(())
}

/// Candidate paths are relative to the host root: no leading slash, no scheme
fn validate_candidate_path(path: &str) -> Result<(), ConfigError> {
    if path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "candidate path cannot be empty".to_string(),
        ));
    }

    if path.starts_with('/') || path.contains("://") {
        return Err(ConfigError::Validation(format!(
            "candidate path '{}' must be relative to the host root (e.g. 'sitemap.xml')",
            path
        )));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    Ok(())
}

fn validate_panel_config(config: &PanelConfig) -> Result<(), ConfigError> {
    if config.preview_limit == 0 {
        return Err(ConfigError::Validation(
            "preview-limit must be >= 1".to_string(),
        ));
    }
    Ok(())
}
