use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig, OutputFormat};
use crate::ConfigError;

/// Largest accepted worker pool
pub const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    for ext in &config.excluded_extensions {
        validate_extension(ext)?;
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    if config.frontier_capacity == Some(0) {
        return Err(ConfigError::Validation(
            "frontier-capacity must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates an excluded extension such as `.pdf` or `pdf`
fn validate_extension(ext: &str) -> Result<(), ConfigError> {
    let bare = ext.strip_prefix('.').unwrap_or(ext);

    if bare.is_empty() {
        return Err(ConfigError::Validation(format!(
            "excluded extension cannot be empty, got '{}'",
            ext
        )));
    }

    if bare.chars().any(char::is_whitespace) {
        return Err(ConfigError::Validation(format!(
            "excluded extension cannot contain whitespace, got '{}'",
            ext
        )));
    }

    Ok(())
}

/// Validates HTTP configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
///
/// Only the path used by the selected format is checked.
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    match config.format {
        OutputFormat::Sqlite if config.database_path.trim().is_empty() => Err(
            ConfigError::Validation("database-path cannot be empty".to_string()),
        ),
        OutputFormat::Markdown if config.summary_path.trim().is_empty() => Err(
            ConfigError::Validation("summary-path cannot be empty".to_string()),
        ),
        _ => Ok(()),
    }
}
