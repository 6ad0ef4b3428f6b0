use crate::config::types::{ApiConfig, Config, CrawlConfig, OutputConfig, PartitionConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_api_config(&config.api)?;
    validate_partition_config(&config.partition)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates API configuration
fn validate_api_config(config: &ApiConfig) -> Result<(), ConfigError> {
    if config.endpoint.is_empty() {
        return Err(ConfigError::Validation(
            "api endpoint cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > 100 {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and 100, got {}",
            config.page_size
        )));
    }

    if config.token_env.is_empty() {
        return Err(ConfigError::Validation(
            "token-env cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates partition configuration
fn validate_partition_config(config: &PartitionConfig) -> Result<(), ConfigError> {
    if config.window_width == 0 {
        return Err(ConfigError::Validation(
            "window-width must be > 0".to_string(),
        ));
    }

    if config.max_stars <= config.min_stars {
        return Err(ConfigError::Validation(format!(
            "max-stars must be greater than min-stars, got {}..{}",
            config.min_stars, config.max_stars
        )));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.target_count == 0 {
        return Err(ConfigError::Validation(
            "target-count must be > 0".to_string(),
        ));
    }

    if config.max_page_attempts == 0 {
        return Err(ConfigError::Validation(
            "max-page-attempts must be > 0".to_string(),
        ));
    }

    if config.progress_interval == 0 {
        return Err(ConfigError::Validation(
            "progress-interval must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            api: ApiConfig {
                endpoint: "https://api.github.com/graphql".to_string(),
                page_size: 100,
                token_env: "GITHUB_TOKEN".to_string(),
            },
            partition: PartitionConfig {
                min_stars: 100,
                max_stars: 200000,
                window_width: 200,
            },
            crawl: CrawlConfig {
                target_count: 100000,
                max_page_attempts: 5,
                rate_limit_backoff_secs: 60,
                transport_backoff_secs: 30,
                batch_retry: true,
                progress_interval: 100,
            },
            output: OutputConfig {
                database_path: "./repos.db".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = base_config();
        config.api.page_size = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_oversized_page_size_rejected() {
        let mut config = base_config();
        config.api.page_size = 101;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_window_width_rejected() {
        let mut config = base_config();
        config.partition.window_width = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_inverted_star_range_rejected() {
        let mut config = base_config();
        config.partition.min_stars = 500;
        config.partition.max_stars = 500;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_target_rejected() {
        let mut config = base_config();
        config.crawl.target_count = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut config = base_config();
        config.crawl.max_page_attempts = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_database_path_rejected() {
        let mut config = base_config();
        config.output.database_path = String::new();
        assert!(validate(&config).is_err());
    }
}
