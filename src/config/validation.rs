use crate::config::types::{BrowserConfig, Config, CrawlConfig, OutputConfig, SelectorConfig};
use crate::ConfigError;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_browser_config(&config.browser)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates browser timing configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("launch-timeout-ms", config.launch_timeout_ms),
        ("navigation-timeout-ms", config.navigation_timeout_ms),
        ("selector-timeout-ms", config.selector_timeout_ms),
        ("next-page-timeout-ms", config.next_page_timeout_ms),
    ] {
        if value == 0 {
            return Err(ConfigError::Validation(format!(
                "{} must be greater than 0",
                name
            )));
        }
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl budget, delays and URL patterns
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_items < 1 {
        return Err(ConfigError::Validation(format!(
            "max-items must be >= 1, got {}",
            config.max_items
        )));
    }

    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min-delay-ms ({}) must not exceed max-delay-ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    for (name, prefixes) in [
        ("link-denylist", &config.link_denylist),
        ("product-url-prefixes", &config.product_url_prefixes),
        ("listing-url-prefixes", &config.listing_url_prefixes),
    ] {
        if prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} cannot contain empty entries",
                name
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "csv-dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that every selector is a non-empty, parsable CSS selector
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in config.entries() {
        validate_selector(name, selector)?;
    }

    // The scoped review selectors are built by concatenation
    validate_selector("review-rating", &config.scoped_review_rating())?;
    validate_selector("review-count", &config.scoped_review_count())?;

    Ok(())
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    if selector.trim().is_empty() {
        return Err(ConfigError::InvalidSelector {
            name: name.to_string(),
            reason: "selector cannot be empty".to_string(),
        });
    }

    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        name: name.to_string(),
        reason: format!("{:?}", e),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.browser.selector_timeout_ms = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_max_items_rejected() {
        let mut config = Config::default();
        config.crawl.max_items = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_delay_bounds() {
        let mut config = Config::default();
        config.crawl.min_delay_ms = 0;
        config.crawl.max_delay_ms = 0;
        assert!(validate(&config).is_ok());

        config.crawl.min_delay_ms = 10;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let mut config = Config::default();
        config.crawl.link_denylist.push(" ".to_string());
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_selector_rejected() {
        let mut config = Config::default();
        config.selectors.title = String::new();
        match validate(&config) {
            Err(ConfigError::InvalidSelector { name, .. }) => assert_eq!(name, "title"),
            other => panic!("expected InvalidSelector, got {:?}", other),
        }
    }

    #[test]
    fn test_unparsable_selector_rejected() {
        let mut config = Config::default();
        config.selectors.images = "div[[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_empty_csv_dir_rejected() {
        let mut config = Config::default();
        config.output.csv_dir = "".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }
}
