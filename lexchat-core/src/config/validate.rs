//! Configuration validation rules.

use super::schema::Config;
use url::Url;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate configuration and return aggregated validation errors.
pub fn validate_config(config: &Config) -> crate::Result<()> {
    let mut errors = Vec::new();

    if !is_http_url(&config.service.base_url) {
        errors.push("service.base_url must be an http(s) URL".to_string());
    }
    if config.service.request_timeout_secs == Some(0) {
        errors.push("service.request_timeout_secs must be > 0 when set".to_string());
    }

    if !is_http_url(&config.drafter.base_url) {
        errors.push("drafter.base_url must be an http(s) URL".to_string());
    }
    if config.drafter.default_template.trim().is_empty() {
        errors.push("drafter.default_template must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_ascii_lowercase().as_str()) {
        errors.push(format!(
            "logging.level must be one of {}",
            LOG_LEVELS.join(", ")
        ));
    }
    if !matches!(
        config.logging.format.to_ascii_lowercase().as_str(),
        "text" | "json"
    ) {
        errors.push("logging.format must be text or json".to_string());
    }
    if config.logging.dir.trim().is_empty() {
        errors.push("logging.dir must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(crate::Error::Config(errors.join("; ")))
    }
}

fn is_http_url(raw: &str) -> bool {
    let Ok(parsed) = Url::parse(raw.trim()) else {
        return false;
    };
    matches!(parsed.scheme(), "http" | "https")
        && parsed.host_str().is_some_and(|host| !host.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_errors_are_aggregated() {
        let mut config = Config::default();
        config.service.base_url = "localhost:8000".to_string();
        config.logging.format = "yaml".to_string();

        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("service.base_url"));
        assert!(err.contains("logging.format"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.service.request_timeout_secs = Some(0);
        assert!(validate_config(&config).is_err());

        config.service.request_timeout_secs = Some(30);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://localhost:8000"));
        assert!(is_http_url("https://api.example.com"));
        assert!(!is_http_url("https://"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("http://exa mple"));
        assert!(!is_http_url("http://:80"));
        assert!(!is_http_url("localhost:8000"));
    }
}
