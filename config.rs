use crate::*;

pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_REQUEST_BODY_LIMIT: usize = 1_000_000;

/// Holds basic information about the app and its env-driven settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub name: &'static str,
    pub version: &'static str,
    pub port: u16,
    /// Passed into [`TodoInput`] on the main page
    pub is_public: bool,
    pub request_body_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            port: DEFAULT_PORT,
            is_public: false,
            request_body_limit: DEFAULT_REQUEST_BODY_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads `PORT`, `TODO_INPUT_PUBLIC` and `REQUEST_BODY_LIMIT`, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: parse_or(var("PORT"), defaults.port),
            is_public: var("TODO_INPUT_PUBLIC")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.is_public),
            request_body_limit: parse_or(var("REQUEST_BODY_LIMIT"), defaults.request_body_limit),
            ..defaults
        }
    }

    pub fn localhost(&self) -> String {
        format!(
            "http://localhost{}",
            if self.port == 80 {
                "".to_owned()
            } else {
                format!(":{}", self.port)
            }
        )
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

/// Loads variables from `.env` if there is one
pub fn check_dot_env() {
    if let Err(e) = dotenvy::dotenv() {
        info!(".env not used: {e}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_env() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.localhost(), "http://localhost");
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("TODO_INPUT_PUBLIC", "True"),
            ("REQUEST_BODY_LIMIT", "2048"),
        ]);
        assert_eq!(config.port, 8080);
        assert!(config.is_public);
        assert_eq!(config.request_body_limit, 2048);
        assert_eq!(config.localhost(), "http://localhost:8080");
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("TODO_INPUT_PUBLIC", "maybe")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(!config.is_public);
    }
}
