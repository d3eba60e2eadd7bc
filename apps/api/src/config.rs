use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Largest accepted request body, multipart uploads included.
    pub max_upload_bytes: usize,
    /// Allowed browser origin. `None` means permissive CORS.
    pub cors_allow_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            cors_allow_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        Ok(Config {
            port: optional_parse(&lookup, "PORT")?.unwrap_or(defaults.port),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            max_upload_bytes: optional_parse(&lookup, "MAX_UPLOAD_BYTES")?
                .unwrap_or(defaults.max_upload_bytes),
            cors_allow_origin: lookup("CORS_ALLOW_ORIGIN")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && v != "*"),
        })
    }
}

fn optional_parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.cors_allow_origin.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "3000"),
            ("RUST_LOG", "atsify_api=debug"),
            ("MAX_UPLOAD_BYTES", "2048"),
            ("CORS_ALLOW_ORIGIN", "https://atsify.app"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.rust_log, "atsify_api=debug");
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.cors_allow_origin.as_deref(), Some("https://atsify.app"));
    }

    #[test]
    fn test_wildcard_origin_is_permissive() {
        let config = Config::from_lookup(lookup(&[("CORS_ALLOW_ORIGIN", "*")])).unwrap();
        assert!(config.cors_allow_origin.is_none());
    }

    #[test]
    fn test_invalid_port_names_variable() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
