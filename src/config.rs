use std::{env, str::FromStr, sync::OnceLock, time::Duration};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

pub const FALLBACK_SECRET_KEY: &str = "local-dev-secret-fallback-value";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(String, String),
    #[error("App config error: {0}")]
    AppConfig(String),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub instagram: InstagramConfig,
    pub session: SessionConfig,
    pub preview: PreviewConfig,
    pub download: DownloadConfig,
}

impl AppConfig {
    pub fn set_global(config: AppConfig) -> Result<(), ConfigError> {
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::AppConfig("Failed to set global app config".to_string()))
    }

    pub fn get() -> Result<&'static AppConfig, ConfigError> {
        APP_CONFIG
            .get()
            .ok_or_else(|| ConfigError::AppConfig("App config not initialized".to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone, Debug)]
pub struct InstagramConfig {
    pub doc_id: String,
    pub app_id: String,
    pub graphql_url: String,
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for InstagramConfig {
    fn default() -> Self {
        Self {
            doc_id: "8845758582119845".to_string(),
            app_id: "936619743392459".to_string(),
            graphql_url: "https://www.instagram.com/graphql/query/".to_string(),
            api_url: "https://i.instagram.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub secret_key: String,
    pub ttl_secs: u64,
    /// Each entry holds a few lean records of a handful of URLs, well under 10 KB.
    pub cache_capacity: usize,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn uses_fallback_secret(&self) -> bool {
        self.secret_key == FALLBACK_SECRET_KEY
    }
}

#[derive(Clone, Debug)]
pub struct PreviewConfig {
    pub timeout_secs: u64,
    pub max_size: u32,
    /// Largest preview body accepted before decoding.
    pub max_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct DownloadConfig {
    pub timeout_secs: u64,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
        _ => Ok(default),
    }
}

pub fn build_config() -> Result<AppConfig, ConfigError> {
    info!("Building AppConfig...");

    let instagram_defaults = InstagramConfig::default();

    let config = AppConfig {
        server: ServerConfig {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 5001)?,
        },
        instagram: InstagramConfig {
            doc_id: env_or("INSTAGRAM_DOC_ID", &instagram_defaults.doc_id),
            app_id: env_or("INSTAGRAM_APP_ID", &instagram_defaults.app_id),
            graphql_url: env_or("INSTAGRAM_GRAPHQL_URL", &instagram_defaults.graphql_url),
            api_url: env_or("INSTAGRAM_API_URL", &instagram_defaults.api_url),
            timeout_secs: env_parse("SCRAPER_TIMEOUT_SECS", instagram_defaults.timeout_secs)?,
        },
        session: SessionConfig {
            secret_key: env_or("SECRET_KEY", FALLBACK_SECRET_KEY),
            ttl_secs: env_parse("SESSION_TTL_SECS", 3600)?,
            cache_capacity: env_parse("SESSION_CACHE_CAPACITY", 10_000)?,
        },
        preview: PreviewConfig {
            timeout_secs: env_parse("PREVIEW_TIMEOUT_SECS", 10)?,
            max_size: env_parse("PREVIEW_MAX_SIZE", 200)?,
            max_bytes: env_parse("PREVIEW_MAX_BYTES", 8 * 1024 * 1024)?,
        },
        download: DownloadConfig {
            timeout_secs: env_parse("RELAY_TIMEOUT_SECS", 60)?,
        },
    };

    info!("AppConfig built");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_env_parse_default_and_value() {
        assert_eq!(env_parse::<u16>("GRAMSNAP_TEST_UNSET_PORT", 5001).unwrap(), 5001);

        env::set_var("GRAMSNAP_TEST_PORT", " 8080 ");
        assert_eq!(env_parse::<u16>("GRAMSNAP_TEST_PORT", 5001).unwrap(), 8080);
    }

    #[test]
    fn test_env_parse_rejects_malformed_number() {
        env::set_var("GRAMSNAP_TEST_TTL", "an hour");
        let err = env_parse::<u64>("GRAMSNAP_TEST_TTL", 3600).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(key, value) if key == "GRAMSNAP_TEST_TTL" && value == "an hour"));
    }

    #[test]
    fn test_env_or_ignores_blank() {
        env::set_var("GRAMSNAP_TEST_SECRET", "   ");
        assert_eq!(env_or("GRAMSNAP_TEST_SECRET", FALLBACK_SECRET_KEY), FALLBACK_SECRET_KEY);
    }
}
