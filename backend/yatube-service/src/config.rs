/// Configuration management for the Yatube service
///
/// Every setting is read from the environment (a `.env` file is loaded by the
/// binary first) and falls back to a development default.
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Secret shipped for local development only; refused in production.
pub const DEV_SESSION_SECRET: &str = "yatube-dev-session-secret-change-me";

/// URL prefix uploaded media is served under.
pub const MEDIA_URL: &str = "/media/";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Session cookie configuration
    pub session: SessionConfig,
    /// Uploaded media configuration
    pub media: MediaConfig,
    /// Page cache configuration
    pub cache: CacheConfig,
    /// Listing configuration
    pub pagination: PaginationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Number of HTTP workers
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://yatube.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens
    pub secret: String,
    pub ttl_hours: i64,
    /// Mark the cookie `Secure` (HTTPS only)
    pub cookie_secure: bool,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_hours", &self.ttl_hours)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded images are written to
    pub root: PathBuf,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of a cached index page; 0 keeps entries until cleared
    pub page_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub posts_per_page: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let config = Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("YATUBE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("YATUBE_PORT", 8000)?,
                workers: parse_env_or_default("YATUBE_WORKERS", 4)?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://yatube.db".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 5)?,
            },
            session: {
                let secret = match std::env::var("SESSION_SECRET") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("SESSION_SECRET must be set in production".to_string())
                    }
                    Err(_) => DEV_SESSION_SECRET.to_string(),
                };
                if production && (secret == DEV_SESSION_SECRET || secret.len() < 32) {
                    return Err(
                        "SESSION_SECRET must be a non-default value of at least 32 bytes in production"
                            .to_string(),
                    );
                }

                SessionConfig {
                    secret,
                    ttl_hours: parse_env_or_default("SESSION_TTL_HOURS", 336)?,
                    cookie_secure: parse_env_or_default("SESSION_COOKIE_SECURE", production)?,
                }
            },
            media: MediaConfig {
                root: std::env::var("MEDIA_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("media")),
                max_upload_bytes: parse_env_or_default("MEDIA_MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            },
            cache: CacheConfig {
                page_ttl_secs: parse_env_or_default("PAGE_CACHE_TTL_SECS", 20)?,
            },
            pagination: PaginationConfig {
                posts_per_page: parse_env_or_default("POSTS_PER_PAGE", 10)?,
            },
        };

        if config.pagination.posts_per_page == 0 {
            return Err("POSTS_PER_PAGE must be greater than zero".to_string());
        }

        Ok(config)
    }

    /// Configuration for tests and local tooling: in-memory database,
    /// development secret, the given media root.
    pub fn for_tests(media_root: impl Into<PathBuf>) -> Self {
        Config {
            app: AppConfig {
                env: "test".to_string(),
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: 1,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            session: SessionConfig {
                secret: DEV_SESSION_SECRET.to_string(),
                ttl_hours: 1,
                cookie_secure: false,
            },
            media: MediaConfig {
                root: media_root.into(),
                max_upload_bytes: 5 * 1024 * 1024,
            },
            cache: CacheConfig { page_ttl_secs: 0 },
            pagination: PaginationConfig { posts_per_page: 10 },
        }
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_env_or_default_falls_back_when_unset() {
        let value: u16 = parse_env_or_default("YATUBE_TEST_SURELY_UNSET_PORT", 8123).unwrap();
        assert_eq!(value, 8123);
    }

    #[test]
    fn parse_env_or_default_reports_bad_values() {
        std::env::set_var("YATUBE_TEST_BAD_NUMBER", "ten");
        let err = parse_env_or_default::<usize>("YATUBE_TEST_BAD_NUMBER", 10).unwrap_err();
        assert!(err.contains("YATUBE_TEST_BAD_NUMBER"));
        std::env::remove_var("YATUBE_TEST_BAD_NUMBER");
    }

    #[test]
    fn test_config_uses_memory_database() {
        let config = Config::for_tests("/tmp/media");
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.pagination.posts_per_page, 10);
        assert!(!config.is_production());
    }

    #[test]
    fn session_debug_redacts_secret() {
        let config = Config::for_tests("/tmp/media");
        let rendered = format!("{:?}", config.session);
        assert!(!rendered.contains(DEV_SESSION_SECRET));
        assert!(rendered.contains("REDACTED"));
    }
}
