use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::listings::{ConfigurationError, CurrencyCode, OFFSET_DISTANCE};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub listings: ListingsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = environment == AppEnvironment::Development;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            listings: ListingsConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Defaults for the listing surfaces.
#[derive(Debug, Clone)]
pub struct ListingsConfig {
    /// Directory holding the CSV inventory exports.
    pub data_dir: PathBuf,
    pub page_size: NonZeroUsize,
    /// Diagonal marker step in degrees.
    pub marker_offset: f64,
    /// Display currency a new session starts with.
    pub display_currency: CurrencyCode,
}

const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(6) {
    Some(size) => size,
    None => panic!("default page size must be non-zero"),
};

impl Default for ListingsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            page_size: DEFAULT_PAGE_SIZE,
            marker_offset: OFFSET_DISTANCE,
            display_currency: CurrencyCode::CANONICAL,
        }
    }
}

impl ListingsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(dir) = env::var("LISTINGS_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(raw) = env::var("LISTINGS_PAGE_SIZE") {
            config.page_size = raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| ConfigError::InvalidPageSize)?;
        }

        if let Ok(raw) = env::var("LISTINGS_MARKER_OFFSET") {
            config.marker_offset = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|offset| offset.is_finite() && *offset > 0.0)
                .ok_or(ConfigError::InvalidMarkerOffset)?;
        }

        if let Ok(raw) = env::var("LISTINGS_DISPLAY_CURRENCY") {
            config.display_currency = raw
                .parse()
                .map_err(|source| ConfigError::InvalidCurrency { source })?;
        }

        Ok(config)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPageSize,
    InvalidMarkerOffset,
    InvalidCurrency { source: ConfigurationError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "LISTINGS_PAGE_SIZE must be a positive integer")
            }
            ConfigError::InvalidMarkerOffset => {
                write!(f, "LISTINGS_MARKER_OFFSET must be a positive number of degrees")
            }
            ConfigError::InvalidCurrency { source } => {
                write!(f, "LISTINGS_DISPLAY_CURRENCY is not usable: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidCurrency { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPageSize
            | ConfigError::InvalidMarkerOffset => None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    /// Serializes every test that touches process environment variables.
    pub(crate) fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "LISTINGS_DATA_DIR",
            "LISTINGS_PAGE_SIZE",
            "LISTINGS_MARKER_OFFSET",
            "LISTINGS_DISPLAY_CURRENCY",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.listings.page_size.get(), 6);
        assert_eq!(config.listings.marker_offset, OFFSET_DISTANCE);
        assert_eq!(config.listings.display_currency, CurrencyCode::Aed);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_listing_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LISTINGS_PAGE_SIZE", "12");
        env::set_var("LISTINGS_DISPLAY_CURRENCY", "usd");
        env::set_var("LISTINGS_DATA_DIR", "/srv/inventory");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.listings.page_size.get(), 12);
        assert_eq!(config.listings.display_currency, CurrencyCode::Usd);
        assert_eq!(config.listings.data_dir, PathBuf::from("/srv/inventory"));
        reset_env();
    }

    #[test]
    fn rejects_unusable_listing_settings() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("LISTINGS_PAGE_SIZE", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidPageSize)
        ));

        reset_env();
        env::set_var("LISTINGS_MARKER_OFFSET", "-0.5");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidMarkerOffset)
        ));

        reset_env();
        env::set_var("LISTINGS_DISPLAY_CURRENCY", "XYZ");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidCurrency { .. })
        ));
        reset_env();
    }
}
