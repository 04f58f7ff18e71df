use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub storage: StorageConfig,
    pub admin_seed: AdminSeedConfig,
    pub notifications: Option<SmtpConfig>,
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

        let data_dir = PathBuf::from(env::var("APP_DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let mode = StorageMode::parse(&env::var("APP_STORAGE").unwrap_or_else(|_| "auto".to_string()))?;

        let defaults = AdminSeedConfig::default();
        let admin_seed = AdminSeedConfig {
            name: env::var("ADMIN_SEED_NAME").unwrap_or(defaults.name),
            email: env::var("ADMIN_SEED_EMAIL").unwrap_or(defaults.email),
            username: env::var("ADMIN_SEED_USERNAME").unwrap_or(defaults.username),
            password: env::var("ADMIN_SEED_PASSWORD").unwrap_or(defaults.password),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { data_dir, mode },
            admin_seed,
            notifications: SmtpConfig::from_env()?,
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
}

/// Where candidate and admin collections live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub mode: StorageMode,
}

/// Requested persistence strategy; `Auto` probes the data directory at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Auto,
    File,
    Memory,
}

impl StorageMode {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "file" | "disk" => Ok(Self::File),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidStorageMode(other.to_string())),
        }
    }
}

/// Credentials for the administrator that always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeedConfig {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

impl Default for AdminSeedConfig {
    fn default() -> Self {
        Self {
            name: "Sir NEO".to_string(),
            email: "neo@dessishub.com".to_string(),
            username: "sirneo".to_string(),
            password: "Neo@2025".to_string(),
        }
    }
}

/// Outbound mail relay. Only present when both user and password are set.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let username = env::var("SMTP_USER").ok().filter(|value| !value.is_empty());
        let password = env::var("SMTP_PASS").ok().filter(|value| !value.is_empty());

        let (Some(username), Some(password)) = (username, password) else {
            return Ok(None);
        };

        let host = env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.ethereal.email".to_string());
        let port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidSmtpPort)?;
        let from = env::var("FROM_EMAIL").unwrap_or_else(|_| "noreply@dessishub.com".to_string());

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            from,
        }))
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidStorageMode(String),
    InvalidSmtpPort,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidStorageMode(value) => write!(
                f,
                "APP_STORAGE must be one of auto, file, memory (found '{value}')"
            ),
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidStorageMode(_)
            | ConfigError::InvalidSmtpPort => None,
        }
    }
}
