use partwise_storage::DatabaseConfig;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
    #[error("Invalid database max connections: {0}")]
    InvalidMaxConnections(String),
}

/// In-memory database marker accepted by `DATABASE_PATH` and `--db`
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub cors_origin: String,
    /// `None` selects an in-memory database
    pub database_path: Option<PathBuf>,
    pub database_max_connections: u32,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host_str = env::var("PARTWISE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let host = parse_host(&host_str)?;

        let port_str = env::var("PORT").unwrap_or_else(|_| "4001".to_string());
        let port = parse_port(&port_str)?;

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());
        if cors_origin != "*" && axum::http::HeaderValue::from_str(&cors_origin).is_err() {
            return Err(ConfigError::InvalidCorsOrigin(cors_origin));
        }

        let database_path = match env::var("DATABASE_PATH") {
            Ok(path) => parse_database_path(&path),
            Err(_) => Some(partwise_core::database_file()),
        };

        let max_str = env::var("DATABASE_MAX_CONNECTIONS").unwrap_or_else(|_| "10".to_string());
        let database_max_connections = match max_str.parse::<u32>() {
            Ok(n) if n > 0 => n,
            _ => return Err(ConfigError::InvalidMaxConnections(max_str)),
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            host,
            port,
            cors_origin,
            database_path,
            database_max_connections,
            log_level,
        })
    }

    /// Apply command-line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        host: Option<&str>,
        port: Option<u16>,
        database: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = parse_host(host)?;
        }
        if let Some(port) = port {
            if port == 0 {
                return Err(ConfigError::PortOutOfRange(port));
            }
            self.port = port;
        }
        if let Some(database) = database {
            self.database_path = parse_database_path(database);
        }
        Ok(self)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig {
            path: self.database_path.clone(),
            max_connections: self.database_max_connections,
            ..DatabaseConfig::default()
        }
    }
}

fn parse_host(host: &str) -> Result<IpAddr, ConfigError> {
    host.parse::<IpAddr>()
        .map_err(|_| ConfigError::InvalidHost(host.to_string()))
}

fn parse_port(port: &str) -> Result<u16, ConfigError> {
    let port = port.parse::<u16>()?;

    // Validate port is in valid range
    if port == 0 {
        return Err(ConfigError::PortOutOfRange(port));
    }
    Ok(port)
}

fn parse_database_path(path: &str) -> Option<PathBuf> {
    if path == IN_MEMORY {
        None
    } else {
        Some(PathBuf::from(path))
    }
}
