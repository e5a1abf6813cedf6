//! Command-line and environment configuration for the server binary.
//!
//! Every option can be given as a flag or through the environment variable
//! named next to it. Database parameters use the standard libpq names.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::network::{ApiConfig, NetworkConfig, TlsConfig};
use crate::storage::DatabaseConfig;

/// Which [`ProducerStore`](crate::traits::ProducerStore) backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackend {
    Postgres,
    /// Process-local, lost on restart.
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "agro-server", version, about = "HTTP API for agricultural producers")]
pub struct ServerArgs {
    /// Address to bind.
    #[arg(long, env = "AGRO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "AGRO_PORT", default_value_t = 3001)]
    pub port: u16,

    #[arg(long, env = "AGRO_STORAGE", value_enum, default_value_t = StorageBackend::Postgres)]
    pub storage: StorageBackend,

    /// Full connection URL; overrides the discrete `--db-*` options.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "PGHOST", default_value = "localhost")]
    pub db_host: String,

    #[arg(long, env = "PGPORT", default_value_t = 5432)]
    pub db_port: u16,

    #[arg(long, env = "PGUSER", default_value = "postgres")]
    pub db_user: String,

    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long, env = "PGDATABASE", default_value = "agro")]
    pub db_name: String,

    #[arg(long, env = "AGRO_DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub db_max_connections: u32,

    #[arg(long, env = "AGRO_DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub db_acquire_timeout_secs: u64,

    /// Create the `producers` table at startup if it is missing.
    #[arg(long, env = "AGRO_INIT_SCHEMA")]
    pub init_schema: bool,

    /// Reject payloads where cultivable + vegetation area exceeds total area.
    #[arg(long, env = "AGRO_ENFORCE_AREA_INVARIANT")]
    pub enforce_area_invariant: bool,

    /// Comma-separated allowed origins; `*` allows any.
    #[arg(long, env = "AGRO_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "AGRO_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "AGRO_TLS_CERT", requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    #[arg(long, env = "AGRO_TLS_KEY", requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    #[arg(long, env = "AGRO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl ServerArgs {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        let tls = match (&self.tls_cert, &self.tls_key) {
            (Some(cert_path), Some(key_path)) => Some(TlsConfig {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            }),
            _ => None,
        };

        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            tls,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            ..NetworkConfig::default()
        }
    }

    #[must_use]
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database_url.clone(),
            host: self.db_host.clone(),
            port: self.db_port,
            username: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            max_connections: self.db_max_connections,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
            init_schema: self.init_schema,
        }
    }

    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            enforce_area_invariant: self.enforce_area_invariant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ServerArgs {
        ServerArgs::try_parse_from(std::iter::once("agro-server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn explicit_flags_map_to_network_config() {
        let args = parse(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--cors-origins",
            "http://a.example,http://b.example",
            "--request-timeout-secs",
            "5",
        ]);
        let config = args.network_config();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cors_origins, vec!["http://a.example", "http://b.example"]);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.tls.is_none());
    }

    #[test]
    fn database_flags_map_to_database_config() {
        let args = parse(&[
            "--db-host",
            "db.internal",
            "--db-port",
            "6543",
            "--db-user",
            "agro",
            "--db-password",
            "secret",
            "--db-name",
            "farms",
            "--db-max-connections",
            "4",
            "--init-schema",
        ]);
        let config = args.database_config();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 6543);
        assert_eq!(config.username, "agro");
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.database, "farms");
        assert_eq!(config.max_connections, 4);
        assert!(config.init_schema);
    }

    #[test]
    fn storage_and_invariant_flags() {
        let args = parse(&["--storage", "memory", "--enforce-area-invariant", "--log-format", "json"]);
        assert_eq!(args.storage, StorageBackend::Memory);
        assert_eq!(args.log_format, LogFormat::Json);
        assert!(args.api_config().enforce_area_invariant);
    }

    #[test]
    fn tls_requires_both_paths() {
        let result = ServerArgs::try_parse_from(["agro-server", "--tls-cert", "/tmp/cert.pem"]);
        assert!(result.is_err());

        let args = parse(&["--tls-cert", "/tmp/cert.pem", "--tls-key", "/tmp/key.pem"]);
        let tls = args.network_config().tls.unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("/tmp/cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("/tmp/key.pem"));
    }
}
