//! Database connection configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Connection parameters for the `PostgreSQL` producer store.
///
/// Either `url` is set, or the discrete host/port/credential fields are
/// used. The password is never printed by `Debug`.
#[derive(Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: Option<String>,
    pub database: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Maximum time to wait for a pooled connection.
    pub acquire_timeout: Duration,
    /// Run `CREATE TABLE IF NOT EXISTS` at startup.
    pub init_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            username: "postgres".to_string(),
            password: None,
            database: "agro".to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            init_schema: false,
        }
    }
}

impl DatabaseConfig {
    /// Builds sqlx connect options from the configured parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is set but cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url);
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.database);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("init_schema", &self.init_schema)
            .finish()
    }
}
