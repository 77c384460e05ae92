use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub notifications: NotificationConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub enable_slow_query_warning: bool,
    pub slow_query_threshold_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size applied when the client omits `limit`
    pub default_limit: i64,
    /// Hard ceiling on client-supplied page sizes
    pub max_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Recipients per bulk insert when fanning out a new-post notification
    pub fanout_chunk_size: usize,
    /// Default age cutoff for the prune-notifications command
    pub retention_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("SERVER_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs =
                v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_SLOW_QUERY_THRESHOLD_MS") {
            self.database.slow_query_threshold_ms =
                v.parse().unwrap_or(self.database.slow_query_threshold_ms);
        }

        if let Ok(v) = env::var("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = v.parse().unwrap_or(self.pagination.max_limit);
        }

        if let Ok(v) = env::var("NOTIFICATIONS_FANOUT_CHUNK_SIZE") {
            self.notifications.fanout_chunk_size =
                v.parse().unwrap_or(self.notifications.fanout_chunk_size);
        }
        if let Ok(v) = env::var("NOTIFICATIONS_RETENTION_DAYS") {
            self.notifications.retention_days =
                v.parse().unwrap_or(self.notifications.retention_days);
        }

        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 4000 },
            database: DatabaseConfig {
                max_connections: 10,
                connect_timeout_secs: 30,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 100,
            },
            pagination: PaginationConfig {
                default_limit: 6,
                max_limit: 100,
            },
            notifications: NotificationConfig {
                fanout_chunk_size: 500,
                retention_days: 90,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 4000 },
            database: DatabaseConfig {
                max_connections: 20,
                connect_timeout_secs: 10,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 500,
            },
            pagination: PaginationConfig {
                default_limit: 6,
                max_limit: 50,
            },
            notifications: NotificationConfig {
                fanout_chunk_size: 500,
                retention_days: 90,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.brewlog.example.com".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 4000 },
            database: DatabaseConfig {
                max_connections: 50,
                connect_timeout_secs: 5,
                enable_slow_query_warning: true,
                slow_query_threshold_ms: 1000,
            },
            pagination: PaginationConfig {
                default_limit: 6,
                max_limit: 50,
            },
            notifications: NotificationConfig {
                fanout_chunk_size: 500,
                retention_days: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://brewlog.example.com".to_string()],
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.pagination.default_limit, 6);
        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.pagination.max_limit, 50);
        assert_eq!(config.notifications.retention_days, 30);
        assert_eq!(config.notifications.fanout_chunk_size, 500);
    }
}
