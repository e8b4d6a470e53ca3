use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Policy switch for unauthenticated safe-verb access. Defaults to allowed,
    /// matching the public-read model.
    pub allow_anonymous_reads: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum restaurants a non-staff user may administrate.
    pub max_restaurants_per_user: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("ALLOW_ANONYMOUS_READS") {
            self.security.allow_anonymous_reads =
                v.parse().unwrap_or(self.security.allow_anonymous_reads);
        }
        if let Ok(v) = env::var("MAX_RESTAURANTS_PER_USER") {
            self.validation.max_restaurants_per_user =
                v.parse().unwrap_or(self.validation.max_restaurants_per_user);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 5,
                connection_timeout_secs: 30,
            },
            security: SecurityConfig {
                // Dev-only fallback; real deployments must set JWT_SECRET.
                jwt_secret: "dev-secret-do-not-use".to_string(),
                jwt_expiry_hours: 24,
                allow_anonymous_reads: true,
            },
            validation: ValidationConfig {
                max_restaurants_per_user: crate::domain::constants::MAX_RESTAURANTS_PER_USER,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 12,
                allow_anonymous_reads: true,
            },
            validation: ValidationConfig {
                max_restaurants_per_user: crate::domain::constants::MAX_RESTAURANTS_PER_USER,
            },
        }
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Global configuration singleton, loaded from the environment on first access.
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert!(config.security.allow_anonymous_reads);
        assert_eq!(config.validation.max_restaurants_per_user, 3);
    }

    #[test]
    fn production_tightens_expiry() {
        let config = AppConfig::production();
        assert_eq!(config.security.jwt_expiry_hours, 12);
        assert!(config.security.jwt_secret.is_empty());
    }
}
