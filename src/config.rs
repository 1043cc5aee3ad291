use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "harusmile-development-secret-change-me";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    pub media_root: PathBuf,
    pub frontend_url: String,
    pub mail_from: String,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub verification_minutes: i64,
    pub password_hash_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: "harusmile.db".to_string(),
            port: 8000,
            cors_origin: None,
            media_root: PathBuf::from("media"),
            frontend_url: "http://localhost:3000".to_string(),
            mail_from: "harusmile@email.com".to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_minutes: 60,
            refresh_token_days: 7,
            verification_minutes: 30,
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AuthConfig {
    pub fn secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEV_JWT_SECRET)
    }
}

impl AppConfig {
    /// Defaults, then the TOML file (if any), then `HARUSMILE_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup("HARUSMILE_DATABASE") {
            self.database = database;
        }
        if let Some(port) = lookup("HARUSMILE_PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("HARUSMILE_PORT is not a port number: {}", port))?;
        }
        if let Some(secret) = lookup("HARUSMILE_JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(root) = lookup("HARUSMILE_MEDIA_ROOT") {
            self.media_root = PathBuf::from(root);
        }
        if let Some(url) = lookup("HARUSMILE_FRONTEND_URL") {
            self.frontend_url = url;
        }
        if let Some(origin) = lookup("HARUSMILE_CORS_ORIGIN") {
            self.cors_origin = Some(origin);
        }
        if let Some(from) = lookup("HARUSMILE_MAIL_FROM") {
            self.mail_from = from;
        }
        Ok(())
    }

    pub fn warn_on_insecure_defaults(&self) {
        if self.auth.jwt_secret.is_none() {
            warn!("No JWT secret configured, falling back to the development secret");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
port = 9000

[auth]
jwt_secret = "s3cret"
"#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.database, "harusmile.db");
        assert_eq!(config.auth.secret(), "s3cret");
        assert_eq!(config.auth.access_token_minutes, 60);
        assert_eq!(config.auth.verification_minutes, 30);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::from_toml("database = \"file.db\"").unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("HARUSMILE_DATABASE", ":memory:"),
            ("HARUSMILE_PORT", "8123"),
            ("HARUSMILE_FRONTEND_URL", "https://harusmile.example"),
        ]);

        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.database, ":memory:");
        assert_eq!(config.port, 8123);
        assert_eq!(config.frontend_url, "https://harusmile.example");
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| {
            (key == "HARUSMILE_PORT").then(|| "eighty".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_secret_uses_development_default() {
        let config = AppConfig::default();
        assert_eq!(config.auth.secret(), DEV_JWT_SECRET);
    }
}
