use std::env;
use std::num::ParseIntError;

use log::warn;
use thiserror::Error;

use crate::security::secrets_match;

pub const DEFAULT_WELCOME_MESSAGE: &str = "Introducing the FitVerse debut. Our first line of genuine gear is officially live and ready to power your next move. Welcome to the future of your fitness.";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SERVER_PORT must be a port number, got {value:?}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn matches(&self, username: &str, password: &str) -> bool {
        // evaluate both so a wrong username costs the same as a wrong password
        let username_ok = secrets_match(&self.username, username);
        let password_ok = secrets_match(&self.password, password);
        username_ok & password_ok
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub welcome_message: String,
    pub credentials: Credentials,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("SERVER_PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => 8080,
        };

        let password = lookup("SECURITY_USER_PASSWORD").unwrap_or_else(|| {
            let generated = uuid::Uuid::new_v4().to_string();
            warn!("Using generated security password: {}", generated);
            generated
        });

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            cors_origins: lookup("APPLICATION_CORS_ORIGINS")
                .map(|value| parse_origins(&value))
                .unwrap_or_default(),
            welcome_message: lookup("APPLICATION_WELCOME_MESSAGE")
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_WELCOME_MESSAGE.to_string()),
            credentials: Credentials {
                username: lookup("SECURITY_USER_NAME").unwrap_or_else(|| "user".to_string()),
                password,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(ToString::to_string)
        .collect()
}
