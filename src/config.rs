use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub auth_token: SecretString,
    pub request_timeout_secs: u64,
    pub command_buffer: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("QUIZ_API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            auth_token: SecretString::from(env::var("QUIZ_AUTH_TOKEN").unwrap_or_default()),
            request_timeout_secs: env::var("QUIZ_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(30),
            command_buffer: env::var("QUIZ_COMMAND_BUFFER")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(32),
        }
    }

    /// Rejects settings the client cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "QUIZ_API_BASE_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            )));
        }

        if self.auth_token.expose_secret().trim().is_empty() {
            return Err(AppError::Config(
                "QUIZ_AUTH_TOKEN is not set. Sign in on the website and export the session token."
                    .to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "QUIZ_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        if self.command_buffer == 0 {
            return Err(AppError::Config(
                "QUIZ_COMMAND_BUFFER must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:5000/api".to_string(),
            auth_token: SecretString::from("test-session-token".to_string()),
            request_timeout_secs: 5,
            command_buffer: 8,
        }
    }
}
