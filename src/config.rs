use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

pub const DEFAULT_PROVIDER_ENDPOINT: &str = "https://oi-server.onrender.com/chat/completions";
pub const DEFAULT_PROVIDER_MODEL: &str = "replicate/google/veo-3";
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_REGISTRY_CAPACITY: usize = 100;
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for the outbound generation provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub provider: ProviderConfig,
    pub generation_timeout: Duration,
    pub registry_capacity: usize,
    pub cors_allowed_origin: HeaderValue,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "BIND_ADDR",
                value: raw,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };

        let api_key = get("VIDEO_PROVIDER_API_KEY").ok_or(ConfigError::Missing("VIDEO_PROVIDER_API_KEY"))?;

        let generation_timeout = match get("GENERATION_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "GENERATION_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_GENERATION_TIMEOUT,
        };

        let registry_capacity = match get("REGISTRY_CAPACITY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(cap) if cap > 0 => cap,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "REGISTRY_CAPACITY",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_REGISTRY_CAPACITY,
        };

        let cors_allowed_origin = match get("CORS_ALLOWED_ORIGIN") {
            Some(raw) => HeaderValue::from_str(raw.trim()).map_err(|_| ConfigError::Invalid {
                name: "CORS_ALLOWED_ORIGIN",
                value: raw,
            })?,
            None => HeaderValue::from_static(DEFAULT_CORS_ALLOWED_ORIGIN),
        };

        Ok(Self {
            bind_addr,
            provider: ProviderConfig {
                endpoint: get("VIDEO_PROVIDER_ENDPOINT")
                    .unwrap_or_else(|| DEFAULT_PROVIDER_ENDPOINT.to_string()),
                model: get("VIDEO_PROVIDER_MODEL").unwrap_or_else(|| DEFAULT_PROVIDER_MODEL.to_string()),
                api_key,
                customer_id: get("VIDEO_PROVIDER_CUSTOMER_ID"),
            },
            generation_timeout,
            registry_capacity,
            cors_allowed_origin,
        })
    }
}
