// src/config/server.rs
// Server, origin and logging configuration

use serde::{Deserialize, Serialize};

use super::helpers::{Lookup, env_list, env_or, env_parsed_or};
use crate::error::PoemResult;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin globs accepted for WebSocket upgrades and CORS, `*` for any
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_lookup(lookup: Lookup) -> PoemResult<Self> {
        Ok(Self {
            host: env_or(lookup, "POEM_HOST", "0.0.0.0"),
            port: env_parsed_or(lookup, "POEM_PORT", 5000)?,
            allowed_origins: env_list(lookup, "POEM_ALLOWED_ORIGINS", "http://192.168.1.*"),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_lookup(lookup: Lookup) -> Self {
        Self {
            level: env_or(lookup, "POEM_LOG_LEVEL", "info"),
        }
    }
}
