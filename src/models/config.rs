//! Configuration module for CryptoGuard
//!
//! Uses constants from utils/constants.rs; environment variables only
//! override, never replace, the defaults.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::utils::constants::{
    DEFAULT_HOST, DEFAULT_MODEL_DIR, DEFAULT_PORT, ENV_HOST, ENV_MODEL_DIR, ENV_PORT,
};

/// Where the model artifacts live. The directory may be partially or
/// completely empty; every missing artifact degrades gracefully.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_dir: PathBuf,
}

impl ModelConfig {
    /// Model directory from `CRYPTOGUARD_MODEL_DIR`, defaulting to `models/`
    pub fn from_env() -> Self {
        let model_dir = std::env::var(ENV_MODEL_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_DIR));
        info!("📁 Model directory: {}", model_dir.display());
        Self { model_dir }
    }

    pub fn with_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            model_dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
        }
    }
}

/// API server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Cloud platforms inject `PORT`; `CRYPTOGUARD_PORT` is the local
    /// override, `CRYPTOGUARD_HOST` the bind host.
    pub fn from_env() -> Self {
        let host = std::env::var(ENV_HOST).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = std::env::var("PORT")
            .or_else(|_| std::env::var(ENV_PORT))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { host, port }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir() {
        let cfg = ModelConfig::default();
        assert_eq!(cfg.model_dir, PathBuf::from("models"));
    }

    #[test]
    fn test_with_dir() {
        let cfg = ModelConfig::with_dir("/tmp/does-not-exist");
        assert_eq!(cfg.model_dir, PathBuf::from("/tmp/does-not-exist"));
    }

    #[test]
    fn test_bind_addr_format() {
        let cfg = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9000");
    }
}
