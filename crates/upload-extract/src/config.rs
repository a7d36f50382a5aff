//! Configuration for the upload service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload handling configuration
    #[serde(default)]
    pub upload: UploadConfig,
}

impl ExtractConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply `UPLOAD_EXTRACT_*` environment overrides
    pub fn apply_env(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("UPLOAD_EXTRACT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("UPLOAD_EXTRACT_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid UPLOAD_EXTRACT_PORT: {}", e)))?;
        }
        if let Ok(dir) = std::env::var("UPLOAD_EXTRACT_STAGING_DIR") {
            self.upload.staging_dir = PathBuf::from(dir);
        }
        Ok(self)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Upload handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Multipart field carrying the files
    pub field_name: String,
    /// Scratch directory for staged file parts
    pub staging_dir: PathBuf,
    /// Buffer the whole body before decoding (false streams it into the decoder)
    pub buffer_body: bool,
    /// Keep staged files after the response is assembled
    pub retain_staged_files: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            field_name: "files".to_string(),
            staging_dir: std::env::temp_dir().join("uploads"),
            buffer_body: true,
            retain_staged_files: false,
        }
    }
}
