//! Configuration structures for the invx pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Main configuration for the invx pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvxConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Tesseract configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Location of the tesseract executable. A bare name is looked up on `PATH`.
    pub tesseract_cmd: PathBuf,

    /// Tesseract language code(s), e.g. `eng` or `eng+hin`.
    pub language: String,

    /// Page segmentation mode passed as `--psm`. Tesseract's default when unset.
    pub psm: Option<u8>,

    /// When set, the raw OCR text of every image is written to this file.
    ///
    /// The file is overwritten on each run, so concurrent requests may
    /// clobber each other's output.
    pub debug_output: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            psm: None,
            debug_output: None,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Record a warning for every header field that was not found.
    pub warn_on_missing_fields: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            warn_on_missing_fields: true,
        }
    }
}

/// Default location of the raw OCR dump used by `--debug-ocr`.
pub const DEFAULT_DEBUG_OUTPUT: &str = "ocr_output.txt";

impl InvxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Override settings from environment variables.
    ///
    /// - `TESSERACT_CMD`: tesseract executable
    /// - `INVX_OCR_LANG`: tesseract language
    /// - `INVX_DEBUG_OCR`: path of the raw OCR dump
    /// - `INVX_HOST`, `INVX_PORT`: server bind address
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(cmd) = lookup("TESSERACT_CMD").filter(|v| !v.trim().is_empty()) {
            self.ocr.tesseract_cmd = PathBuf::from(cmd);
        }

        if let Some(lang) = lookup("INVX_OCR_LANG").filter(|v| !v.trim().is_empty()) {
            self.ocr.language = lang;
        }

        if let Some(path) = lookup("INVX_DEBUG_OCR").filter(|v| !v.trim().is_empty()) {
            self.ocr.debug_output = Some(PathBuf::from(path));
        }

        if let Some(host) = lookup("INVX_HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }

        if let Some(port) = lookup("INVX_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Failed to parse INVX_PORT='{}', must be a valid port", port),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = InvxConfig::default();
        assert_eq!(config.ocr.tesseract_cmd, PathBuf::from("tesseract"));
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.debug_output, None);
        assert_eq!(config.server.port, 8000);
        assert!(config.extraction.warn_on_missing_fields);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InvxConfig =
            serde_json::from_str(r#"{"ocr": {"tesseract_cmd": "/usr/local/bin/tesseract"}}"#).unwrap();

        assert_eq!(config.ocr.tesseract_cmd, PathBuf::from("/usr/local/bin/tesseract"));
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvxConfig::default();
        config.ocr.psm = Some(6);
        config.server.port = 9100;
        config.save(&path).unwrap();

        let loaded = InvxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.psm, Some(6));
        assert_eq!(loaded.server.port, 9100);
    }

    #[test]
    fn test_invalid_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = InvxConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("TESSERACT_CMD", r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
            ("INVX_DEBUG_OCR", "ocr_output.txt"),
            ("INVX_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = InvxConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.ocr.tesseract_cmd,
            PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe")
        );
        assert_eq!(config.ocr.debug_output, Some(PathBuf::from("ocr_output.txt")));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_bad_port_is_ignored() {
        let mut config = InvxConfig::default();
        config.apply_overrides(|key| (key == "INVX_PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 8000);
    }
}
