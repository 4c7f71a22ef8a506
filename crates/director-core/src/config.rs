//! director.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};

use crate::certs::TrustedCerts;

/// Worker-pool size used when `max_threads` is not set.
pub const DEFAULT_MAX_THREADS: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorConfig {
    pub name: String,
    pub state_path: PathBuf,
    pub max_threads: Option<usize>,
    /// Inline PEM bundle pushed to every new agent.
    pub trusted_certs: Option<String>,
    /// Path to a PEM bundle, mutually exclusive with `trusted_certs`.
    pub trusted_certs_file: Option<PathBuf>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl DirectorConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config document.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: DirectorConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            bail!("director name must not be empty");
        }
        if self.max_threads == Some(0) {
            bail!("max_threads must be at least 1");
        }
        if self.trusted_certs.is_some() && self.trusted_certs_file.is_some() {
            bail!("set either trusted_certs or trusted_certs_file, not both");
        }
        Ok(())
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads.unwrap_or(DEFAULT_MAX_THREADS)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn log_format(&self) -> LogFormat {
        self.logging
            .as_ref()
            .and_then(|l| l.format)
            .unwrap_or_default()
    }

    /// Resolve the trusted certificate bundle. Neither source set yields the
    /// empty bundle.
    pub fn load_trusted_certs(&self) -> anyhow::Result<TrustedCerts> {
        if let Some(pem) = &self.trusted_certs {
            return Ok(TrustedCerts::new(pem.clone()));
        }
        match &self.trusted_certs_file {
            Some(path) => {
                let pem = std::fs::read_to_string(path)
                    .with_context(|| format!("reading trusted certs {}", path.display()))?;
                Ok(TrustedCerts::new(pem))
            }
            None => Ok(TrustedCerts::empty()),
        }
    }
}
