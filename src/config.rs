use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "HEBOTTPD_CONFIG";

/// Environment variable overriding the listen address.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    pub server_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub docroot: PathBuf,
    pub not_found_document: String,
    pub not_supported_document: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:18080".to_string(),
            read_timeout_secs: 30,
            write_timeout_secs: 30,
            server_name: "hebottpd/1.0".to_string(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            docroot: PathBuf::from("."),
            not_found_document: "not-found.html".to_string(),
            not_supported_document: "not-supported.html".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Config {
    /// Loads the configuration for the running process.
    ///
    /// Defaults are overlaid by the YAML file named in `HEBOTTPD_CONFIG`,
    /// then by `LISTEN`, then by the docroot given on the command line.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var(LISTEN_ENV) {
            cfg.server.listen_addr = addr;
        }

        cfg.apply_args(std::env::args())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config file {}", path))
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Both deadlines must be at least one second; zero would expire at once.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.read_timeout_secs == 0 {
            bail!("server.read_timeout_secs must be greater than 0");
        }
        if self.server.write_timeout_secs == 0 {
            bail!("server.write_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Applies the process arguments. The first item is the program name and
    /// exactly one docroot must follow it.
    pub fn apply_args<I>(&mut self, args: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let program = args.next().unwrap_or_else(|| "hebottpd".to_string());

        match (args.next(), args.next()) {
            (Some(docroot), None) => {
                self.static_files.docroot = PathBuf::from(docroot);
                Ok(())
            }
            _ => bail!("Usage: {} <docroot>", program),
        }
    }

    /// Location of the not-found fallback document under the docroot.
    pub fn not_found_path(&self) -> PathBuf {
        self.static_files
            .docroot
            .join(&self.static_files.not_found_document)
    }

    /// Location of the not-supported fallback document under the docroot.
    pub fn not_supported_path(&self) -> PathBuf {
        self.static_files
            .docroot
            .join(&self.static_files.not_supported_document)
    }
}
