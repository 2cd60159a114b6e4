use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.yaml";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Outbound HTTP settings
    pub http: HttpConfig,

    /// Embedded HTTP server settings
    pub server: ServerConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout for each page or caption-track request
    pub timeout_secs: u64,

    /// User agent sent to video platforms
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server binds to
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Caption language when none is given ("auto" prefers English)
    pub default_language: String,

    /// Default output format
    pub default_output_format: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_language: "auto".to_string(),
            default_output_format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first file found, or fall back to defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let local_config = PathBuf::from(CONFIG_FILE_NAME);
        if local_config.exists() {
            return Self::load_from(&local_config);
        }

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                return Self::load_from(&user_config);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load and validate a specific configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs_err::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;

        fs_err::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Per-user configuration file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("caption-transcriptor").join(CONFIG_FILE_NAME))
    }

    fn validate(&self) -> Result<()> {
        if !(1..=60).contains(&self.http.timeout_secs) {
            anyhow::bail!(
                "http.timeout_secs must be between 1 and 60 (got {})",
                self.http.timeout_secs
            );
        }

        if self.http.user_agent.trim().is_empty() {
            anyhow::bail!("http.user_agent must not be empty");
        }

        self.server
            .bind
            .parse::<std::net::SocketAddr>()
            .with_context(|| format!("Invalid server.bind address: {}", self.server.bind))?;

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  HTTP Timeout: {}s", self.http.timeout_secs);
        println!("  User Agent: {}", self.http.user_agent);
        println!("  Accept-Language: {}", self.http.accept_language);
        println!("  Server Bind: {}", self.server.bind);
        println!("  Default Language: {}", self.app.default_language);
        println!("  Default Format: {}", self.app.default_output_format);
    }
}
