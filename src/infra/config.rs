use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// EnvFilter directive for the console layer, e.g. `info` or `otpgate=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for the rotated JSONL files. Console only when absent.
    #[serde(default)]
    pub log_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub allow_origins: Vec<String>,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub driver: StorageDriver,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    pub ttl_seconds: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self { ttl_seconds: 600 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: i64,
    #[serde(default = "default_admin_ttl")]
    pub admin_ttl_seconds: i64,
    #[serde(default = "default_reset_proof_ttl")]
    pub reset_proof_ttl_seconds: i64,
}

fn default_session_ttl() -> i64 {
    86_400
}

fn default_admin_ttl() -> i64 {
    7_200
}

fn default_reset_proof_ttl() -> i64 {
    600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// `local` writes messages to `local_output_dir`, `smtp` delivers them.
    pub provider: String,
    pub local_output_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SMTPConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub db: DatabaseConfig,
    pub logger: LoggerConfig,
    pub application: ApplicationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    pub token: TokenConfig,
    pub admin: AdminConfig,
    pub email: EmailConfig,
    pub smtp: SMTPConfig,
}

impl AppConfig {
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<AppConfig> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<AppConfig> {
        let config = toml::from_str(contents)?;
        Ok(config)
    }
}
