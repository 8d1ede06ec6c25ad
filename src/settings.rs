use std::env;

use serde::Deserialize;
use tracing::info;

use crate::core::payload::{DEFAULT_COUNTRY_CODE, PayloadMode};

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_env")]
    pub env: String, // file / server
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub prefix: Option<String>,
    /// Comma separated list of origins allowed by CORS
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
    #[serde(default)]
    pub qr_payload_mode: PayloadMode,
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_env() -> String {
    "file".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> String {
    "http://localhost:3000,http://127.0.0.1:3000".to_string()
}

fn default_country_code() -> String {
    DEFAULT_COUNTRY_CODE.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env: default_env(),
            host: default_host(),
            port: default_port(),
            prefix: None,
            allowed_origins: default_allowed_origins(),
            qr_payload_mode: PayloadMode::default(),
            default_country_code: default_country_code(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
        }
    }
}

impl Config {
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect()
    }
}

pub fn get_config() -> Result<Config, envy::Error> {
    let env_var = env::var("env")
        .or_else(|_| env::var("ENV"))
        .unwrap_or("file".to_string());
    if env_var == "file" {
        info!("using .env file as environment variable");
        let _ = dotenvy::dotenv();
    } else {
        info!("using server environment as environment variable");
    }
    envy::from_env::<Config>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origins_are_split_and_trimmed() {
        let config = Config {
            allowed_origins: " https://a.example , ,https://b.example,".to_string(),
            ..Config::default()
        };
        assert_eq!(config.origins(), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.qr_payload_mode, PayloadMode::Tel);
        assert_eq!(config.port, 8000);
        assert_eq!(config.origins().len(), 2);
    }

    #[test]
    fn test_deserialize_from_env_pairs() {
        let vars = vec![
            ("QR_PAYLOAD_MODE".to_string(), " VCARD ".to_string()),
            ("PORT".to_string(), "9090".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.qr_payload_mode, PayloadMode::VCard);
        assert_eq!(config.port, 9090);
        assert_eq!(config.host, "0.0.0.0");
    }
}
