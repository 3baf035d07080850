use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://edge.pse.com.ph";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

// Outbound mail settings; `from` falls back to the login name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: Option<String>,
}

impl SmtpConfig {
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug)]
pub struct ConfigYaml {
    pub base_url: Option<String>,
    pub http_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub smtp: Option<SmtpYaml>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SmtpYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: String,
    pub password: String,
    pub from: Option<String>,
}

// Holds application-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: String,
    /// `None` keeps requests unbounded, which is how the exchange client has always behaved.
    pub http_timeout: Option<Duration>,
    pub user_agent: Option<String>,
    pub smtp: Option<SmtpConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout: None,
            user_agent: None,
            smtp: None,
        }
    }
}

impl AppConfig {
    // Load configuration from YAML file or environment variables
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(config_file) = env::var("CONFIG_FILE") {
            Self::from_yaml(&config_file)
        } else {
            Self::from_env()
        }
    }

    pub fn from_yaml(file_path: &str) -> Result<Self, ConfigError> {
        let yaml_content = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
            path: file_path.to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml_content)
    }

    pub fn from_yaml_str(yaml_content: &str) -> Result<Self, ConfigError> {
        let yaml_config: ConfigYaml = serde_yaml::from_str(yaml_content)?;

        let smtp = yaml_config.smtp.map(|smtp| SmtpConfig {
            host: smtp.host.unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            port: smtp.port.unwrap_or(DEFAULT_SMTP_PORT),
            username: smtp.username,
            password: smtp.password,
            from: smtp.from,
        });

        Ok(Self {
            base_url: normalize_base_url(
                yaml_config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            ),
            http_timeout: yaml_config.http_timeout_secs.map(Duration::from_secs),
            user_agent: yaml_config.user_agent,
            smtp,
        })
    }

    // Load all configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PSE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "HTTP_TIMEOUT_SECS",
                    value: raw.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let smtp = match lookup("SMTP_USERNAME") {
            Some(username) => {
                let port = match lookup("SMTP_PORT") {
                    Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                        key: "SMTP_PORT",
                        value: raw.clone(),
                    })?,
                    None => DEFAULT_SMTP_PORT,
                };
                Some(SmtpConfig {
                    host: lookup("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                    port,
                    username,
                    password: lookup("SMTP_PASSWORD").ok_or(ConfigError::Missing("SMTP_PASSWORD"))?,
                    from: lookup("SMTP_FROM"),
                })
            }
            None => None,
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            http_timeout,
            user_agent: lookup("PSE_USER_AGENT"),
            smtp,
        })
    }

    /// Mail settings are only mandatory once a notification is actually requested.
    pub fn require_smtp(&self) -> Result<&SmtpConfig, ConfigError> {
        self.smtp.as_ref().ok_or(ConfigError::Missing("SMTP_USERNAME"))
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
