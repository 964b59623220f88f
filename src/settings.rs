use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use url::Url;
use std::{env, fmt, str::FromStr};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Cloudinary account the deletion proxy signs requests for.
    #[serde(default)]
    pub cloud_name: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    /// Unsigned upload preset used by the device-side upload flow.
    #[serde(default)]
    pub upload_preset: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Firebase Realtime Database root, e.g. https://PROJECT-default-rtdb.firebaseio.com
    #[serde(default)]
    pub firebase_database_url: String,

    #[serde(default = "default_collection")]
    pub firebase_collection: String,

    /// Where the device-side delete flow reaches this proxy.
    #[serde(default)]
    pub delete_api_url: String,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Gallery-Deletion-Proxy".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_api_base_url() -> String {
    "https://api.cloudinary.com".to_string()
}
fn default_collection() -> String {
    "images".to_string()
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name.to_string().to_lowercase())).required(false))
            .add_source(Environment::with_prefix("APP").ignore_empty(true));

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // The credential trio keeps the variable names the hosting platform
        // already provisions, so deployments need no renaming.
        config.cloud_name = fill_or_env(config.cloud_name, "CLOUDINARY_CLOUD_NAME")?;
        config.api_key = fill_or_env(config.api_key, "CLOUDINARY_API_KEY")?;
        config.api_secret = fill_or_env(config.api_secret, "CLOUDINARY_API_SECRET")?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.cloud_name.trim().is_empty() {
            errors.push("CLOUDINARY_CLOUD_NAME cannot be empty".to_string());
        }
        if self.api_key.trim().is_empty() {
            errors.push("CLOUDINARY_API_KEY cannot be empty".to_string());
        }
        if self.api_secret.trim().is_empty() {
            errors.push("CLOUDINARY_API_SECRET cannot be empty".to_string());
        }
        if let Err(e) = Url::parse(&self.api_base_url) {
            errors.push(format!("api_base_url is not a valid URL: {}", e));
        }
        if !self.firebase_database_url.is_empty() {
            if let Err(e) = Url::parse(&self.firebase_database_url) {
                errors.push(format!("firebase_database_url is not a valid URL: {}", e));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    /// Unsigned upload endpoint for this account.
    pub fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.api_base_url.trim_end_matches('/'), self.cloud_name)
    }

    /// Privileged destroy endpoint for this account.
    pub fn destroy_url(&self) -> String {
        format!("{}/v1_1/{}/image/destroy", self.api_base_url.trim_end_matches('/'), self.cloud_name)
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.redact())
            .field("api_secret", &self.api_secret.redact())
            .field("upload_preset", &self.upload_preset)
            .field("api_base_url", &self.api_base_url)
            .field("firebase_database_url", &self.firebase_database_url)
            .field("firebase_collection", &self.firebase_collection)
            .field("delete_api_url", &self.delete_api_url)
            .finish()
    }
}
