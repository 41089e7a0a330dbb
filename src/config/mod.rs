//! Configuration module

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub webdriver: WebDriverConfig,
    #[serde(default)]
    pub pushgateway: PushGatewayConfig,
}

/// Connection parameters for the router web UI
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_router_host")]
    pub host: String,
    #[serde(default = "default_router_user")]
    pub user: String,
    #[serde(default = "default_router_password")]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebDriverConfig {
    #[serde(default = "default_webdriver_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub wait_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub headless: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushGatewayConfig {
    #[serde(default = "default_pushgateway_url")]
    pub url: String,
    #[serde(default = "default_job")]
    pub job: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            host: default_router_host(),
            user: default_router_user(),
            password: default_router_password(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: default_webdriver_url(),
            wait_timeout_secs: default_timeout_secs(),
            headless: default_true(),
        }
    }
}

impl Default for PushGatewayConfig {
    fn default() -> Self {
        Self {
            url: default_pushgateway_url(),
            job: default_job(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_router_host() -> String {
    "192.168.1.1".to_string()
}

fn default_router_user() -> String {
    "admin".to_string()
}

fn default_router_password() -> String {
    "admin".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_pushgateway_url() -> String {
    "http://localhost:9091".to_string()
}

fn default_job() -> String {
    "b593".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load from `config/default.*` (optional) and `B593__SECTION__KEY` env vars
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("B593").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;

        Ok(config)
    }
}
