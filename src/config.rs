use std::env;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::warn;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend the listing pages read from.
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Address the bundled list backend binds to.
    pub bind_addr: String,
    /// Bearer token guarding the admin listings. `None` leaves them open.
    pub admin_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            admin_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = env::var("API_BASE_URL").unwrap_or(defaults.api_base_url);
        let request_timeout = match env::var("API_TIMEOUT_MS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!("API_TIMEOUT_MS={raw:?} is not a number, using {DEFAULT_TIMEOUT_MS}ms");
                    defaults.request_timeout
                }
            },
            Err(_) => defaults.request_timeout,
        };
        let bind_addr = env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let admin_token = env::var("ADMIN_TOKEN").ok().filter(|t| !t.is_empty());

        Self {
            api_base_url,
            request_timeout,
            bind_addr,
            admin_token,
        }
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}
