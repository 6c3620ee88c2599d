use serde::Deserialize;
use std::env;

use crate::models::ProblemSettings;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_METRICS_AUTH: &str = "admin:changeme";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    /// In-memory store when unset.
    pub redis_uri: Option<String>,
    /// `username:password` for the metrics endpoint.
    pub metrics_auth: String,
    /// Settings used for problems that were never authored.
    pub problem_defaults: ProblemSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            redis_uri: None,
            metrics_auth: DEFAULT_METRICS_AUTH.to_string(),
            problem_defaults: ProblemSettings::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let bind_addr = settings
            .get_string("server.bind_addr")
            .or_else(|_| env::var("BIND_ADDR"))
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let redis_uri = settings
            .get_string("redis.uri")
            .or_else(|_| env::var("REDIS_URI"))
            .ok()
            .filter(|uri| !uri.trim().is_empty());

        let metrics_auth = settings
            .get_string("metrics.auth")
            .or_else(|_| env::var("METRICS_AUTH"))
            .unwrap_or_else(|_| {
                if env == "prod" {
                    eprintln!("WARNING: Using default METRICS_AUTH in production");
                }
                DEFAULT_METRICS_AUTH.to_string()
            });

        let problem_defaults = match settings.get::<ProblemSettings>("problem_defaults") {
            Ok(defaults) => defaults,
            Err(config::ConfigError::NotFound(_)) => ProblemSettings::default(),
            Err(e) => return Err(e),
        };
        problem_defaults.check().map_err(|messages| {
            config::ConfigError::Message(format!(
                "Invalid problem_defaults: {}",
                messages.join("; ")
            ))
        })?;

        Ok(Config {
            bind_addr,
            redis_uri,
            metrics_auth,
            problem_defaults,
        })
    }
}
