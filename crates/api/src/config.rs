use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use venture_core::DEFAULT_DESTINATION_COUNTRY;
use venture_planner::OpenAiConfig;
use venture_storage::MongoSettings;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
pub const MAX_REQUEST_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind: String,
    /// Unset means an in-memory store, optionally seeded from `places_seed`.
    pub mongo: Option<MongoSettings>,
    pub places_seed: Option<PathBuf>,
    pub openai: OpenAiConfig,
    pub destination_country: String,
    pub allowed_origins: Vec<String>,
    pub max_body_bytes: usize,
    /// Answer every failure with 200 and an error body, as older clients expect.
    pub legacy_error_status: bool,
}

impl ServiceConfig {
    pub fn new(openai: OpenAiConfig) -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            mongo: None,
            places_seed: None,
            openai,
            destination_country: DEFAULT_DESTINATION_COUNTRY.to_string(),
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            max_body_bytes: MAX_REQUEST_BODY_BYTES,
            legacy_error_status: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env_value("VENTURE_OPENAI_API_KEY")
            .or_else(|| env_value("API_KEY"))
            .context("VENTURE_OPENAI_API_KEY is not set")?;

        let mut openai = OpenAiConfig::new(api_key);
        if let Some(model) = env_value("VENTURE_OPENAI_MODEL") {
            openai.model = model;
        }
        if let Some(base_url) = env_value("VENTURE_OPENAI_BASE_URL") {
            openai.base_url = base_url;
        }
        openai.timeout = env_value("VENTURE_OPENAI_TIMEOUT_SECONDS")
            .and_then(|value| value.parse::<u64>().ok())
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs);

        let mongo = env_value("VENTURE_MONGO_URL")
            .or_else(|| env_value("MONGO_URL"))
            .map(|url| {
                let mut settings = MongoSettings::new(url);
                if let Some(database) = env_value("VENTURE_MONGO_DATABASE") {
                    settings.database = database;
                }
                if let Some(collection) = env_value("VENTURE_PLACES_COLLECTION") {
                    settings.collection = collection;
                }
                settings
            });

        let mut config = Self::new(openai);
        config.mongo = mongo;
        config.places_seed = env_value("VENTURE_PLACES_SEED").map(PathBuf::from);
        if let Some(bind) = env_value("VENTURE_BIND") {
            config.bind = bind;
        }
        if let Some(country) = env_value("VENTURE_DESTINATION_COUNTRY") {
            config.destination_country = country;
        }
        if let Some(origins) = env_value("VENTURE_ALLOWED_ORIGINS") {
            config.allowed_origins = parse_origins(&origins);
        }
        if let Some(limit) = env_value("VENTURE_MAX_BODY_BYTES").and_then(|v| v.parse::<usize>().ok()) {
            config.max_body_bytes = limit;
        }
        config.legacy_error_status = env_value("VENTURE_LEGACY_ERROR_STATUS")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Ok(config)
    }
}

fn env_value(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
