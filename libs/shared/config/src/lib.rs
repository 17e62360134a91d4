use std::env;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let config = Self {
            base_url: env::var("HOSPITAL_API_URL").unwrap_or_else(|_| {
                warn!("HOSPITAL_API_URL not set, using default");
                DEFAULT_API_URL.to_string()
            }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}
