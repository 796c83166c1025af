use std::env;

#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub auth_token: String,
    pub session_db: String,
    pub currency: String,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("STUDIO_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000/api".to_string()),
            auth_token: env::var("STUDIO_AUTH_TOKEN").unwrap_or_default(),
            session_db: env::var("SESSION_DB").unwrap_or_else(|_| "studiobook.db".to_string()),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "D".to_string()),
        }
    }
}
