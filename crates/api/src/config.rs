//! Environment-driven configuration for whatever binds the API.

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Token lifetime in minutes.
    pub token_lifetime_minutes: i64,
}

impl ApiConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let token_lifetime_minutes = std::env::var("JWT_LIFETIME_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Self {
            jwt_secret,
            token_lifetime_minutes,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret".to_string(),
            token_lifetime_minutes: 60,
        }
    }
}
