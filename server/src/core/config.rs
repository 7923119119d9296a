use crate::auth::JwtConfig;

/// Server configuration, read from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the embedded database
    pub work_dir: String,
    pub http_port: u16,
    pub jwt: JwtConfig,
    pub environment: String,
    /// Business identity stamped on invoices and customer messages when a
    /// tailor account has no shop name of its own
    pub default_shop_name: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/kstitch".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            default_shop_name: std::env::var("SHOP_NAME")
                .unwrap_or_else(|_| "KStitch Tailors".into()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
