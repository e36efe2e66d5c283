use std::env;

/// Process configuration, read once at startup and injected through the
/// router state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub auth: AuthConfig,
}

/// Token issuance/verification and password hashing settings.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        Ok(Self {
            port: env_parsed("PORT", 3000),
            database_url,
            database_max_connections: env_parsed("DATABASE_MAX_CONNECTIONS", 10),
            auth: AuthConfig::from_env()?,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        if jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            jwt_secret,
            jwt_issuer: env_or("JWT_ISSUER", "asset-vault-api"),
            jwt_audience: env_or("JWT_AUDIENCE", "asset-vault-clients"),
            jwt_expiry_hours: env_parsed("JWT_EXPIRY_HOURS", 24),
            bcrypt_cost: env_parsed("BCRYPT_COST", 10),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
