use std::{fmt, num::NonZeroU32, sync::Arc};

use zeroize::Zeroizing;

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_RATE_LIMIT: u32 = 1000;

/// Credential that gates the schema admin endpoints.
#[derive(Clone)]
pub struct AdminSecret(Arc<Zeroizing<String>>);

impl AdminSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Arc::new(Zeroizing::new(secret.into())))
    }

    /// Constant-time comparison against a presented credential.
    pub fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminSecret(..)")
    }
}

fn constant_time_eq(expected: &[u8], candidate: &[u8]) -> bool {
    if expected.len() != candidate.len() {
        return false;
    }

    expected
        .iter()
        .zip(candidate)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[derive(Debug, Clone)]
pub struct Config {
    /// `None` runs the service on the in-memory store.
    pub redis_url: Option<String>,
    pub port: u16,
    pub admin_secret: AdminSecret,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: NonZeroU32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let admin_secret = lookup("ADMIN_SECRET")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::EnvError("ADMIN_SECRET must be set".into()))?;

        let redis_url = lookup("REDIS_URL").filter(|s| !s.trim().is_empty());

        let port = match lookup("PORT") {
            Some(port) => port
                .parse::<u16>()
                .map_err(|_| AppError::EnvError(format!("Invalid PORT: {port}")))?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let rate_limit_per_minute = match lookup("RATE_LIMIT_PER_MINUTE") {
            Some(limit) => limit
                .parse::<NonZeroU32>()
                .map_err(|_| AppError::EnvError(format!("Invalid RATE_LIMIT_PER_MINUTE: {limit}")))?,
            None => NonZeroU32::new(DEFAULT_RATE_LIMIT).ok_or(AppError::InternalError)?,
        };

        Ok(Self {
            redis_url,
            port,
            admin_secret: AdminSecret::new(admin_secret),
            allowed_origins,
            rate_limit_per_minute,
        })
    }
}
