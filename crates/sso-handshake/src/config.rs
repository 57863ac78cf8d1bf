//! SSO configuration.

use crate::error::SsoError;
use crate::types::SsoFlow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

const DEFAULT_AVAILABILITY_TIMEOUT_MS: u64 = 5_000;

/// Handshake configuration, loaded once at startup and read-only afterwards.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsoConfig {
    /// Provider endpoint for the login flow. Also probed for availability.
    pub login_url: String,
    /// Provider endpoint for the signup flow.
    pub signup_url: String,
    /// Provider endpoint for the verify flow.
    pub verify_url: String,
    /// Key material shared with the provider for HMAC-SHA256 signing.
    pub shared_secret: String,
    /// Upper bound on the availability probe.
    #[serde(
        rename = "availabilityTimeoutMs",
        with = "duration_ms",
        default = "default_availability_timeout"
    )]
    pub availability_timeout: Duration,
}

fn default_availability_timeout() -> Duration {
    Duration::from_millis(DEFAULT_AVAILABILITY_TIMEOUT_MS)
}

impl SsoConfig {
    pub fn new(
        login_url: impl Into<String>,
        signup_url: impl Into<String>,
        verify_url: impl Into<String>,
        shared_secret: impl Into<String>,
    ) -> Self {
        Self {
            login_url: login_url.into(),
            signup_url: signup_url.into(),
            verify_url: verify_url.into(),
            shared_secret: shared_secret.into(),
            availability_timeout: default_availability_timeout(),
        }
    }

    pub fn with_availability_timeout(mut self, timeout: Duration) -> Self {
        self.availability_timeout = timeout;
        self
    }

    /// Load configuration from `SSO_LOGIN_URL`, `SSO_SIGNUP_URL`,
    /// `SSO_VERIFY_URL`, `SSO_SECRET` and the optional
    /// `SSO_AVAILABILITY_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, SsoError> {
        fn required(name: &'static str) -> Result<String, SsoError> {
            std::env::var(name).map_err(|_| SsoError::MissingEnv(name))
        }

        let availability_timeout = match std::env::var("SSO_AVAILABILITY_TIMEOUT_MS") {
            Ok(raw) => raw.trim().parse::<u64>().map(Duration::from_millis).map_err(|_| {
                SsoError::InvalidConfiguration(format!(
                    "SSO_AVAILABILITY_TIMEOUT_MS is not a number of milliseconds: {raw}"
                ))
            })?,
            Err(_) => default_availability_timeout(),
        };

        let config = Self {
            login_url: required("SSO_LOGIN_URL")?,
            signup_url: required("SSO_SIGNUP_URL")?,
            verify_url: required("SSO_VERIFY_URL")?,
            shared_secret: required("SSO_SECRET")?,
            availability_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every provider URL is absolute, the secret is set, and the
    /// probe timeout is non-zero.
    pub fn validate(&self) -> Result<(), SsoError> {
        validate_absolute_url("login_url", &self.login_url)?;
        validate_absolute_url("signup_url", &self.signup_url)?;
        validate_absolute_url("verify_url", &self.verify_url)?;
        if self.shared_secret.is_empty() {
            return Err(SsoError::MissingSecret);
        }
        if self.availability_timeout.is_zero() {
            return Err(SsoError::InvalidConfiguration(
                "availability timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Provider base URL for a flow.
    pub fn url_for(&self, flow: SsoFlow) -> &str {
        match flow {
            SsoFlow::Login => &self.login_url,
            SsoFlow::Signup => &self.signup_url,
            SsoFlow::Verify => &self.verify_url,
        }
    }
}

fn validate_absolute_url(field: &'static str, value: &str) -> Result<(), SsoError> {
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(SsoError::InvalidUrl { field }),
    }
}

impl fmt::Debug for SsoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SsoConfig")
            .field("login_url", &self.login_url)
            .field("signup_url", &self.signup_url)
            .field("verify_url", &self.verify_url)
            .field("shared_secret", &"[redacted]")
            .field("availability_timeout", &self.availability_timeout)
            .finish()
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
