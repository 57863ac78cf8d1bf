//! SSO error codes.
//!
//! Only caller misuse and configuration faults are errors. An unreachable
//! provider is reported as `false` by the availability probe, and a forged or
//! malformed payload is reported as `None` by authentication.

/// SSO handshake error codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SsoError {
    #[error("MISSING_RETURN_URL: Return URL is required")]
    MissingReturnUrl,
    #[error("INVALID_URL: `{field}` must be an absolute http(s) URL")]
    InvalidUrl { field: &'static str },
    #[error("MISSING_SECRET: Shared secret must not be empty")]
    MissingSecret,
    #[error("MISSING_ENV: Environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("INVALID_CONFIGURATION: {0}")]
    InvalidConfiguration(String),
    #[error("HTTP_CLIENT_INIT_FAILED: {0}")]
    HttpClientInitFailed(String),
}

impl SsoError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingReturnUrl => "MISSING_RETURN_URL",
            Self::InvalidUrl { .. } => "INVALID_URL",
            Self::MissingSecret => "MISSING_SECRET",
            Self::MissingEnv(_) => "MISSING_ENV",
            Self::InvalidConfiguration(_) => "INVALID_CONFIGURATION",
            Self::HttpClientInitFailed(_) => "HTTP_CLIENT_INIT_FAILED",
        }
    }

    /// Human-readable text, the part of the `Display` output after the code.
    pub fn message(&self) -> String {
        match self {
            Self::MissingReturnUrl => "Return URL is required".to_string(),
            Self::InvalidUrl { field } => format!("`{field}` must be an absolute http(s) URL"),
            Self::MissingSecret => "Shared secret must not be empty".to_string(),
            Self::MissingEnv(name) => format!("Environment variable {name} is not set"),
            Self::InvalidConfiguration(reason) => reason.clone(),
            Self::HttpClientInitFailed(reason) => reason.clone(),
        }
    }
}
