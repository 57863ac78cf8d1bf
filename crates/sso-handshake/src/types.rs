//! SSO types — identity claims, flows, callback parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Verified user attributes extracted from an authenticated provider payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Provider flow a redirect URL is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SsoFlow {
    Login,
    Signup,
    Verify,
}

impl SsoFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for SsoFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SsoFlow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "login" => Ok(Self::Login),
            "signup" => Ok(Self::Signup),
            "verify" => Ok(Self::Verify),
            other => Err(format!("unknown SSO flow: {other}")),
        }
    }
}

/// Query parameters the provider sends back to the return URL.
///
/// Values are expected to be URL-decoded already, which is what query
/// extractors in web frameworks produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackParams {
    pub sso: String,
    pub sig: String,
}
