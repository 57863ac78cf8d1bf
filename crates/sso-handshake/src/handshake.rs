//! The SSO handshake: signed redirect URLs out, verified identity claims in.

use std::sync::Arc;

use reqwest::StatusCode;

use crate::config::SsoConfig;
use crate::error::SsoError;
use crate::nonce;
use crate::payload;
use crate::signature;
use crate::types::{CallbackParams, IdentityClaim, SsoFlow};

/// Builds signed provider redirect URLs and authenticates provider callbacks.
///
/// Cheap to clone; clones share the configuration and HTTP connection pool.
#[derive(Debug, Clone)]
pub struct SsoHandshake {
    config: Arc<SsoConfig>,
    http: reqwest::Client,
}

impl SsoHandshake {
    /// Create a handshake from a validated configuration and an HTTP client
    /// used for availability probes.
    pub fn new(config: SsoConfig, http: reqwest::Client) -> Result<Self, SsoError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    /// Create a handshake with a default HTTP client bounded by the
    /// configured availability timeout.
    pub fn from_config(config: SsoConfig) -> Result<Self, SsoError> {
        let http = reqwest::Client::builder()
            .timeout(config.availability_timeout)
            .build()
            .map_err(|e| SsoError::HttpClientInitFailed(e.to_string()))?;
        Self::new(config, http)
    }

    pub fn config(&self) -> &SsoConfig {
        &self.config
    }

    /// Probe the provider's login URL.
    ///
    /// Returns `true` only for a 200 response received within the configured
    /// timeout. Transport errors, timeouts and any other status yield `false`.
    pub async fn check_availability(&self) -> bool {
        let timeout = self.config.availability_timeout;
        let url = self.config.login_url.as_str();
        let request = self.http.get(url).timeout(timeout).send();

        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) if response.status() == StatusCode::OK => {
                tracing::debug!(url, "SSO provider available");
                true
            }
            Ok(Ok(response)) => {
                tracing::warn!(url, status = %response.status(), "SSO provider unavailable");
                false
            }
            Ok(Err(e)) => {
                tracing::warn!(url, error = %e, "SSO provider unreachable");
                false
            }
            Err(_) => {
                tracing::warn!(
                    url,
                    timeout_ms = timeout.as_millis() as u64,
                    "SSO provider availability check timed out"
                );
                false
            }
        }
    }

    /// Build a signed redirect URL for `flow` that sends the user back to
    /// `return_url` when the provider is done.
    ///
    /// The result has the form `<base>?sso=<payload>&sig=<hex hmac>` and needs
    /// no further encoding.
    pub fn build_redirect_url(&self, return_url: &str, flow: SsoFlow) -> Result<String, SsoError> {
        if return_url.trim().is_empty() {
            return Err(SsoError::MissingReturnUrl);
        }

        let nonce = nonce::generate_nonce();
        let encoded = payload::encode(&payload::build_outbound(return_url, &nonce));
        let sig = signature::sign(&self.config.shared_secret, &encoded);

        let base = self.config.url_for(flow);
        let separator = if base.contains('?') { '&' } else { '?' };
        let url = format!(
            "{base}{separator}sso={}&sig={sig}",
            urlencoding::encode(&encoded)
        );

        tracing::debug!(%flow, return_url, "built SSO redirect URL");
        Ok(url)
    }

    pub fn login_url(&self, return_url: &str) -> Result<String, SsoError> {
        self.build_redirect_url(return_url, SsoFlow::Login)
    }

    pub fn signup_url(&self, return_url: &str) -> Result<String, SsoError> {
        self.build_redirect_url(return_url, SsoFlow::Signup)
    }

    pub fn verify_url(&self, return_url: &str) -> Result<String, SsoError> {
        self.build_redirect_url(return_url, SsoFlow::Verify)
    }

    /// Verify a provider payload and extract the identity it asserts.
    ///
    /// `payload` is the `sso` query value (URL-decoded, still base64) and
    /// `signature` the `sig` value. Returns `None` when the signature does not
    /// match or the payload is malformed or incomplete; the two cases are
    /// indistinguishable to the caller.
    ///
    /// Nonces are not tracked, so a previously valid payload verifies again if
    /// replayed. Single use is left to the provider.
    pub fn authenticate(&self, payload: &str, signature: &str) -> Option<IdentityClaim> {
        if !signature::verify(&self.config.shared_secret, payload, signature) {
            tracing::debug!("SSO payload rejected: signature mismatch");
            return None;
        }

        let Some(plaintext) = payload::decode_inbound(payload) else {
            tracing::debug!("SSO payload rejected: undecodable");
            return None;
        };

        let fields = payload::parse_payload(&plaintext);
        let claim = payload::extract_claim(&fields);
        match &claim {
            Some(claim) => tracing::debug!(id = claim.id, username = %claim.username, "SSO payload authenticated"),
            None => tracing::debug!("SSO payload rejected: missing or invalid identity fields"),
        }
        claim
    }

    pub fn authenticate_callback(&self, params: &CallbackParams) -> Option<IdentityClaim> {
        self.authenticate(&params.sso, &params.sig)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_handshake() -> SsoHandshake {
        let config = SsoConfig::new(
            "https://idp.example.com/session/sso_provider",
            "https://idp.example.com/signup",
            "https://idp.example.com/verify?mode=email",
            "testsecret",
        );
        SsoHandshake::new(config, reqwest::Client::new()).unwrap()
    }

    fn signed(plaintext: &str) -> (String, String) {
        let encoded = payload::encode(plaintext);
        let sig = signature::sign("testsecret", &encoded);
        (encoded, sig)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SsoConfig::new("not a url", "https://a.b/c", "https://a.b/d", "s");
        let err = SsoHandshake::new(config, reqwest::Client::new()).unwrap_err();
        assert_eq!(err, SsoError::InvalidUrl { field: "login_url" });
    }

    #[test]
    fn test_build_redirect_url_shape() {
        let url = test_handshake()
            .build_redirect_url("https://app.example.com/callback", SsoFlow::Login)
            .unwrap();
        assert!(url.starts_with("https://idp.example.com/session/sso_provider?sso="));
        let sig = url.rsplit_once("&sig=").unwrap().1;
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn test_build_redirect_url_per_flow() {
        let hs = test_handshake();
        assert!(hs.signup_url("https://app.example.com").unwrap().starts_with("https://idp.example.com/signup?sso="));
        assert!(hs.verify_url("https://app.example.com").unwrap().starts_with("https://idp.example.com/verify?mode=email&sso="));
    }

    #[test]
    fn test_build_redirect_url_empty_return_url() {
        let hs = test_handshake();
        assert_eq!(hs.login_url(""), Err(SsoError::MissingReturnUrl));
        assert_eq!(hs.login_url("   "), Err(SsoError::MissingReturnUrl));
    }

    #[test]
    fn test_redirect_url_never_contains_secret() {
        let url = test_handshake().login_url("https://app.example.com").unwrap();
        assert!(!url.contains("testsecret"));
    }

    #[test]
    fn test_authenticate_valid() {
        let (payload, sig) = signed("external_id=42&username=alice&email=alice@example.com");
        let claim = test_handshake().authenticate(&payload, &sig).unwrap();
        assert_eq!(claim.id, 42);
        assert_eq!(claim.username, "alice");
    }

    #[test]
    fn test_authenticate_bad_signature() {
        let (payload, _) = signed("external_id=42&username=alice&email=alice@example.com");
        assert!(test_handshake().authenticate(&payload, "deadbeef").is_none());
    }

    #[test]
    fn test_authenticate_signed_garbage() {
        let garbage = "%%%not-base64%%%";
        let sig = signature::sign("testsecret", garbage);
        assert!(test_handshake().authenticate(garbage, &sig).is_none());
    }

    #[test]
    fn test_authenticate_callback() {
        let (sso, sig) = signed("external_id=7&username=bob&email=bob@example.com");
        let claim = test_handshake()
            .authenticate_callback(&CallbackParams { sso, sig })
            .unwrap();
        assert_eq!(claim.id, 7);
    }
}
