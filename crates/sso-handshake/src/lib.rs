//! # sso-handshake
//!
//! Signed single-sign-on handshake with an external identity provider.
//!
//! Provides:
//! - Signed redirect URLs for the login, signup and verify flows
//! - Verification of signed provider payloads into an identity claim
//! - A bounded-time availability probe against the provider
//! - Configuration loading and validation

pub mod config;
pub mod env;
pub mod error;
pub mod handshake;
pub mod nonce;
pub mod payload;
pub mod signature;
pub mod types;

pub use config::*;
pub use error::*;
pub use handshake::SsoHandshake;
pub use types::*;
