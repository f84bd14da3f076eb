//! PKCE (RFC 7636) proof key for the authorization code exchange.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha256};

/// Length of generated code verifiers.
const VERIFIER_LEN: usize = 64;

/// The only challenge method we send.
const METHOD: &str = "S256";

/// PKCE code verifier and its derived challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkceChallenge {
    verifier: String,
    challenge: String,
}

impl PkceChallenge {
    /// Generates a fresh random verifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_verifier(random_string(VERIFIER_LEN))
    }

    /// Builds the challenge for a known verifier.
    #[must_use]
    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }

    /// The secret sent with the token request.
    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// The value sent with the authorization request.
    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// Challenge method, always `S256`.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        METHOD
    }
}

/// Random alphanumeric string, used for verifiers and `state` values.
pub(crate) fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc7636_appendix_b() {
        let pkce = PkceChallenge::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(pkce.challenge(), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
        assert_eq!(pkce.method(), "S256");
    }

    #[test]
    fn test_generated_verifier_shape() {
        let pkce = PkceChallenge::generate();
        assert_eq!(pkce.verifier().len(), VERIFIER_LEN);
        assert!(pkce.verifier().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(pkce, PkceChallenge::from_verifier(pkce.verifier()));
    }

    #[test]
    fn test_generations_differ() {
        assert_ne!(PkceChallenge::generate(), PkceChallenge::generate());
    }
}
