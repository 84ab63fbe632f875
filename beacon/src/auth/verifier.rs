//! Pluggable login credential verification.

use crate::{
    config::LoginConfig,
    errors::{Error, Result},
};

/// Verifies a login pair and yields the authenticated subject.
///
/// The pipeline only ever talks to this trait, so swapping in a real identity
/// backend is a matter of providing another implementation to
/// [`crate::AppState`].
pub trait CredentialVerifier: Send + Sync {
    /// Returns the authenticated subject on success
    fn verify(&self, username: &str, password: &str) -> Result<String>;
}

/// Default verifier: a single fixed username/password pair from configuration.
pub struct FixedCredentialVerifier {
    username: String,
    password: String,
}

impl FixedCredentialVerifier {
    pub fn new(config: &LoginConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
        }
    }
}

impl CredentialVerifier for FixedCredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> Result<String> {
        if username == self.username && password == self.password {
            Ok(username.to_string())
        } else {
            Err(Error::Unauthenticated {
                message: "Invalid username or password".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_verifier() -> FixedCredentialVerifier {
        FixedCredentialVerifier::new(&LoginConfig {
            username: "admin".to_string(),
            password: "hunter2".to_string(),
        })
    }

    #[test]
    fn test_accepts_configured_pair() {
        let verifier = test_verifier();
        assert_eq!(verifier.verify("admin", "hunter2").unwrap(), "admin");
    }

    #[test]
    fn test_rejects_any_other_pair() {
        let verifier = test_verifier();
        for (username, password) in [
            ("admin", "wrong"),
            ("someone", "hunter2"),
            ("", ""),
            ("ADMIN", "hunter2"),
        ] {
            let result = verifier.verify(username, password);
            assert!(
                matches!(result.unwrap_err(), Error::Unauthenticated { .. }),
                "expected rejection for {username}/{password}"
            );
        }
    }
}
