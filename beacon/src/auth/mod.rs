//! Authentication system.
//!
//! Bearer-token authentication for the write routes:
//!
//! - Callers log in via `POST /api/login` with the configured username/password
//!   pair and receive a signed token.
//! - The token is passed in `Authorization: Bearer <token>` on protected routes.
//! - Tokens are stateless JWTs verified per request against the signing secret;
//!   nothing is persisted.
//!
//! The login check is intentionally a stand-in for real identity: it is hidden
//! behind the [`verifier::CredentialVerifier`] trait so a real backend can be
//! substituted without touching the pipeline.
//!
//! The pipeline distinguishes a *missing* credential (401 `Token required`)
//! from an *invalid or expired* one (403 `Invalid token`); see
//! [`current_user::CurrentUser`].
//!
//! # Modules
//!
//! - [`current_user`]: Extractor for getting the authenticated subject in handlers
//! - [`token`]: Token creation and verification
//! - [`verifier`]: Pluggable login credential verification

pub mod current_user;
pub mod token;
pub mod verifier;
