//! # authwire
//!
//! Strategy registrar for web authentication. One [`passport::Passport`] wires
//! Google, GitHub and Apple OAuth, a local username/password strategy and a TOTP
//! second factor over a pluggable [`passport::Users`] store.
//!
//! Provider profiles are normalized into one user record shape:
//!
//! 1. **Lookup:** by provider profile id, then by email for a first login with
//!    that provider, otherwise a new record.
//! 2. **Merge:** names and avatar are written once, tokens follow the provider.
//! 3. **Persist:** the record is saved only when something changed.
//!
//! Every attribute name is configurable through [`passport::Fields`], every
//! user-facing message through [`passport::Phrases`].

pub mod cli;
pub mod passport;

pub use passport::{AuthError, Passport, PassportOptions, Provider, User, Users};
