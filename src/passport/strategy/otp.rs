//! Time-based one-time-password second factor.
//!
//! The user has already passed a first factor. This strategy only decides
//! whether OTP applies to the user and hands the stored secret to `totp-rs`,
//! which owns code generation and the skew window.

use std::collections::HashMap;
use std::sync::Arc;
use totp_rs::{Algorithm, Secret, TOTP};
use tracing::{debug, instrument};

use crate::passport::{config::Config, error::AuthError, user::User};

pub const OTP_STRATEGY_NAME: &str = "otp";

#[derive(Clone, Debug)]
pub struct OtpStrategy {
    config: Arc<Config>,
}

impl OtpStrategy {
    pub(crate) fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        OTP_STRATEGY_NAME
    }

    /// Form field carrying the submitted code.
    #[must_use]
    pub fn code_field(&self) -> &str {
        &self.config.otp().code_field
    }

    /// Return the user's stored OTP secret.
    ///
    /// # Errors
    /// [`AuthError::OtpNotEnabled`] when the user's OTP flag is unset and
    /// [`AuthError::OtpTokenMissing`] when no secret is stored.
    pub fn setup(&self, user: &User) -> Result<String, AuthError> {
        let fields = self.config.fields();
        let phrases = self.config.phrases();

        if !user.is_truthy(&fields.otp_enabled) {
            return Err(AuthError::OtpNotEnabled(phrases.otp_not_enabled.clone()));
        }

        user.get_str(&fields.otp_token)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| AuthError::OtpTokenMissing(phrases.otp_token_missing.clone()))
    }

    /// Check `code` against the user's secret for the current time step.
    ///
    /// # Errors
    /// Everything [`OtpStrategy::setup`] returns, plus [`AuthError::Otp`] when the
    /// stored secret is not valid base32 or the clock is unusable.
    #[instrument(skip_all)]
    pub fn verify(&self, user: &User, code: &str) -> Result<bool, AuthError> {
        let secret = self.setup(user)?;
        let totp = self.totp(&secret, "user".to_string())?;
        let valid = totp
            .check_current(code.trim())
            .map_err(|e| AuthError::Otp(e.to_string()))?;
        debug!(valid, "otp code checked");
        Ok(valid)
    }

    /// Read the code from the submitted form and verify it.
    ///
    /// # Errors
    /// [`AuthError::OtpCodeMissing`] when the code field is absent or blank, then
    /// everything [`OtpStrategy::verify`] returns.
    pub fn authenticate(
        &self,
        user: &User,
        form: &HashMap<String, String>,
    ) -> Result<bool, AuthError> {
        let code = form
            .get(self.code_field())
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| {
                AuthError::OtpCodeMissing(self.config.phrases().otp_code_missing.clone())
            })?;
        self.verify(user, code)
    }

    /// Generate a fresh base32 secret for enrollment.
    ///
    /// # Errors
    /// Returns [`AuthError::Otp`] if the generated secret cannot be encoded.
    pub fn generate_secret() -> Result<String, AuthError> {
        match Secret::generate_secret().to_encoded() {
            Secret::Encoded(secret) => Ok(secret),
            Secret::Raw(_) => Err(AuthError::Otp("secret encoding failed".to_string())),
        }
    }

    /// `otpauth://` URL for authenticator apps.
    ///
    /// # Errors
    /// Returns [`AuthError::Otp`] for an invalid secret or an account containing `:`.
    pub fn provisioning_url(&self, secret: &str, account: &str) -> Result<String, AuthError> {
        Ok(self.totp(secret, account.to_string())?.get_url())
    }

    fn totp(&self, secret: &str, account: String) -> Result<TOTP, AuthError> {
        let otp = self.config.otp();
        let bytes = Secret::Encoded(secret.to_string())
            .to_bytes()
            .map_err(|e| AuthError::Otp(format!("invalid secret: {e:?}")))?;
        TOTP::new(
            Algorithm::SHA1,
            otp.digits,
            otp.window,
            otp.step,
            bytes,
            Some(otp.issuer.clone()),
            account,
        )
        .map_err(|e| AuthError::Otp(e.to_string()))
    }
}
