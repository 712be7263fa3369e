use thiserror::Error;

/// Errors surfaced by the registrar, its strategies and session hooks.
///
/// User-facing variants carry the configured phrase so the host application can
/// show the message as is. Collaborator failures are kept as [`anyhow::Error`] and
/// propagate unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    InvalidProfile(String),
    #[error("{0}")]
    InvalidEmail(String),
    #[error("{0}")]
    ConsentRequired(String),
    #[error("{0}")]
    OtpNotEnabled(String),
    #[error("{0}")]
    OtpTokenMissing(String),
    #[error("{0}")]
    OtpCodeMissing(String),
    #[error("otp validation failed: {0}")]
    Otp(String),
    #[error("session error: {0}")]
    Session(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl AuthError {
    /// Stable machine-readable code for the variant.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::InvalidProfile(_) => "invalid_profile",
            Self::InvalidEmail(_) => "invalid_email",
            Self::ConsentRequired(_) => "consent_required",
            Self::OtpNotEnabled(_) => "otp_not_enabled",
            Self::OtpTokenMissing(_) => "otp_token_missing",
            Self::OtpCodeMissing(_) => "otp_code_missing",
            Self::Otp(_) => "otp",
            Self::Session(_) => "session",
            Self::Store(_) => "store",
        }
    }

    /// True when the caller should send the user through a consent-forcing
    /// re-authorization instead of treating this as a failed login.
    #[must_use]
    pub fn is_consent_required(&self) -> bool {
        matches!(self, Self::ConsentRequired(_))
    }
}
