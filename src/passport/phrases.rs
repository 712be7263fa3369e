use serde::{Deserialize, Serialize};

/// User-facing messages attached to verification and configuration errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phrases {
    pub invalid_profile: String,
    pub invalid_email: String,
    pub consent_required: String,
    pub otp_not_enabled: String,
    pub otp_token_missing: String,
    pub otp_code_missing: String,
    pub no_first_factor: String,
    pub local_unsupported: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            invalid_profile: "Invalid profile".to_string(),
            invalid_email: "Invalid email address".to_string(),
            consent_required: "Consent required".to_string(),
            otp_not_enabled: "OTP authentication is not enabled".to_string(),
            otp_token_missing: "OTP token does not exist for validation".to_string(),
            otp_code_missing: "OTP code is missing".to_string(),
            no_first_factor: "No first factor authentication strategy enabled".to_string(),
            local_unsupported: "Local strategy enabled but Users cannot create one".to_string(),
        }
    }
}
