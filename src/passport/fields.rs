//! Logical user attributes mapped to the caller's storage keys.
//!
//! The registrar never hardcodes a column or document key. Every read and write
//! goes through [`Fields`], so the host application keeps control of its schema.
//! Deserializing a partial mapping keeps the defaults for every key left out.

use serde::{Deserialize, Serialize};

use super::provider::Provider;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fields {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub given_name: String,
    pub family_name: String,
    pub avatar_url: String,
    pub google_profile_id: String,
    pub google_access_token: String,
    pub google_refresh_token: String,
    pub github_profile_id: String,
    pub github_access_token: String,
    pub github_refresh_token: String,
    pub apple_profile_id: String,
    pub apple_access_token: String,
    pub apple_refresh_token: String,
    pub otp_enabled: String,
    pub otp_token: String,
    /// `None` turns off last-login tracking.
    pub last_login_at: Option<String>,
}

impl Default for Fields {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            email: "email".to_string(),
            display_name: "display_name".to_string(),
            given_name: "given_name".to_string(),
            family_name: "family_name".to_string(),
            avatar_url: "avatar_url".to_string(),
            google_profile_id: "google_profile_id".to_string(),
            google_access_token: "google_access_token".to_string(),
            google_refresh_token: "google_refresh_token".to_string(),
            github_profile_id: "github_profile_id".to_string(),
            github_access_token: "github_access_token".to_string(),
            github_refresh_token: "github_refresh_token".to_string(),
            apple_profile_id: "apple_profile_id".to_string(),
            apple_access_token: "apple_access_token".to_string(),
            apple_refresh_token: "apple_refresh_token".to_string(),
            otp_enabled: "otp_enabled".to_string(),
            otp_token: "otp_token".to_string(),
            last_login_at: Some("last_login_at".to_string()),
        }
    }
}

impl Fields {
    #[must_use]
    pub fn profile_id(&self, provider: Provider) -> &str {
        match provider {
            Provider::Google => &self.google_profile_id,
            Provider::Github => &self.github_profile_id,
            Provider::Apple => &self.apple_profile_id,
        }
    }

    #[must_use]
    pub fn access_token(&self, provider: Provider) -> &str {
        match provider {
            Provider::Google => &self.google_access_token,
            Provider::Github => &self.github_access_token,
            Provider::Apple => &self.apple_access_token,
        }
    }

    #[must_use]
    pub fn refresh_token(&self, provider: Provider) -> &str {
        match provider {
            Provider::Google => &self.google_refresh_token,
            Provider::Github => &self.github_refresh_token,
            Provider::Apple => &self.apple_refresh_token,
        }
    }

    /// Storage keys for the set-once name attributes, paired with the profile
    /// attribute they are filled from.
    pub(crate) fn name_fields(&self) -> [(&str, NameAttr); 3] {
        [
            (&self.display_name, NameAttr::Display),
            (&self.given_name, NameAttr::Given),
            (&self.family_name, NameAttr::Family),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NameAttr {
    Display,
    Given,
    Family,
}
