//! OAuth2 provider strategies (Google, GitHub, Apple).
//!
//! Flow for a provider callback:
//! 1) Reject profiles without a provider id.
//! 2) Find the user by provider profile id; fall back to email for a first login
//!    with this provider; otherwise create a new record (requires an email).
//! 3) Merge profile data (see [`super::merge`]) and save only if something changed.
//! 4) Google logins without a refresh token fail with `consent_required` so the
//!    caller can redirect through a consent-forcing authorization.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use url::Url;

use super::merge::{merge_profile, Tokens};
use crate::passport::{
    config::{Config, OAuthConfig},
    error::AuthError,
    profile::Profile,
    provider::Provider,
    store::{Query, Users},
    user::User,
};

#[derive(Clone)]
pub struct OAuthStrategy {
    settings: OAuthConfig,
    config: Arc<Config>,
    users: Arc<dyn Users>,
}

impl OAuthStrategy {
    pub(crate) fn new(settings: OAuthConfig, config: Arc<Config>, users: Arc<dyn Users>) -> Self {
        Self {
            settings,
            config,
            users,
        }
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.settings.provider
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.settings.provider.as_str()
    }

    #[must_use]
    pub fn settings(&self) -> &OAuthConfig {
        &self.settings
    }

    /// Verify a provider callback and return the persisted user.
    ///
    /// # Errors
    /// - [`AuthError::InvalidProfile`] when the profile is missing or has no id;
    /// - [`AuthError::InvalidEmail`] when a new user would be created without a
    ///   valid email;
    /// - [`AuthError::ConsentRequired`] for Google logins without a refresh token;
    /// - [`AuthError::Store`] when the `Users` collaborator fails.
    pub async fn verify(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
        profile: Option<&Profile>,
    ) -> Result<User, AuthError> {
        self.verify_at(access_token, refresh_token, profile, Utc::now())
            .await
    }

    #[instrument(skip_all, fields(provider = %self.provider()))]
    async fn verify_at(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
        profile: Option<&Profile>,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        let provider = self.provider();
        let fields = self.config.fields();
        let phrases = self.config.phrases();

        let Some(profile) = profile else {
            return Err(AuthError::InvalidProfile(phrases.invalid_profile.clone()));
        };
        let Some(profile_id) = profile.provider_id() else {
            return Err(AuthError::InvalidProfile(phrases.invalid_profile.clone()));
        };
        let email = profile.email_for(provider);

        let by_profile = Query::new(fields.profile_id(provider), profile_id);
        let (mut user, created) = match self.users.find_one(&by_profile).await? {
            Some(user) => (user, false),
            None => {
                let by_email = match email {
                    Some(email) => self.users.find_one(&Query::new(&fields.email, email)).await?,
                    None => None,
                };
                match by_email {
                    Some(user) => {
                        debug!("adopting existing user matched by email");
                        (user, false)
                    }
                    None => {
                        let Some(email) = email else {
                            return Err(AuthError::InvalidEmail(phrases.invalid_email.clone()));
                        };
                        let mut user = User::new();
                        user.set(&fields.email, email);
                        (user, true)
                    }
                }
            }
        };

        let tokens = Tokens::new(access_token, refresh_token);
        let changed = merge_profile(&mut user, provider, profile_id, profile, tokens, fields, now);

        if created || changed {
            user = self.users.save(&user).await?;
            if created {
                info!("created user on first {provider} login");
            }
        } else {
            debug!("profile unchanged, skipping save");
        }

        if provider == Provider::Google && tokens.refresh.is_none() {
            return Err(AuthError::ConsentRequired(phrases.consent_required.clone()));
        }

        Ok(user)
    }

    /// Build the provider authorization redirect.
    ///
    /// `force_consent` asks the provider to prompt the user again; for Google this
    /// is the way to obtain a new refresh token after a `consent_required` error.
    ///
    /// # Errors
    /// Returns [`AuthError::Config`] if the authorization endpoint cannot be parsed.
    pub fn authorization_url(&self, state: &str, force_consent: bool) -> Result<Url, AuthError> {
        let mut url = Url::parse(self.provider().auth_url())
            .map_err(|e| AuthError::Config(format!("invalid authorization endpoint: {e}")))?;

        let settings = &self.settings;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &settings.client_id)
                .append_pair("redirect_uri", settings.callback_url.as_str());

            if !settings.scope.is_empty() {
                query.append_pair("scope", &settings.scope.join(" "));
            }
            query.append_pair("state", state);

            let access_type = match (self.provider(), force_consent) {
                (Provider::Google, true) => Some("offline"),
                _ => settings.access_type.as_deref(),
            };
            if let Some(access_type) = access_type {
                query.append_pair("access_type", access_type);
            }

            let prompt = if force_consent {
                Some("consent")
            } else {
                settings.prompt.as_deref()
            };
            if let Some(prompt) = prompt {
                query.append_pair("prompt", prompt);
            }

            // Apple only returns name and email to a form_post callback.
            if self.provider() == Provider::Apple && !settings.scope.is_empty() {
                query.append_pair("response_mode", "form_post");
            }
        }

        Ok(url)
    }
}
