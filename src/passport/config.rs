//! Caller options, environment defaults and the resolved configuration.
//!
//! [`PassportOptions`] is what the caller hands in: every leaf is optional and the
//! whole tree deserializes from a partial JSON document. [`Config::resolve`] fills
//! each leaf the caller left out from the environment (or a built-in default) and
//! returns an immutable [`Config`] shared by every strategy.
//!
//! Merge rules:
//! - caller values always win over environment values;
//! - nested sections merge key by key;
//! - lists (scopes) are replaced wholesale, never concatenated.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

use super::{
    error::AuthError, fields::Fields, phrases::Phrases, provider::Provider, utils::env_bool,
};

pub const ENV_LOCAL_ENABLED: &str = "AUTH_LOCAL_ENABLED";
pub const ENV_OTP_ENABLED: &str = "AUTH_OTP_ENABLED";
pub const ENV_OTP_CODE_FIELD: &str = "AUTH_OTP_CODE_FIELD";
pub const ENV_OTP_STEP: &str = "AUTH_OTP_STEP";
pub const ENV_OTP_WINDOW: &str = "AUTH_OTP_WINDOW";
pub const ENV_OTP_DIGITS: &str = "AUTH_OTP_DIGITS";
pub const ENV_OTP_ISSUER: &str = "AUTH_OTP_ISSUER";

const DEFAULT_OTP_CODE_FIELD: &str = "passcode";
const DEFAULT_OTP_STEP: u64 = 30;
const DEFAULT_OTP_WINDOW: u8 = 1;
const DEFAULT_OTP_DIGITS: usize = 6;
const OTP_DIGITS: std::ops::RangeInclusive<usize> = 6..=8;

const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];
const GITHUB_SCOPES: [&str; 1] = ["user:email"];
const APPLE_SCOPES: [&str; 2] = ["name", "email"];

/// Which user attribute identifies a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKey {
    #[default]
    Id,
    Email,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PassportOptions {
    pub providers: ProviderToggles,
    pub strategies: StrategyOptions,
    pub otp: OtpOptions,
    pub fields: Fields,
    pub phrases: Phrases,
    pub session_key: Option<SessionKey>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProviderToggles {
    pub local: Option<bool>,
    pub google: Option<bool>,
    pub github: Option<bool>,
    pub apple: Option<bool>,
    pub otp: Option<bool>,
}

impl ProviderToggles {
    fn oauth(&self, provider: Provider) -> Option<bool> {
        match provider {
            Provider::Google => self.google,
            Provider::Github => self.github,
            Provider::Apple => self.apple,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StrategyOptions {
    pub google: OAuthOptions,
    pub github: OAuthOptions,
    pub apple: OAuthOptions,
}

impl StrategyOptions {
    fn get(&self, provider: Provider) -> &OAuthOptions {
        match provider {
            Provider::Google => &self.google,
            Provider::Github => &self.github,
            Provider::Apple => &self.apple,
        }
    }
}

/// Per-provider OAuth client settings. The Apple-only keys are ignored elsewhere.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OAuthOptions {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
    pub scope: Option<Vec<String>>,
    pub access_type: Option<String>,
    pub prompt: Option<String>,
    pub team_id: Option<String>,
    pub key_id: Option<String>,
    pub private_key: Option<String>,
    pub private_key_path: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OtpOptions {
    pub code_field: Option<String>,
    pub step: Option<u64>,
    pub window: Option<u8>,
    pub digits: Option<usize>,
    pub issuer: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Providers {
    pub local: bool,
    pub google: bool,
    pub github: bool,
    pub apple: bool,
    pub otp: bool,
}

impl Providers {
    #[must_use]
    pub fn oauth(&self, provider: Provider) -> bool {
        match provider {
            Provider::Google => self.google,
            Provider::Github => self.github,
            Provider::Apple => self.apple,
        }
    }

    /// True when at least one method usable before the OTP step is enabled.
    #[must_use]
    pub fn has_first_factor(&self) -> bool {
        self.local || self.google || self.github || self.apple
    }
}

/// Signing material for Apple's client secret.
#[derive(Clone, Debug)]
pub struct AppleKey {
    pub team_id: String,
    pub key_id: String,
    pub private_key: SecretString,
}

#[derive(Clone, Debug)]
pub struct OAuthConfig {
    pub provider: Provider,
    pub client_id: String,
    pub client_secret: SecretString,
    pub callback_url: Url,
    pub scope: Vec<String>,
    pub access_type: Option<String>,
    pub prompt: Option<String>,
    pub apple: Option<AppleKey>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpConfig {
    pub code_field: String,
    pub step: u64,
    pub window: u8,
    pub digits: usize,
    pub issuer: String,
}

/// Fully resolved, immutable configuration.
#[derive(Clone, Debug)]
pub struct Config {
    providers: Providers,
    oauth: BTreeMap<Provider, OAuthConfig>,
    otp: OtpConfig,
    fields: Fields,
    phrases: Phrases,
    session_key: SessionKey,
}

impl Config {
    /// Resolve `options` against the process environment.
    ///
    /// # Errors
    /// Returns [`AuthError::Config`] if an enabled provider is missing required
    /// settings, a numeric variable does not parse, or OTP has no first factor.
    pub fn resolve(options: PassportOptions) -> Result<Self, AuthError> {
        Self::resolve_with(options, |key| std::env::var(key).ok())
    }

    /// Resolve `options` against an arbitrary variable source.
    ///
    /// # Errors
    /// Same as [`Config::resolve`].
    pub fn resolve_with<E>(options: PassportOptions, env: E) -> Result<Self, AuthError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let flag = |value: Option<bool>, key: &str| {
            value.unwrap_or_else(|| env(key).is_some_and(|v| env_bool(&v)))
        };

        let providers = Providers {
            local: flag(options.providers.local, ENV_LOCAL_ENABLED),
            google: flag(
                options.providers.oauth(Provider::Google),
                Provider::Google.enabled_env(),
            ),
            github: flag(
                options.providers.oauth(Provider::Github),
                Provider::Github.enabled_env(),
            ),
            apple: flag(
                options.providers.oauth(Provider::Apple),
                Provider::Apple.enabled_env(),
            ),
            otp: flag(options.providers.otp, ENV_OTP_ENABLED),
        };

        if providers.otp && !providers.has_first_factor() {
            return Err(AuthError::Config(options.phrases.no_first_factor.clone()));
        }

        let mut oauth = BTreeMap::new();
        for provider in Provider::ALL {
            if providers.oauth(provider) {
                let resolved = resolve_oauth(provider, options.strategies.get(provider), &env)?;
                oauth.insert(provider, resolved);
            }
        }

        let otp = resolve_otp(&options.otp, &env)?;

        debug!(
            local = providers.local,
            google = providers.google,
            github = providers.github,
            apple = providers.apple,
            otp = providers.otp,
            "resolved providers"
        );

        Ok(Self {
            providers,
            oauth,
            otp,
            fields: options.fields,
            phrases: options.phrases,
            session_key: options.session_key.unwrap_or_default(),
        })
    }

    #[must_use]
    pub fn providers(&self) -> Providers {
        self.providers
    }

    /// OAuth settings for `provider`, present only when it is enabled.
    #[must_use]
    pub fn oauth(&self, provider: Provider) -> Option<&OAuthConfig> {
        self.oauth.get(&provider)
    }

    #[must_use]
    pub fn otp(&self) -> &OtpConfig {
        &self.otp
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[must_use]
    pub fn phrases(&self) -> &Phrases {
        &self.phrases
    }

    #[must_use]
    pub fn session_key(&self) -> SessionKey {
        self.session_key
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn resolve_oauth<E>(
    provider: Provider,
    options: &OAuthOptions,
    env: &E,
) -> Result<OAuthConfig, AuthError>
where
    E: Fn(&str) -> Option<String>,
{
    let prefix = provider.env_prefix();
    let setting = |value: &Option<String>, suffix: &str| {
        non_empty(value.clone()).or_else(|| non_empty(env(&format!("{prefix}_{suffix}"))))
    };

    let client_id = setting(&options.client_id, "CLIENT_ID")
        .ok_or_else(|| AuthError::Config(format!("{prefix}_CLIENT_ID is required for {provider}")))?;

    let callback = setting(&options.callback_url, "CALLBACK_URL").ok_or_else(|| {
        AuthError::Config(format!("{prefix}_CALLBACK_URL is required for {provider}"))
    })?;
    let callback_url = Url::parse(&callback)
        .map_err(|e| AuthError::Config(format!("invalid {provider} callback URL: {e}")))?;

    let client_secret = SecretString::from(
        setting(&options.client_secret, "CLIENT_SECRET").unwrap_or_default(),
    );

    let defaults: &[&str] = match provider {
        Provider::Google => &GOOGLE_SCOPES,
        Provider::Github => &GITHUB_SCOPES,
        Provider::Apple => &APPLE_SCOPES,
    };
    let scope = options
        .scope
        .clone()
        .unwrap_or_else(|| defaults.iter().map(ToString::to_string).collect());

    let (access_type, prompt) = match provider {
        Provider::Google => (
            Some(options.access_type.clone().unwrap_or_else(|| "offline".to_string())),
            Some(options.prompt.clone().unwrap_or_else(|| "consent".to_string())),
        ),
        Provider::Github | Provider::Apple => (options.access_type.clone(), options.prompt.clone()),
    };

    let apple = match provider {
        Provider::Apple => Some(resolve_apple_key(options, env)?),
        Provider::Google | Provider::Github => None,
    };

    Ok(OAuthConfig {
        provider,
        client_id,
        client_secret,
        callback_url,
        scope,
        access_type,
        prompt,
        apple,
    })
}

fn resolve_apple_key<E>(options: &OAuthOptions, env: &E) -> Result<AppleKey, AuthError>
where
    E: Fn(&str) -> Option<String>,
{
    let required = |value: &Option<String>, key: &str| {
        non_empty(value.clone())
            .or_else(|| non_empty(env(key)))
            .ok_or_else(|| AuthError::Config(format!("{key} is required for apple")))
    };

    let team_id = required(&options.team_id, "APPLE_TEAM_ID")?;
    let key_id = required(&options.key_id, "APPLE_KEY_ID")?;

    let inline = non_empty(options.private_key.clone()).or_else(|| non_empty(env("APPLE_PRIVATE_KEY")));
    let private_key = match inline {
        Some(key) => key,
        None => {
            let path = options
                .private_key_path
                .clone()
                .or_else(|| non_empty(env("APPLE_PRIVATE_KEY_PATH")).map(PathBuf::from))
                .ok_or_else(|| {
                    AuthError::Config(
                        "APPLE_PRIVATE_KEY or APPLE_PRIVATE_KEY_PATH is required for apple"
                            .to_string(),
                    )
                })?;
            std::fs::read_to_string(&path).map_err(|e| {
                AuthError::Config(format!(
                    "failed to read apple private key {}: {e}",
                    path.display()
                ))
            })?
        }
    };

    Ok(AppleKey {
        team_id,
        key_id,
        private_key: SecretString::from(private_key),
    })
}

fn resolve_otp<E>(options: &OtpOptions, env: &E) -> Result<OtpConfig, AuthError>
where
    E: Fn(&str) -> Option<String>,
{
    fn parsed<T: std::str::FromStr>(
        value: Option<T>,
        key: &str,
        env: &dyn Fn(&str) -> Option<String>,
        default: T,
    ) -> Result<T, AuthError> {
        if let Some(value) = value {
            return Ok(value);
        }
        match non_empty(env(key)) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| AuthError::Config(format!("invalid {key}: {raw}"))),
            None => Ok(default),
        }
    }

    let step = parsed(options.step, ENV_OTP_STEP, env, DEFAULT_OTP_STEP)?;
    if step == 0 {
        return Err(AuthError::Config(format!("{ENV_OTP_STEP} must be positive")));
    }

    // totp-rs refuses to build a generator outside this range.
    let digits = parsed(options.digits, ENV_OTP_DIGITS, env, DEFAULT_OTP_DIGITS)?;
    if !OTP_DIGITS.contains(&digits) {
        return Err(AuthError::Config(format!(
            "{ENV_OTP_DIGITS} must be between {} and {}, got {digits}",
            OTP_DIGITS.start(),
            OTP_DIGITS.end()
        )));
    }

    Ok(OtpConfig {
        code_field: non_empty(options.code_field.clone())
            .or_else(|| non_empty(env(ENV_OTP_CODE_FIELD)))
            .unwrap_or_else(|| DEFAULT_OTP_CODE_FIELD.to_string()),
        step,
        window: parsed(options.window, ENV_OTP_WINDOW, env, DEFAULT_OTP_WINDOW)?,
        digits,
        issuer: non_empty(options.issuer.clone())
            .or_else(|| non_empty(env(ENV_OTP_ISSUER)))
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
    })
}
