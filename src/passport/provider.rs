use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
pub const APPLE_AUTH_URL: &str = "https://appleid.apple.com/auth/authorize";

/// External identity providers with an OAuth2 verification strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Google,
    Github,
    Apple,
}

impl Provider {
    pub const ALL: [Self; 3] = [Self::Google, Self::Github, Self::Apple];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Apple => "apple",
        }
    }

    #[must_use]
    pub fn auth_url(self) -> &'static str {
        match self {
            Self::Google => GOOGLE_AUTH_URL,
            Self::Github => GITHUB_AUTH_URL,
            Self::Apple => APPLE_AUTH_URL,
        }
    }

    /// Prefix used by the provider's environment variables, e.g. `GOOGLE`.
    pub(crate) fn env_prefix(self) -> &'static str {
        match self {
            Self::Google => "GOOGLE",
            Self::Github => "GITHUB",
            Self::Apple => "APPLE",
        }
    }

    pub(crate) fn enabled_env(self) -> &'static str {
        match self {
            Self::Google => "AUTH_GOOGLE_ENABLED",
            Self::Github => "AUTH_GITHUB_ENABLED",
            Self::Apple => "AUTH_APPLE_ENABLED",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::Github),
            "apple" => Ok(Self::Apple),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}
