//! Authentication strategies installed into the registrar.

pub mod local;
pub mod merge;
pub mod oauth;
pub mod otp;

use std::fmt;
use std::sync::Arc;

pub use local::LocalStrategy;
pub use merge::Tokens;
pub use oauth::OAuthStrategy;
pub use otp::OtpStrategy;

/// Closed set of strategy kinds, keyed in the registry by [`Strategy::name`].
#[derive(Clone)]
pub enum Strategy {
    Local(Arc<dyn LocalStrategy>),
    OAuth(OAuthStrategy),
    Otp(OtpStrategy),
}

impl Strategy {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Local(strategy) => strategy.name(),
            Self::OAuth(strategy) => strategy.name(),
            Self::Otp(strategy) => strategy.name(),
        }
    }

    #[must_use]
    pub fn as_local(&self) -> Option<&Arc<dyn LocalStrategy>> {
        match self {
            Self::Local(strategy) => Some(strategy),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_oauth(&self) -> Option<&OAuthStrategy> {
        match self {
            Self::OAuth(strategy) => Some(strategy),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_otp(&self) -> Option<&OtpStrategy> {
        match self {
            Self::Otp(strategy) => Some(strategy),
            _ => None,
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Local(_) => "Local",
            Self::OAuth(_) => "OAuth",
            Self::Otp(_) => "Otp",
        };
        f.debug_struct("Strategy")
            .field("kind", &kind)
            .field("name", &self.name())
            .finish()
    }
}
