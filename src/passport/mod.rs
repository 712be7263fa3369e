//! Strategy registrar over a pluggable `Users` store.
//!
//! Construction order:
//! 1) resolve options against the environment into an immutable [`Config`];
//! 2) install the collaborator's local strategy when local login is enabled;
//! 3) install one [`OAuthStrategy`] per enabled provider;
//! 4) install the [`OtpStrategy`] last, once a first factor is known to exist.
//!
//! Session hooks live in [`session`].

pub mod config;
pub mod error;
pub mod fields;
pub mod phrases;
pub mod profile;
pub mod provider;
pub mod session;
pub mod store;
pub mod strategy;
pub mod user;
pub(crate) mod utils;

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

pub use config::{Config, PassportOptions, SessionKey};
pub use error::AuthError;
pub use fields::Fields;
pub use phrases::Phrases;
pub use profile::Profile;
pub use provider::Provider;
pub use store::{MemoryUsers, Query, Users};
pub use strategy::{LocalStrategy, OAuthStrategy, OtpStrategy, Strategy};
pub use user::User;

pub struct Passport {
    config: Arc<Config>,
    users: Arc<dyn Users>,
    strategies: BTreeMap<String, Strategy>,
}

impl Passport {
    /// Resolve `options` against the process environment and register every
    /// enabled strategy.
    ///
    /// # Errors
    /// Returns [`AuthError::Config`] when configuration cannot be resolved, local
    /// login is enabled but `users` cannot create a local strategy, or OTP is
    /// enabled without a first factor.
    pub fn new(users: Arc<dyn Users>, options: PassportOptions) -> Result<Self, AuthError> {
        Self::with_config(users, Config::resolve(options)?)
    }

    /// Register every strategy enabled in an already resolved `config`.
    ///
    /// # Errors
    /// Returns [`AuthError::Config`] when local login is enabled but `users`
    /// cannot create a local strategy.
    pub fn with_config(users: Arc<dyn Users>, config: Config) -> Result<Self, AuthError> {
        let config = Arc::new(config);
        let providers = config.providers();

        let mut passport = Self {
            config: Arc::clone(&config),
            users: Arc::clone(&users),
            strategies: BTreeMap::new(),
        };

        if providers.local {
            let local = users.create_strategy().ok_or_else(|| {
                AuthError::Config(config.phrases().local_unsupported.clone())
            })?;
            passport.use_strategy(Strategy::Local(local));
        }

        for provider in Provider::ALL {
            if let Some(settings) = config.oauth(provider) {
                passport.use_strategy(Strategy::OAuth(OAuthStrategy::new(
                    settings.clone(),
                    Arc::clone(&config),
                    Arc::clone(&users),
                )));
            }
        }

        if providers.otp {
            passport.use_strategy(Strategy::Otp(OtpStrategy::new(Arc::clone(&config))));
        }

        info!(strategies = ?passport.strategy_names(), "strategies registered");

        Ok(passport)
    }

    /// Install `strategy` under its name, replacing any strategy with that name.
    pub fn use_strategy(&mut self, strategy: Strategy) -> &mut Self {
        let name = strategy.name().to_string();
        debug!(strategy = %name, "using strategy");
        self.strategies.insert(name, strategy);
        self
    }

    pub fn unuse(&mut self, name: &str) -> Option<Strategy> {
        self.strategies.remove(name)
    }

    #[must_use]
    pub fn strategy(&self, name: &str) -> Option<&Strategy> {
        self.strategies.get(name)
    }

    #[must_use]
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    pub fn strategies(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.values()
    }

    #[must_use]
    pub fn local(&self) -> Option<&Arc<dyn LocalStrategy>> {
        self.strategies
            .get(strategy::local::LOCAL_STRATEGY_NAME)
            .and_then(Strategy::as_local)
    }

    #[must_use]
    pub fn oauth(&self, provider: Provider) -> Option<&OAuthStrategy> {
        self.strategies
            .get(provider.as_str())
            .and_then(Strategy::as_oauth)
    }

    #[must_use]
    pub fn otp(&self) -> Option<&OtpStrategy> {
        self.strategies
            .get(strategy::otp::OTP_STRATEGY_NAME)
            .and_then(Strategy::as_otp)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn users(&self) -> &Arc<dyn Users> {
        &self.users
    }
}
