use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cli::actions::load_options;
use crate::passport::{Config, MemoryUsers, Passport, Profile, Provider, User};

const PLACEHOLDER_CLIENT_ID: &str = "authwire";
const PLACEHOLDER_CALLBACK_URL: &str = "http://localhost/callback";

#[derive(Debug)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub provider: Provider,
    pub profile: PathBuf,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Execute the map action.
/// # Errors
/// Returns an error if the profile cannot be read or verification fails.
pub async fn execute(args: Args) -> Result<()> {
    let user = map_profile(&args, |key| std::env::var(key).ok()).await?;
    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}

/// Client settings only matter for redirects, so missing ones are filled in.
fn placeholder(key: &str) -> Option<String> {
    if key.ends_with("_CLIENT_ID") {
        return Some(PLACEHOLDER_CLIENT_ID.to_string());
    }
    if key.ends_with("_CALLBACK_URL") {
        return Some(PLACEHOLDER_CALLBACK_URL.to_string());
    }
    match key {
        "APPLE_TEAM_ID" | "APPLE_KEY_ID" | "APPLE_PRIVATE_KEY" => {
            Some(PLACEHOLDER_CLIENT_ID.to_string())
        }
        _ => None,
    }
}

pub(crate) async fn map_profile<E>(args: &Args, env: E) -> Result<User>
where
    E: Fn(&str) -> Option<String>,
{
    let raw = std::fs::read_to_string(&args.profile)
        .with_context(|| format!("Failed to read profile {}", args.profile.display()))?;
    let profile: Profile = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse profile {}", args.profile.display()))?;

    let mut options = load_options(args.config.as_deref())?;
    options.providers.local = Some(false);
    options.providers.otp = Some(false);
    options.providers.google = Some(args.provider == Provider::Google);
    options.providers.github = Some(args.provider == Provider::Github);
    options.providers.apple = Some(args.provider == Provider::Apple);

    let config = Config::resolve_with(options, |key| env(key).or_else(|| placeholder(key)))?;
    let users = Arc::new(MemoryUsers::new());
    let passport = Passport::with_config(users.clone(), config)?;
    let strategy = passport
        .oauth(args.provider)
        .with_context(|| format!("{} strategy not registered", args.provider))?;

    debug!(provider = %args.provider, "mapping profile");

    match strategy
        .verify(
            args.access_token.as_deref(),
            args.refresh_token.as_deref(),
            Some(&profile),
        )
        .await
    {
        Ok(user) => Ok(user),
        Err(e) if e.is_consent_required() => {
            // The record is still saved; only the login is refused.
            warn!("{e}: no refresh token, login would be redirected for consent");
            users
                .all()
                .await
                .into_iter()
                .next()
                .context("no user stored")
        }
        Err(e) => Err(e.into()),
    }
}
