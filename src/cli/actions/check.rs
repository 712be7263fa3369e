use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::cli::actions::load_options;
use crate::passport::{
    store::BoxFuture, LocalStrategy, MemoryUsers, Passport, Strategy, User,
};

#[derive(Debug)]
pub struct Args {
    pub config: Option<PathBuf>,
    pub state: String,
}

/// Stands in for the application's password check, which the CLI does not have.
struct RejectAll;

impl LocalStrategy for RejectAll {
    fn authenticate<'a>(
        &'a self,
        _username: &'a str,
        _password: &'a str,
    ) -> BoxFuture<'a, Result<Option<User>>> {
        Box::pin(async { Ok(None) })
    }
}

/// Execute the check action.
/// # Errors
/// Returns an error if the options file is unreadable or configuration does not resolve.
pub async fn execute(args: Args) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    let users = MemoryUsers::new().with_local_strategy(Arc::new(RejectAll));
    let passport = Passport::new(Arc::new(users), options)?;

    info!("configuration resolved");

    for line in report(&passport, &args.state)? {
        println!("{line}");
    }

    Ok(())
}

/// One line per registered strategy.
pub(crate) fn report(passport: &Passport, state: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for strategy in passport.strategies() {
        let detail = match strategy {
            Strategy::Local(_) => "username and password".to_string(),
            Strategy::OAuth(oauth) => oauth.authorization_url(state, false)?.to_string(),
            Strategy::Otp(otp) => {
                let settings = passport.config().otp();
                format!(
                    "field={} digits={} step={}s window={}",
                    otp.code_field(),
                    settings.digits,
                    settings.step,
                    settings.window
                )
            }
        };
        lines.push(format!("{:<8}{detail}", strategy.name()));
    }
    if lines.is_empty() {
        lines.push("no strategies enabled".to_string());
    }
    Ok(lines)
}
