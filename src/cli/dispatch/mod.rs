use crate::cli::{
    actions::{check, map, Action},
    commands::{
        ARG_ACCESS_TOKEN, ARG_CONFIG, ARG_PROFILE, ARG_PROVIDER, ARG_REFRESH_TOKEN, ARG_STATE,
        CMD_CHECK, CMD_MAP,
    },
};
use crate::passport::Provider;
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// # Errors
/// Returns an error if the subcommand is unknown or required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((CMD_CHECK, sub_m)) => Ok(Action::Check(check::Args {
            config: sub_m.get_one::<PathBuf>(ARG_CONFIG).cloned(),
            state: sub_m
                .get_one::<String>(ARG_STATE)
                .cloned()
                .unwrap_or_else(|| "authwire".to_string()),
        })),
        Some((CMD_MAP, sub_m)) => Ok(Action::Map(map::Args {
            config: sub_m.get_one::<PathBuf>(ARG_CONFIG).cloned(),
            provider: sub_m
                .get_one::<Provider>(ARG_PROVIDER)
                .copied()
                .context("missing required argument: --provider")?,
            profile: sub_m
                .get_one::<PathBuf>(ARG_PROFILE)
                .cloned()
                .context("missing required argument: --profile")?,
            access_token: sub_m.get_one::<String>(ARG_ACCESS_TOKEN).cloned(),
            refresh_token: sub_m.get_one::<String>(ARG_REFRESH_TOKEN).cloned(),
        })),
        Some((name, _)) => Err(anyhow!("unknown command: {name}")),
        None => Err(anyhow!("missing command")),
    }
}
