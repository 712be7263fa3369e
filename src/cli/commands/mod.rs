pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};
use std::path::PathBuf;

use crate::passport::Provider;

pub const CMD_CHECK: &str = "check";
pub const CMD_MAP: &str = "map";

pub const ARG_CONFIG: &str = "config";
pub const ARG_STATE: &str = "state";
pub const ARG_PROVIDER: &str = "provider";
pub const ARG_PROFILE: &str = "profile";
pub const ARG_ACCESS_TOKEN: &str = "access-token";
pub const ARG_REFRESH_TOKEN: &str = "refresh-token";

fn config_arg() -> Arg {
    Arg::new(ARG_CONFIG)
        .short('c')
        .long("config")
        .help("JSON options file; values in it win over the environment")
        .env("AUTHWIRE_CONFIG")
        .value_parser(clap::value_parser!(PathBuf))
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("authwire")
        .about("OAuth2, local and OTP strategy wiring")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_CHECK)
                .about("Resolve configuration and list the registered strategies")
                .arg(config_arg())
                .arg(
                    Arg::new(ARG_STATE)
                        .long("state")
                        .help("State parameter used in the printed authorization URLs")
                        .default_value("authwire"),
                ),
        )
        .subcommand(
            Command::new(CMD_MAP)
                .about("Map a provider profile into a user record")
                .arg(config_arg())
                .arg(
                    Arg::new(ARG_PROVIDER)
                        .short('p')
                        .long("provider")
                        .help("Identity provider: google, github or apple")
                        .required(true)
                        .value_parser(clap::value_parser!(Provider)),
                )
                .arg(
                    Arg::new(ARG_PROFILE)
                        .long("profile")
                        .help("Provider profile as a JSON file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new(ARG_ACCESS_TOKEN)
                        .long("access-token")
                        .help("Access token returned by the provider"),
                )
                .arg(
                    Arg::new(ARG_REFRESH_TOKEN)
                        .long("refresh-token")
                        .help("Refresh token returned by the provider"),
                ),
        );

    logging::with_args(command)
}
