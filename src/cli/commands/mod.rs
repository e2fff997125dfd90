pub mod auth;
pub mod logging;
pub mod storage;

use crate::api::config::Environment;
use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};
use std::path::PathBuf;

pub const ARG_PORT: &str = "port";
pub const ARG_ENV: &str = "env";
pub const ARG_STATIC_DIR: &str = "static-dir";

fn validator_environment() -> ValueParser {
    ValueParser::from(move |env: &str| -> std::result::Result<Environment, String> {
        env.parse::<Environment>()
    })
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("gatehouse")
        .about("Session based login and registration web app")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long(ARG_PORT)
                .help("Port to listen on")
                .default_value("5000")
                .env("GATEHOUSE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_ENV)
                .short('e')
                .long(ARG_ENV)
                .help("Runtime environment: development or production")
                .default_value("development")
                .env("GATEHOUSE_ENV")
                .value_parser(validator_environment()),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long(ARG_STATIC_DIR)
                .help("Directory served under /static in development")
                .default_value("static")
                .env("GATEHOUSE_STATIC_DIR")
                .value_parser(clap::value_parser!(PathBuf)),
        );

    let command = storage::with_args(command);
    let command = auth::with_args(command);
    logging::with_args(command)
}
