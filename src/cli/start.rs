use crate::{
    api::config::Environment,
    cli::{
        actions::Action,
        commands::{self, ARG_ENV},
        dispatch,
        telemetry::{self, LogFormat},
    },
};
use anyhow::Result;

const fn log_format(environment: Environment) -> LogFormat {
    match environment {
        Environment::Development => LogFormat::Pretty,
        Environment::Production => LogFormat::Json,
    }
}

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if argument parsing, telemetry initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    // .env is optional, real environment variables win
    dotenvy::dotenv().ok();

    let matches = commands::new().get_matches();

    let environment = matches
        .get_one::<Environment>(ARG_ENV)
        .copied()
        .unwrap_or_default();

    telemetry::init(
        commands::logging::level(&matches, environment),
        log_format(environment),
    )?;

    dispatch::handler(&matches)
}
