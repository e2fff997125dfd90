use crate::api::config::Environment;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_LEVEL: &str = "log-level";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Raise log verbosity: -v WARN, -vv INFO, -vvv DEBUG, -vvvv TRACE")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long(ARG_LOG_LEVEL)
                .help("Log level: error, warn, info, debug, trace (default: info in development, error in production)")
                .env("GATEHOUSE_LOG_LEVEL")
                .value_parser(clap::value_parser!(Level)),
        )
}

/// Development logs each request at INFO; production stays quiet unless asked.
#[must_use]
pub const fn default_level(environment: Environment) -> Level {
    match environment {
        Environment::Development => Level::INFO,
        Environment::Production => Level::ERROR,
    }
}

const fn verbosity_level(count: u8) -> Option<Level> {
    match count {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Resolve the log level: `-v` flags win, then `--log-level`, then the default
/// for the environment.
#[must_use]
pub fn level(matches: &ArgMatches, environment: Environment) -> Level {
    let count = matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0);

    verbosity_level(count)
        .or_else(|| matches.get_one::<Level>(ARG_LOG_LEVEL).copied())
        .unwrap_or_else(|| default_level(environment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        with_args(Command::new("test"))
    }

    #[test]
    fn default_follows_environment() {
        temp_env::with_var_unset("GATEHOUSE_LOG_LEVEL", || {
            let matches = command().get_matches_from(vec!["test"]);
            assert_eq!(level(&matches, Environment::Development), Level::INFO);
            assert_eq!(level(&matches, Environment::Production), Level::ERROR);
        });
    }

    #[test]
    fn verbose_flags_win() {
        temp_env::with_var("GATEHOUSE_LOG_LEVEL", Some("error"), || {
            let matches = command().get_matches_from(vec!["test", "-vvv"]);
            assert_eq!(level(&matches, Environment::Production), Level::DEBUG);

            let matches = command().get_matches_from(vec!["test", "-vvvvvv"]);
            assert_eq!(level(&matches, Environment::Production), Level::TRACE);
        });
    }

    #[test]
    fn log_level_from_env() {
        temp_env::with_var("GATEHOUSE_LOG_LEVEL", Some("debug"), || {
            let matches = command().get_matches_from(vec!["test"]);
            assert_eq!(level(&matches, Environment::Production), Level::DEBUG);
        });
    }

    #[test]
    fn log_level_rejects_garbage() {
        temp_env::with_var_unset("GATEHOUSE_LOG_LEVEL", || {
            let result = command().try_get_matches_from(vec!["test", "--log-level", "loud"]);
            assert!(result.is_err());
        });
    }
}
