use crate::auth::{
    password::{DEFAULT_COST, MAX_COST, MIN_COST},
    session::DEFAULT_SESSION_TTL_SECONDS,
};
use clap::{
    builder::{BoolishValueParser, NonEmptyStringValueParser},
    Arg, Command,
};
use secrecy::SecretString;

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_SESSION_TTL: &str = "session-ttl-seconds";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";
pub const ARG_COOKIE_HTTP_ONLY: &str = "cookie-http-only";
pub const ARG_BCRYPT_COST: &str = "bcrypt-cost";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long(ARG_SESSION_SECRET)
                .help("Secret used to sign the session cookie")
                .long_help(
                    "Secret used to sign the session cookie. Required in production, a random one is generated in development.",
                )
                .env("GATEHOUSE_SESSION_SECRET")
                .hide_env_values(true)
                .value_parser(NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL)
                .long(ARG_SESSION_TTL)
                .help("Session lifetime in seconds, refreshed on every request")
                .env("GATEHOUSE_SESSION_TTL_SECONDS")
                .default_value("604800")
                .value_parser(clap::value_parser!(i64).range(1..)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure (default: on in production)")
                .env("GATEHOUSE_COOKIE_SECURE")
                .num_args(0..=1)
                .default_missing_value("true")
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_COOKIE_HTTP_ONLY)
                .long(ARG_COOKIE_HTTP_ONLY)
                .help("Mark the session cookie HttpOnly (default: on in development)")
                .env("GATEHOUSE_COOKIE_HTTP_ONLY")
                .num_args(0..=1)
                .default_missing_value("true")
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_BCRYPT_COST)
                .long(ARG_BCRYPT_COST)
                .help("bcrypt work factor")
                .env("GATEHOUSE_BCRYPT_COST")
                .default_value("8")
                .value_parser(clap::value_parser!(u32).range(i64::from(MIN_COST)..=i64::from(MAX_COST))),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub session_secret: Option<SecretString>,
    pub session_ttl_seconds: i64,
    pub cookie_secure: Option<bool>,
    pub cookie_http_only: Option<bool>,
    pub bcrypt_cost: u32,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &clap::ArgMatches) -> Self {
        Self {
            session_secret: matches
                .get_one::<String>(ARG_SESSION_SECRET)
                .map(|secret| SecretString::from(secret.clone())),
            session_ttl_seconds: matches
                .get_one::<i64>(ARG_SESSION_TTL)
                .copied()
                .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            cookie_secure: matches.get_one::<bool>(ARG_COOKIE_SECURE).copied(),
            cookie_http_only: matches.get_one::<bool>(ARG_COOKIE_HTTP_ONLY).copied(),
            bcrypt_cost: matches
                .get_one::<u32>(ARG_BCRYPT_COST)
                .copied()
                .unwrap_or(DEFAULT_COST),
        }
    }
}
