use anyhow::{anyhow, Result};
use clap::{
    builder::{BoolishValueParser, ValueParser},
    Arg, ArgAction, Command,
};
use once_cell::sync::Lazy;
use regex::Regex;

pub const ARG_STORAGE: &str = "storage";
pub const ARG_DSN: &str = "dsn";
pub const ARG_DATABASE: &str = "database";
pub const ARG_INIT_SCHEMA: &str = "init-schema";
pub const ARG_ACQUIRE_TIMEOUT: &str = "db-acquire-timeout-seconds";
pub const ARG_UNIQUE_USERNAMES: &str = "unique-usernames";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

fn validator_backend() -> ValueParser {
    ValueParser::from(
        move |value: &str| -> std::result::Result<Backend, String> {
            match value.to_lowercase().as_str() {
                "postgres" | "postgresql" => Ok(Backend::Postgres),
                "memory" => Ok(Backend::Memory),
                _ => Err("storage must be one of: postgres, memory".to_string()),
            }
        },
    )
}

// Database names end up in the DSN path, keep them to plain identifiers.
static DATABASE_NAME: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_\-]{0,62}$").ok());

#[must_use]
pub fn validator_database_name() -> ValueParser {
    ValueParser::from(move |name: &str| -> std::result::Result<String, String> {
        match DATABASE_NAME.as_ref() {
            Some(re) if re.is_match(name) => Ok(name.to_string()),
            Some(_) => Err("invalid database name".to_string()),
            None => Err("database name pattern failed to compile".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORAGE)
                .long(ARG_STORAGE)
                .help("User store backend: postgres or memory")
                .env("GATEHOUSE_STORAGE")
                .default_value("postgres")
                .value_parser(validator_backend()),
        )
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Storage connection URI")
                .long_help(
                    "Storage connection URI. The path is replaced by --database, so the URI only needs host, credentials and options.",
                )
                .env("GATEHOUSE_DSN"),
        )
        .arg(
            Arg::new(ARG_DATABASE)
                .long(ARG_DATABASE)
                .help("Logical database holding the users collection")
                .env("GATEHOUSE_DATABASE")
                .default_value("gatehouse")
                .value_parser(validator_database_name()),
        )
        .arg(
            Arg::new(ARG_INIT_SCHEMA)
                .long(ARG_INIT_SCHEMA)
                .help("Create the users table on startup if it does not exist")
                .env("GATEHOUSE_INIT_SCHEMA")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
        .arg(
            Arg::new(ARG_ACQUIRE_TIMEOUT)
                .long(ARG_ACQUIRE_TIMEOUT)
                .help("Seconds to wait for a database connection")
                .env("GATEHOUSE_DB_ACQUIRE_TIMEOUT_SECONDS")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_UNIQUE_USERNAMES)
                .long(ARG_UNIQUE_USERNAMES)
                .help("Reject registrations for a username that already exists")
                .env("GATEHOUSE_UNIQUE_USERNAMES")
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new()),
        )
}

#[derive(Debug, Clone)]
pub struct Options {
    pub backend: Backend,
    pub dsn: Option<String>,
    pub database: String,
    pub init_schema: bool,
    pub acquire_timeout_seconds: u64,
    pub unique_usernames: bool,
}

impl Options {
    /// # Errors
    /// Returns an error if the postgres backend is selected without a DSN.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let backend = matches
            .get_one::<Backend>(ARG_STORAGE)
            .copied()
            .unwrap_or(Backend::Postgres);
        let dsn = matches.get_one::<String>(ARG_DSN).cloned();

        if backend == Backend::Postgres && dsn.is_none() {
            return Err(anyhow!("missing required argument: --{ARG_DSN}"));
        }

        Ok(Self {
            backend,
            dsn,
            database: matches
                .get_one::<String>(ARG_DATABASE)
                .cloned()
                .unwrap_or_else(|| "gatehouse".to_string()),
            init_schema: matches.get_flag(ARG_INIT_SCHEMA),
            acquire_timeout_seconds: matches
                .get_one::<u64>(ARG_ACQUIRE_TIMEOUT)
                .copied()
                .unwrap_or(5),
            unique_usernames: matches.get_flag(ARG_UNIQUE_USERNAMES),
        })
    }
}
