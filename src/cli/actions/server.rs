use crate::{
    api::{
        self,
        config::{AppConfig, Environment},
        AppState,
    },
    auth::{PasswordHasher, SessionConfig},
    cli::commands::storage::Backend,
    store::{memory::MemoryUserStore, postgres::PgUserStore, UserStore},
    views::Views,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub environment: Environment,
    pub static_dir: PathBuf,
    pub storage: Backend,
    pub dsn: Option<String>,
    pub database: String,
    pub init_schema: bool,
    pub acquire_timeout_seconds: u64,
    pub unique_usernames: bool,
    pub session_secret: Option<SecretString>,
    pub session_ttl_seconds: i64,
    pub cookie_secure: Option<bool>,
    pub cookie_http_only: Option<bool>,
    pub bcrypt_cost: u32,
}

/// Point the DSN at the logical database, keeping host, credentials and query.
///
/// # Errors
/// Returns an error if the DSN is not a valid URL.
pub fn database_dsn(dsn: &str, database: &str) -> Result<String> {
    let mut url = Url::parse(dsn).context("invalid DSN")?;
    url.set_path(&format!("/{database}"));
    Ok(url.to_string())
}

/// Resolve cookie flags: explicit values win, otherwise Secure follows production
/// and HttpOnly follows development.
#[must_use]
pub fn cookie_flags(
    environment: Environment,
    secure: Option<bool>,
    http_only: Option<bool>,
) -> (bool, bool) {
    (
        secure.unwrap_or_else(|| environment.is_production()),
        http_only.unwrap_or_else(|| environment.is_development()),
    )
}

/// Build the session settings from the parsed arguments.
///
/// # Errors
/// Returns an error in production when no session secret is configured.
pub fn session_config(args: &Args) -> Result<SessionConfig> {
    let config = match &args.session_secret {
        Some(secret) => SessionConfig::from_secret(secret),
        None if args.environment.is_production() => {
            return Err(anyhow!(
                "missing required argument: --session-secret (required in production)"
            ));
        }
        None => {
            warn!("No session secret configured, using a random key; sessions will not survive a restart");
            SessionConfig::ephemeral()
        }
    };

    let (secure, http_only) = cookie_flags(args.environment, args.cookie_secure, args.cookie_http_only);

    Ok(config
        .with_ttl_seconds(args.session_ttl_seconds)
        .with_secure(secure)
        .with_http_only(http_only))
}

async fn user_store(args: &Args) -> Result<Arc<dyn UserStore>> {
    match args.storage {
        Backend::Memory => {
            warn!("Using the in-memory user store; registered users are lost on restart");
            Ok(Arc::new(
                MemoryUserStore::new().with_unique_usernames(args.unique_usernames),
            ))
        }
        Backend::Postgres => {
            let dsn = args
                .dsn
                .as_deref()
                .ok_or_else(|| anyhow!("missing required argument: --dsn"))?;
            let dsn = database_dsn(dsn, &args.database)?;

            let store = PgUserStore::connect_lazy(
                &dsn,
                Duration::from_secs(args.acquire_timeout_seconds),
            )
            .context("Failed to configure database pool")?
            .with_unique_usernames(args.unique_usernames);

            if args.init_schema {
                store
                    .ensure_schema()
                    .await
                    .context("Failed to create the users schema")?;
            }

            Ok(Arc::new(store))
        }
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let session = session_config(&args)?;
    let hasher = PasswordHasher::new(args.bcrypt_cost)?;
    let store = user_store(&args).await?;
    let views = Arc::new(Views::new().context("Failed to load templates")?);

    info!(
        environment = args.environment.as_str(),
        storage = store.kind(),
        database = %args.database,
        "Starting gatehouse"
    );

    let config = AppConfig::new(session)
        .with_environment(args.environment)
        .with_static_dir(args.static_dir);

    api::new(args.port, config, AppState::new(store, hasher, views)).await
}
