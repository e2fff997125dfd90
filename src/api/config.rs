use crate::auth::SessionConfig;
use std::{fmt, path::PathBuf, str::FromStr};

const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        self == Self::Development
    }

    #[must_use]
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Router settings that depend on the deployment, not on the request.
#[derive(Clone, Debug)]
pub struct AppConfig {
    environment: Environment,
    static_dir: PathBuf,
    session: SessionConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new(session: SessionConfig) -> Self {
        Self {
            environment: Environment::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            session,
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_static_dir(mut self, static_dir: PathBuf) -> Self {
        self.static_dir = static_dir;
        self
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    #[must_use]
    pub fn static_dir(&self) -> &PathBuf {
        &self.static_dir
    }

    #[must_use]
    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// Static assets and request logging are development-only.
    #[must_use]
    pub fn serve_static(&self) -> bool {
        self.environment.is_development()
    }

    #[must_use]
    pub fn log_requests(&self) -> bool {
        self.environment.is_development()
    }
}
