//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::planner::RouteConfig;
use crate::repository::{
    FlightSource, HttpFlightConfig, HttpFlightRepository, InMemoryFlightRepository,
    JsonFileFlightRepository, RepositoryError,
};

pub const ADDR_VAR: &str = "FLIGHT_NETWORK_ADDR";
pub const SOURCE_URL_VAR: &str = "FLIGHT_SOURCE_URL";
pub const SOURCE_FILE_VAR: &str = "FLIGHT_SOURCE_FILE";
pub const SOURCE_API_KEY_VAR: &str = "FLIGHT_SOURCE_API_KEY";
pub const REFRESH_SECS_VAR: &str = "FLIGHT_REFRESH_SECS";
pub const SOURCE_TIMEOUT_SECS_VAR: &str = "FLIGHT_SOURCE_TIMEOUT_SECS";
pub const MAX_HOPS_VAR: &str = "ROUTE_MAX_HOPS";
pub const MIN_CONNECTION_VAR: &str = "ROUTE_MIN_CONNECTION_MINS";
pub const MAX_RESULTS_VAR: &str = "ROUTE_MAX_RESULTS";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

/// Error reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to something unparseable
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Both an HTTP and a file source were configured
    #[error("set at most one of FLIGHT_SOURCE_URL and FLIGHT_SOURCE_FILE")]
    ConflictingSources,

    /// The route parameters do not describe a valid search
    #[error("invalid route configuration: {0}")]
    Route(#[from] crate::planner::RouteError),
}

/// Where flight records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Http { base_url: String, api_key: Option<String> },
    File(PathBuf),
    /// Nothing configured: start with an empty network.
    Empty,
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub source: SourceConfig,
    pub refresh_interval: Duration,
    pub source_timeout: Duration,
    pub route: RouteConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let addr = parse_or(ADDR_VAR, get(ADDR_VAR), DEFAULT_ADDR.parse().ok())?;

        let source = match (get(SOURCE_URL_VAR), get(SOURCE_FILE_VAR)) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingSources),
            (Some(base_url), None) => SourceConfig::Http {
                base_url,
                api_key: get(SOURCE_API_KEY_VAR),
            },
            (None, Some(path)) => SourceConfig::File(PathBuf::from(path)),
            (None, None) => SourceConfig::Empty,
        };

        let refresh_secs: u64 =
            parse_or(REFRESH_SECS_VAR, get(REFRESH_SECS_VAR), Some(DEFAULT_REFRESH_SECS))?;
        if refresh_secs == 0 {
            return Err(ConfigError::Invalid {
                var: REFRESH_SECS_VAR,
                value: "0".into(),
                reason: "must be positive".into(),
            });
        }
        let timeout_secs: u64 = parse_or(
            SOURCE_TIMEOUT_SECS_VAR,
            get(SOURCE_TIMEOUT_SECS_VAR),
            Some(DEFAULT_SOURCE_TIMEOUT_SECS),
        )?;

        let defaults = RouteConfig::default();
        let route = RouteConfig::new(
            parse_or(MAX_HOPS_VAR, get(MAX_HOPS_VAR), Some(defaults.max_hops))?,
            parse_or(
                MIN_CONNECTION_VAR,
                get(MIN_CONNECTION_VAR),
                Some(defaults.min_connection_mins),
            )?,
            parse_or(MAX_RESULTS_VAR, get(MAX_RESULTS_VAR), Some(defaults.max_results))?,
        );
        route.validate()?;

        Ok(Self {
            addr,
            source,
            refresh_interval: Duration::from_secs(refresh_secs),
            source_timeout: Duration::from_secs(timeout_secs),
            route,
        })
    }

    /// Build the flight repository this configuration names.
    pub fn flight_source(&self) -> Result<FlightSource, RepositoryError> {
        let source = match &self.source {
            SourceConfig::Http { base_url, api_key } => {
                let mut config =
                    HttpFlightConfig::new(base_url).with_timeout(self.source_timeout.as_secs());
                if let Some(key) = api_key {
                    config = config.with_api_key(key);
                }
                FlightSource::Http(HttpFlightRepository::new(config)?)
            }
            SourceConfig::File(path) => FlightSource::File(JsonFileFlightRepository::new(path)),
            SourceConfig::Empty => FlightSource::Memory(InMemoryFlightRepository::default()),
        };

        Ok(source)
    }
}

fn parse_or<T>(var: &'static str, value: Option<String>, default: Option<T>) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match (value, default) {
        (Some(raw), _) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        (None, Some(default)) => Ok(default),
        (None, None) => Err(ConfigError::Invalid {
            var,
            value: String::new(),
            reason: "no value and no default".into(),
        }),
    }
}
