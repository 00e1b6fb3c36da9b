use std::env;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{anyhow, Context, Result};
use tracing::Level;

const DEFAULT_PORT: u16 = 3000;

/// The Odds API credential. Never printed, not even through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Surrounding whitespace is dropped; a blank variable counts as unset.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Replaces every occurrence of the key in `text`.
    pub fn redact(&self, text: &str) -> String {
        text.replace(&self.0, "[HIDDEN]")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([HIDDEN])")
    }
}

pub enum Runtime {
    Lambda,
    Local(SocketAddr),
}

pub struct Config {
    pub api_key: Option<ApiKey>,
    pub log_level: Level,
    pub runtime: Runtime,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("ODDS_API_KEY").and_then(ApiKey::new);

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level
                .parse::<Level>()
                .map_err(|_| anyhow!("Invalid LOG_LEVEL: {level}"))?,
            None => Level::INFO,
        };

        let runtime = if lookup("AWS_LAMBDA_RUNTIME_API").is_some() {
            Runtime::Lambda
        } else {
            let port = match lookup("PORT") {
                Some(port) => port
                    .parse::<u16>()
                    .with_context(|| format!("Invalid PORT: {port}"))?,
                None => DEFAULT_PORT,
            };
            Runtime::Local(SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
        };

        Ok(Config {
            api_key,
            log_level,
            runtime,
        })
    }
}
