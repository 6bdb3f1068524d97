//! Connection target parsed from `user:password@host[:port][/database]`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static CONNECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:@]*):(.*)@([\w.-]+)(?::(\d+))?(?:/(\w+))?$")
        .expect("connection pattern is valid")
});

pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_DATABASE: &str = "Syslog";

#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl Default for Connection {
    fn default() -> Self {
        Self {
            user: "root".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl std::str::FromStr for Connection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidConnection(s.to_string());
        let caps = CONNECTION.captures(s.trim()).ok_or_else(invalid)?;

        let port = match caps.get(4) {
            Some(p) => p.as_str().parse().map_err(|_| invalid())?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            user: caps[1].to_string(),
            password: caps[2].to_string(),
            host: caps[3].to_string(),
            port,
            database: caps
                .get(5)
                .map_or(DEFAULT_DATABASE, |m| m.as_str())
                .to_string(),
        })
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}
