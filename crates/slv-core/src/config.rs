//! Option merging for slv.
//!
//! Options come from two places: the command line ([`Options`]) and an
//! optional named [`Profile`] from the profile document at
//! `~/.config/slv/profiles.toml`. [`ConfigResolver::resolve`] merges the two
//! (command line wins per field), parses every textual value through the same
//! grammar whatever its origin, and checks the option exclusions.
//!
//! # Profile document
//!
//! ```toml
//! [prod]
//! connection = "reader:secret@db.internal/Syslog"
//! severity   = "warn"
//! count      = 50
//!
//! [prod.schema]
//! table = "SystemEventsArchive"
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    connection::Connection,
    error::{Error, Result},
    period::{PeriodPlan, PeriodResolver},
    schema::{SchemaMap, SchemaOverrides},
    types::Severity,
};

pub const DEFAULT_COUNT: u64 = 10;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Partial option set as given on the command line. Values stay textual
/// until [`ConfigResolver::resolve`] parses them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Positional profile name.
    pub profile: Option<String>,
    pub connection: Option<String>,
    pub first_line: bool,
    pub count: Option<u64>,
    pub follow: bool,
    pub host: Option<String>,
    pub tag: Option<String>,
    pub severity: Option<String>,
    pub period: Option<String>,
}

/// One named entry of the profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub connection: Option<String>,
    #[serde(default)]
    pub schema: SchemaOverrides,
    pub period: Option<String>,
    pub count: Option<u64>,
    pub follow: Option<bool>,
    pub host: Option<String>,
    pub tag: Option<String>,
    pub severity: Option<String>,
    pub first_line: Option<bool>,
}

/// Every profile, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDocument {
    pub profiles: BTreeMap<String, Profile>,
}

impl ProfileDocument {
    /// Load the document at `path`. A missing file is an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        let profiles = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        tracing::info!(path = %path.display(), "loaded profile document");
        Ok(Self { profiles })
    }

    pub fn from_toml_str(src: &str) -> Result<Self> {
        let profiles = config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(Self { profiles })
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

// ---------------------------------------------------------------------------
// Resolved config
// ---------------------------------------------------------------------------

/// Fully resolved, immutable option set for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub connection: Connection,
    pub schema: SchemaMap,
    pub host: Option<String>,
    pub tag: Option<String>,
    /// Keep rows at least this severe.
    pub severity: Option<Severity>,
    pub first_line: bool,
    pub count: u64,
    pub period: Option<PeriodPlan>,
    pub follow: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            connection: Connection::default(),
            schema: SchemaMap::default(),
            host: None,
            tag: None,
            severity: None,
            first_line: false,
            count: DEFAULT_COUNT,
            period: None,
            follow: false,
        }
    }
}

/// Merges [`Options`] over a profile into a [`Config`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigResolver {
    periods: PeriodResolver,
}

impl ConfigResolver {
    pub fn new(periods: PeriodResolver) -> Self {
        Self { periods }
    }

    pub fn resolve(&self, cli: Options, document: &ProfileDocument) -> Result<Config> {
        let profile = match cli.profile.as_deref() {
            Some(name) => document
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownProfile(name.to_string()))?,
            None => Profile::default(),
        };

        let count = cli.count.or(profile.count);
        if count == Some(0) {
            return Err(Error::InvalidCount(0));
        }
        let follow = cli.follow || profile.follow.unwrap_or(false);
        let period = cli.period.or(profile.period);

        let period = period
            .map(|spec| self.periods.resolve(&spec))
            .transpose()?;
        if period.is_some() {
            if count.is_some() {
                return Err(Error::ConflictingOptions {
                    first: "period",
                    second: "count",
                });
            }
            if follow {
                return Err(Error::ConflictingOptions {
                    first: "period",
                    second: "follow",
                });
            }
        }

        let connection = cli
            .connection
            .or(profile.connection)
            .map(|c| c.parse::<Connection>())
            .transpose()?
            .unwrap_or_default();
        let severity = cli
            .severity
            .or(profile.severity)
            .map(|s| Severity::from_prefix(&s))
            .transpose()?;

        Ok(Config {
            connection,
            schema: SchemaMap::default().with_overrides(&profile.schema),
            host: cli.host.or(profile.host),
            tag: cli.tag.or(profile.tag),
            severity,
            first_line: cli.first_line || profile.first_line.unwrap_or(false),
            count: count.unwrap_or(DEFAULT_COUNT),
            period,
            follow,
        })
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/slv/profiles.toml`, falling back to `~/.config`.
pub fn profiles_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("slv")
        .join("profiles.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
