//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;
use slv_core::{config::profiles_path, Options};

#[derive(Debug, Parser)]
#[command(name = "slv", about = "Syslog viewer — shows events from the rsyslog SystemEvents table")]
pub struct Cli {
    /// Profile from the profile document to use as defaults.
    pub profile: Option<String>,

    /// Connect as user:password@host[:port][/database].
    #[arg(short = 'c', long = "connection", value_name = "CONN")]
    pub connection: Option<String>,

    /// Only print the first line of every message.
    #[arg(short = '1', long = "first-line")]
    pub first_line: bool,

    /// Show the last COUNT events (default: 10).
    #[arg(
        short = 'n',
        long = "count",
        value_name = "COUNT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub count: Option<u64>,

    /// Poll for new events every two seconds.
    #[arg(short = 'f', long = "follow")]
    pub follow: bool,

    /// Only events from hosts starting with HOST.
    #[arg(short = 'o', long = "host", value_name = "HOST")]
    pub host: Option<String>,

    /// Only events with tags starting with TAG.
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tag: Option<String>,

    /// Only events at least this severe (any unambiguous prefix of
    /// EMERGENCY, ALERT, CRITICAL, ERROR, WARNING, NOTICE, INFO, DEBUG).
    #[arg(short = 's', long = "severity", value_name = "SEV")]
    pub severity: Option<String>,

    /// Events within PERIOD: `FROM,TO`, `FROM,N` or `FROM,-N`.
    #[arg(
        short = 'p',
        long = "period",
        value_name = "PERIOD",
        allow_hyphen_values = true
    )]
    pub period: Option<String>,

    /// Profile document to read instead of ~/.config/slv/profiles.toml.
    #[arg(long, value_name = "PATH")]
    pub profiles: Option<PathBuf>,

    /// Write debug logs to /tmp/slv-debug.log (tail -f to inspect).
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Partial option set for merging with a profile.
    pub fn options(&self) -> Options {
        Options {
            profile: self.profile.clone(),
            connection: self.connection.clone(),
            first_line: self.first_line,
            count: self.count,
            follow: self.follow,
            host: self.host.clone(),
            tag: self.tag.clone(),
            severity: self.severity.clone(),
            period: self.period.clone(),
        }
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.profiles.clone().unwrap_or_else(profiles_path)
    }
}
