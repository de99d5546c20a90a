use crate::cli::Args;
use crate::source::{BugSource, FileSource, HttpSource};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    File(PathBuf),
    Http { base_url: String, timeout: Duration },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: &'static str,
}

impl Config {
    /// A snapshot file wins over any URL; otherwise `--url`, then
    /// `STRIKELOG_API_URL`, then the local development backend.
    pub fn from_args(args: &Args) -> Self {
        let source = match (&args.file, &args.url) {
            (Some(path), _) => SourceConfig::File(path.clone()),
            (None, url) => SourceConfig::Http {
                base_url: url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                timeout: Duration::from_secs(args.timeout.max(1)),
            },
        };

        Self {
            source,
            log_level: if args.verbose { "debug" } else { "warn" },
        }
    }

    /// Last day of the weekly window: the requested date, else today in the
    /// local time zone.
    pub fn reference_date(&self, requested: Option<NaiveDate>) -> NaiveDate {
        requested.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn open_source(&self) -> Result<Box<dyn BugSource>> {
        Ok(match &self.source {
            SourceConfig::File(path) => Box::new(FileSource::new(path.clone())),
            SourceConfig::Http { base_url, timeout } => Box::new(HttpSource::new(base_url, *timeout)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn file_source_takes_precedence() {
        let args = Args::parse_from(["strikelog", "--file", "bugs.json", "legend"]);
        let config = Config::from_args(&args);
        assert_eq!(config.source, SourceConfig::File(PathBuf::from("bugs.json")));
    }

    #[test]
    fn explicit_url_and_timeout_are_used() {
        let args = Args::parse_from(["strikelog", "--url", "http://bugs.internal:8080/", "--timeout", "5", "legend"]);
        let config = Config::from_args(&args);
        assert_eq!(
            config.source,
            SourceConfig::Http {
                base_url: "http://bugs.internal:8080/".to_string(),
                timeout: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn verbose_raises_the_log_level() {
        let quiet = Config::from_args(&Args::parse_from(["strikelog", "legend"]));
        assert_eq!(quiet.log_level, "warn");

        let loud = Config::from_args(&Args::parse_from(["strikelog", "-v", "legend"]));
        assert_eq!(loud.log_level, "debug");
    }

    #[test]
    fn requested_reference_date_wins() {
        let config = Config::from_args(&Args::parse_from(["strikelog", "legend"]));
        let day = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(config.reference_date(Some(day)), day);
        assert!(config.reference_date(None) >= day);
    }
}
