//! Command line and environment handling.

use cpuinfo::{Feature, ProbeConfig, Status};
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Log level variable, `error` through `trace` or `off`.
pub const LOG_ENV: &str = "CPUINFO_LOG";

/// Override for [`ProbeConfig::cache_limit`].
pub const CACHE_LIMIT_ENV: &str = "CPUINFO_CACHE_LIMIT";

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Which features to report.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Selection {
    /// The classic report list.
    Default,
    /// Every known feature.
    All,
    /// Only the named features, in the order given.
    Named(Vec<Feature>),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CliConfig {
    pub log_level: LevelFilter,
    pub probe: ProbeConfig,
    pub selection: Selection,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown feature `{0}`")]
    UnknownFeature(String),
    #[error("invalid CPUINFO_LOG value `{0}`")]
    InvalidLogLevel(String),
    #[error("invalid CPUINFO_CACHE_LIMIT value `{0}`")]
    InvalidCacheLimit(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
}

impl ConfigError {
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::UnknownFeature(_)
            | Self::InvalidLogLevel(_)
            | Self::InvalidCacheLimit(_)
            | Self::UnknownOption(_) => Status::INVALID,
        }
    }
}

impl CliConfig {
    /// Read the process environment and the given arguments (program name excluded).
    pub fn from_env(args: impl IntoIterator<Item = String>) -> Result<Self, ConfigError> {
        Self::parse(|key| std::env::var(key).ok(), args)
    }

    pub fn parse(
        env: impl Fn(&str) -> Option<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, ConfigError> {
        let log_level = match env(LOG_ENV) {
            None => DEFAULT_LOG_LEVEL,
            Some(v) => {
                LevelFilter::from_str(v.trim()).map_err(|_| ConfigError::InvalidLogLevel(v.clone()))?
            }
        };

        let mut probe = ProbeConfig::default();
        if let Some(v) = env(CACHE_LIMIT_ENV) {
            let limit = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidCacheLimit(v.clone()))?;
            probe = probe.with_cache_limit(limit);
        }

        let mut all = false;
        let mut named = Vec::new();
        for arg in args {
            if arg == "--all" {
                all = true;
            } else if arg.starts_with("--") {
                return Err(ConfigError::UnknownOption(arg));
            } else {
                let feature = Feature::from_name(&arg).ok_or(ConfigError::UnknownFeature(arg))?;
                named.push(feature);
            }
        }

        let selection = match (all, named.is_empty()) {
            (true, _) => Selection::All,
            (false, true) => Selection::Default,
            (false, false) => Selection::Named(named),
        };

        Ok(Self {
            log_level,
            probe,
            selection,
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::All => f.write_str("all"),
            Self::Named(list) => write!(f, "{} named", list.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(env: &[(&str, &str)], args: &[&str]) -> Result<CliConfig, ConfigError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        CliConfig::parse(
            |key| env.get(key).cloned(),
            args.iter().map(|s| (*s).to_owned()),
        )
    }

    #[test]
    fn defaults() {
        let config = parse(&[], &[]).expect("valid");
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.probe, ProbeConfig::default());
        assert_eq!(config.selection, Selection::Default);
    }

    #[test]
    fn environment_overrides() {
        let config = parse(&[(LOG_ENV, "debug"), (CACHE_LIMIT_ENV, "64")], &[]).expect("valid");
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.probe.cache_limit, 64);

        assert_eq!(
            parse(&[(LOG_ENV, "loud")], &[]),
            Err(ConfigError::InvalidLogLevel("loud".into()))
        );
        assert_eq!(
            parse(&[(CACHE_LIMIT_ENV, "-1")], &[]),
            Err(ConfigError::InvalidCacheLimit("-1".into()))
        );
    }

    #[test]
    fn feature_selection() {
        let config = parse(&[], &["avx2", "MWAIT"]).expect("valid");
        assert_eq!(
            config.selection,
            Selection::Named(vec![Feature::Avx2, Feature::Monitor])
        );

        let config = parse(&[], &["sse", "--all"]).expect("valid");
        assert_eq!(config.selection, Selection::All);

        let err = parse(&[], &["AVX9000"]).expect_err("unknown");
        assert_eq!(err, ConfigError::UnknownFeature("AVX9000".into()));
        assert_eq!(err.status(), Status::INVALID);

        assert_eq!(
            parse(&[], &["--verbose"]),
            Err(ConfigError::UnknownOption("--verbose".into()))
        );
    }
}
