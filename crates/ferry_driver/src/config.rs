//! `ferry.yml` configuration

use crate::args::Cli;
use anyhow::Context;
use ferry_resolve::ResolveOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "ferry.yml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FerryConfig {
    pub resolve: ResolveOptions,
    /// Worker threads; rayon's default when unset
    pub threads: Option<usize>,
}

impl FerryConfig {
    /// Load `path`, or `./ferry.yml` if it exists, or the defaults
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_yaml(&text)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Command line flags win over file values
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(convention) = cli.convention {
            self.resolve.default_convention = convention.into();
        }
        if let Some(strictness) = cli.cross_type_names {
            self.resolve.cross_type_names = strictness.into();
        }
        if cli.threads.is_some() {
            self.threads = cli.threads;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use ferry_resolve::NameStrictness;
    use ferry_symbols::ConventionMode;

    #[test]
    fn test_parse_config() {
        let yaml = "resolve:\n  default_convention: LowerCamelCase\nthreads: 4\n";
        let config = FerryConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.resolve.default_convention, ConventionMode::LowerCamelCase);
        assert_eq!(config.resolve.cross_type_names, NameStrictness::Warn);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = FerryConfig::from_yaml("resolve:\n  cross_type_names: allow\n").unwrap();
        let cli = Cli::try_parse_from([
            "ferry",
            "check",
            "m.json",
            "--cross-type-names",
            "deny",
            "--threads",
            "2",
        ])
        .unwrap();
        config.apply_overrides(&cli);
        assert_eq!(config.resolve.cross_type_names, NameStrictness::Deny);
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_default_config_round_trips() {
        let yaml = serde_yaml::to_string(&FerryConfig::default()).unwrap();
        assert_eq!(FerryConfig::from_yaml(&yaml).unwrap(), FerryConfig::default());
    }
}
