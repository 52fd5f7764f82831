use crate::config::{ConfigError, InputConfig, DEFAULT_CONFIG_FILE};
use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug, Clone)]
#[command(name = "authorstat")]
#[command(about = "Per-author contribution statistics across git repositories")]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the JSON configuration [default: input.json]")]
    pub config: Option<PathBuf>,

    #[arg(long = "repo", help = "Repository to analyse (repeatable, replaces the configured list)")]
    pub repos: Vec<PathBuf>,

    #[arg(long, help = "First day to include (YYYY-MM-DD or RFC3339)")]
    pub since: Option<String>,

    #[arg(long, help = "Last day to include (YYYY-MM-DD or RFC3339)")]
    pub until: Option<String>,

    #[arg(long, allow_negative_numbers = true, help = "Per-day bound applied to each author's line counts")]
    pub max_abs: Option<i64>,

    #[arg(long, help = "Skip commits with more than one parent")]
    pub skip_merge: bool,

    #[arg(long, help = "Regular expression selecting the file paths that count")]
    pub pattern: Option<String>,

    #[arg(long, help = "Output as JSON", conflicts_with = "ndjson")]
    pub json: bool,

    #[arg(long, help = "Output as NDJSON")]
    pub ndjson: bool,

    #[arg(long, help = "Disable progress spinners")]
    pub no_progress: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,

    #[arg(short, long, help = "Only log errors")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::stats::exec(self)
    }

    /// Load the configuration file, if any, and apply command-line overrides.
    pub fn input_config(&self) -> Result<InputConfig, ConfigError> {
        let mut input = match &self.config {
            Some(path) => InputConfig::load(path)?,
            // Without an explicit file, input.json is optional as long as --repo is given.
            None if !self.repos.is_empty() && !Path::new(DEFAULT_CONFIG_FILE).exists() => {
                InputConfig::default()
            }
            None => InputConfig::load(Path::new(DEFAULT_CONFIG_FILE))?,
        };

        if !self.repos.is_empty() {
            input.repos = self.repos.clone();
        }
        if let Some(since) = &self.since {
            input.since = Some(since.clone());
        }
        if let Some(until) = &self.until {
            input.until = Some(until.clone());
        }
        if let Some(max_abs) = self.max_abs {
            input.max_abs = Some(max_abs);
        }
        if self.skip_merge {
            input.skip_merge = true;
        }
        if let Some(pattern) = &self.pattern {
            input.pattern = Some(pattern.clone());
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(br#"{"repos": ["a"], "since": "2024-01-01", "maxAbs": 10, "pattern": "x"}"#)
            .unwrap();

        let cli = Cli::try_parse_from([
            "authorstat",
            path.to_str().unwrap(),
            "--repo",
            "b",
            "--repo",
            "c",
            "--max-abs",
            "20",
            "--skip-merge",
        ])
        .unwrap();
        let input = cli.input_config().unwrap();

        assert_eq!(input.repos, vec![PathBuf::from("b"), PathBuf::from("c")]);
        assert_eq!(input.since.as_deref(), Some("2024-01-01"));
        assert_eq!(input.max_abs, Some(20));
        assert!(input.skip_merge);
        assert_eq!(input.pattern.as_deref(), Some("x"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let cli = Cli::try_parse_from(["authorstat", "/definitely/not/here.json"]).unwrap();
        assert!(matches!(cli.input_config(), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn json_and_ndjson_conflict() {
        assert!(Cli::try_parse_from(["authorstat", "--json", "--ndjson"]).is_err());
    }
}
