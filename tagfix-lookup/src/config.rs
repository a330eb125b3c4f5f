//! Command-line and environment configuration

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tagfix::{Error, Result};
use tagfix_core::{EngineConfig, FuzzyConfig, Metric};
use tagfix_csv::CsvOptions;

/// Similarity metric for the fuzzy fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Levenshtein,
    JaroWinkler,
    Dice,
    Indel,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Levenshtein => Metric::Levenshtein,
            MetricArg::JaroWinkler => Metric::JaroWinkler,
            MetricArg::Dice => Metric::Dice,
            MetricArg::Indel => Metric::Indel,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tagfix-lookup")]
#[command(about = "Tag correction lookup service over newline-delimited JSON")]
#[command(version)]
pub struct Args {
    /// Catalogue files, read in order (comma separated in the environment)
    #[arg(
        short,
        long = "catalogue",
        env = "TAGFIX_CATALOGUE",
        value_delimiter = ',',
        required = true
    )]
    pub catalogue: Vec<PathBuf>,

    /// Upper bound for requested limits
    #[arg(long, env = "TAGFIX_MAX_LIMIT", default_value_t = 20)]
    pub max_limit: usize,

    /// Limit used when a request does not carry one
    #[arg(long, env = "TAGFIX_DEFAULT_LIMIT", default_value_t = 5)]
    pub default_limit: usize,

    /// Shortest token kept in the word index
    #[arg(long, env = "TAGFIX_MIN_TOKEN_LEN", default_value_t = 3)]
    pub min_token_len: usize,

    /// Run the fuzzy fallback unless a request says otherwise
    #[arg(long, env = "TAGFIX_FUZZY")]
    pub fuzzy: bool,

    /// Minimum similarity score (0.0-1.0) for fuzzy candidates
    #[arg(long, env = "TAGFIX_FUZZY_MIN_SCORE", default_value_t = 0.6)]
    pub fuzzy_min_score: f64,

    /// Similarity metric for fuzzy candidates
    #[arg(long, env = "TAGFIX_FUZZY_METRIC", value_enum, default_value_t = MetricArg::Levenshtein)]
    pub fuzzy_metric: MetricArg,

    /// Longest accepted query, in characters
    #[arg(long, env = "TAGFIX_MAX_QUERY_LEN", default_value_t = 200)]
    pub max_query_len: usize,

    /// Keep literal parentheses in names instead of escaping them
    #[arg(long)]
    pub raw_parentheses: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate and convert into engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        if self.max_limit == 0 {
            return Err(Error::Config("max_limit must be at least 1".into()));
        }
        if self.default_limit == 0 {
            return Err(Error::Config("default_limit must be at least 1".into()));
        }
        if self.max_query_len == 0 {
            return Err(Error::Config("max_query_len must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.fuzzy_min_score) {
            return Err(Error::Config(format!(
                "fuzzy_min_score must be within 0.0-1.0, got {}",
                self.fuzzy_min_score
            )));
        }

        Ok(EngineConfig {
            min_token_len: self.min_token_len,
            default_limit: self.default_limit.min(self.max_limit),
            max_limit: self.max_limit,
            fuzzy: FuzzyConfig {
                min_score: self.fuzzy_min_score,
                metric: self.fuzzy_metric.into(),
                ..FuzzyConfig::default()
            },
            ..EngineConfig::default()
        })
    }

    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            escape_parentheses: !self.raw_parentheses,
            ..CsvOptions::default()
        }
    }
}
