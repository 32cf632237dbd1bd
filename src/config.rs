//! Planner configuration, loadable from TOML.
//!
//! ```toml
//! memory_events = 3
//! iterations = 1000
//! seed = 42
//!
//! [tables]
//! min_seats = 4
//! max_seats = 6
//!
//! [weights]
//! gender = 1.0
//! seniority = 1.0
//! field = 1.0
//! ```
//!
//! Every key is optional. Values are only checked when turned into runtime
//! types through [`PlannerConfig::constraints`] or [`PlannerConfig::optimizer`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::history::{HistoryError, SeatingHistory, DEFAULT_MEMORY_EVENTS};
use crate::model::condition::DiversityWeights;
use crate::model::seating::TableConstraints;
use crate::optimize::{Params, SeatingOptimizer, DEFAULT_ITERATIONS};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub tables: TablesConfig,
    #[serde(default)]
    pub weights: DiversityWeights,
    /// Past events consulted for repeat pairings.
    #[serde(default = "default_memory_events")]
    pub memory_events: usize,
    /// Arrangements sampled per search.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Fixed seed for reproducible searches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "default_min_seats")]
    pub min_seats: usize,
    #[serde(default = "default_max_seats")]
    pub max_seats: usize,
}

fn default_memory_events() -> usize {
    DEFAULT_MEMORY_EVENTS
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_min_seats() -> usize {
    4
}

fn default_max_seats() -> usize {
    6
}

impl Default for TablesConfig {
    fn default() -> Self {
        TablesConfig { min_seats: default_min_seats(), max_seats: default_max_seats() }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            tables: TablesConfig::default(),
            weights: DiversityWeights::default(),
            memory_events: default_memory_events(),
            iterations: default_iterations(),
            seed: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_file(path: &Path) -> Result<PlannerConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        PlannerConfig::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<PlannerConfig, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn constraints(&self) -> Result<TableConstraints, ValidationError> {
        TableConstraints::new(self.tables.min_seats, self.tables.max_seats)
    }

    pub fn params(&self) -> Params {
        Params { iterations: self.iterations, weights: self.weights, seed: self.seed }
    }

    pub fn optimizer(&self) -> Result<SeatingOptimizer, ConfigError> {
        Ok(SeatingOptimizer::new(self.constraints()?, self.params())?)
    }

    pub fn empty_history(&self) -> SeatingHistory {
        SeatingHistory::new(self.memory_events)
    }

    pub fn load_history(&self, path: &Path) -> Result<SeatingHistory, HistoryError> {
        SeatingHistory::load(path, self.memory_events)
    }
}
