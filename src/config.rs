use crate::core::ranker::DEFAULT_PARALLEL_THRESHOLD;
use crate::models::{Dimension, LabelThresholds, OrdinalSteps, ScoringPolicy, ScoringWeights};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of adopters whose recommendations are kept
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub steps: StepsConfig,
    #[serde(default = "default_unknown_score")]
    pub unknown_score: u8,
    #[serde(default = "default_hard_dimensions")]
    pub hard_dimensions: Vec<Dimension>,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            thresholds: ThresholdsConfig::default(),
            steps: StepsConfig::default(),
            unknown_score: default_unknown_score(),
            hard_dimensions: default_hard_dimensions(),
        }
    }
}

fn default_unknown_score() -> u8 { 60 }
fn default_hard_dimensions() -> Vec<Dimension> {
    ScoringPolicy::default().hard_dimensions
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_living_space_weight")]
    pub living_space: f64,
    #[serde(default = "default_energy_weight")]
    pub energy: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_kids_weight")]
    pub kids: f64,
    #[serde(default = "default_special_care_weight")]
    pub special_care: f64,
    #[serde(default = "default_preference_weight")]
    pub species: f64,
    #[serde(default = "default_preference_weight")]
    pub size: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            living_space: default_living_space_weight(),
            energy: default_energy_weight(),
            experience: default_experience_weight(),
            kids: default_kids_weight(),
            special_care: default_special_care_weight(),
            species: default_preference_weight(),
            size: default_preference_weight(),
        }
    }
}

fn default_living_space_weight() -> f64 { 0.30 }
fn default_energy_weight() -> f64 { 0.20 }
fn default_experience_weight() -> f64 { 0.20 }
fn default_kids_weight() -> f64 { 0.15 }
fn default_special_care_weight() -> f64 { 0.15 }
fn default_preference_weight() -> f64 { 0.10 }

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdsConfig {
    #[serde(default = "default_suitable_threshold")]
    pub suitable: u8,
    #[serde(default = "default_conditional_threshold")]
    pub conditional: u8,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            suitable: default_suitable_threshold(),
            conditional: default_conditional_threshold(),
        }
    }
}

fn default_suitable_threshold() -> u8 { 70 }
fn default_conditional_threshold() -> u8 { 40 }

#[derive(Debug, Clone, Deserialize)]
pub struct StepsConfig {
    #[serde(default = "default_exact_step")]
    pub exact: u8,
    #[serde(default = "default_one_step")]
    pub one_step: u8,
    #[serde(default = "default_two_steps")]
    pub two_steps: u8,
}

impl Default for StepsConfig {
    fn default() -> Self {
        Self {
            exact: default_exact_step(),
            one_step: default_one_step(),
            two_steps: default_two_steps(),
        }
    }
}

fn default_exact_step() -> u8 { 100 }
fn default_one_step() -> u8 { 60 }
fn default_two_steps() -> u8 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    /// Candidate count from which scoring runs on the rayon pool
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

fn default_parallel_threshold() -> usize { DEFAULT_PARALLEL_THRESHOLD }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PETMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PETMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PETMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PETMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Scoring rules as configured
    ///
    /// Rejects weights that are negative or all zero, and thresholds that
    /// are out of order.
    pub fn scoring_policy(&self) -> Result<ScoringPolicy, ConfigError> {
        let scoring = &self.scoring;
        let w = &scoring.weights;
        let weights = ScoringWeights {
            living_space: w.living_space,
            energy: w.energy,
            experience: w.experience,
            kids: w.kids,
            special_care: w.special_care,
            species: w.species,
            size: w.size,
        };

        let all = Dimension::ALL.iter().map(|d| weights.weight_for(*d));
        if all.clone().any(|weight| !weight.is_finite() || weight < 0.0) {
            return Err(ConfigError::Message(
                "scoring.weights must be finite and non-negative".to_string(),
            ));
        }
        if all.sum::<f64>() <= 0.0 {
            return Err(ConfigError::Message(
                "scoring.weights must not all be zero".to_string(),
            ));
        }

        let t = &scoring.thresholds;
        if t.conditional > t.suitable || t.suitable > 100 {
            return Err(ConfigError::Message(format!(
                "scoring.thresholds out of order: conditional {} / suitable {}",
                t.conditional, t.suitable
            )));
        }

        let s = &scoring.steps;
        if [s.exact, s.one_step, s.two_steps, scoring.unknown_score]
            .iter()
            .any(|score| *score > 100)
        {
            return Err(ConfigError::Message(
                "scoring step and unknown scores must be within 0-100".to_string(),
            ));
        }

        Ok(ScoringPolicy {
            weights,
            thresholds: LabelThresholds {
                suitable: t.suitable,
                conditional: t.conditional,
            },
            steps: OrdinalSteps {
                exact: s.exact,
                one_step: s.one_step,
                two_steps: s.two_steps,
            },
            unknown_score: scoring.unknown_score,
            hard_dimensions: scoring.hard_dimensions.clone(),
        })
    }
}
