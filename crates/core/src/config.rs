//! Configuration system for the branch predictors.
//!
//! This module defines the configuration structures used to parameterize the
//! prediction core. It provides:
//! 1. **Defaults:** Baseline table sizes, history widths and tag widths.
//! 2. **Structures:** A small config tree with one block per non-trivial scheme.
//! 3. **Selector:** The scheme chosen for the run (Static, GShare, Tournament, Custom).
//! 4. **Validation:** Parameter checks performed before any table is allocated.
//!
//! Configuration is supplied as JSON by the host simulator (`Config::from_json`) or
//! built with `Config::default()`.

use std::fmt;

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the predictors.
mod defaults {
    /// Gshare global history width in bits (2^15-entry pattern table).
    pub const GHISTORY_BITS: u32 = 15;

    /// Tournament global history width (log2 of the global and choice tables, 4096 entries).
    pub const TOURNAMENT_GLOBAL_BITS: u32 = 12;

    /// Tournament local history table size (log2, 1024 per-address registers).
    pub const TOURNAMENT_LOCAL_HIST_BITS: u32 = 10;

    /// Tournament local history width (log2 of the local counter table, 1024 entries).
    pub const TOURNAMENT_LOCAL_PRED_BITS: u32 = 10;

    /// Custom predictor base bimodal table size (256 entries).
    pub const CUSTOM_BASE_SIZE: usize = 256;

    /// Custom predictor tagged table sizes, shortest history first.
    pub const CUSTOM_TABLE_SIZES: [usize; 4] = [4096, 2048, 1024, 512];

    /// Custom predictor tagged table history lengths in bits.
    pub const CUSTOM_HISTORY_LENGTHS: [u32; 4] = [4, 8, 16, 32];

    /// Custom predictor tagged table tag widths in bits.
    pub const CUSTOM_TAG_WIDTHS: [u32; 4] = [8, 10, 10, 12];
}

/// Largest log2 table size accepted for any pattern table.
pub const MAX_TABLE_BITS: u32 = 28;

/// Largest history length a tagged table may fold (one 64-bit register).
pub const MAX_HISTORY_LENGTH: u32 = 64;

/// Largest tag width a tagged entry can hold.
pub const MAX_TAG_BITS: u32 = 16;

/// Branch prediction scheme selector.
///
/// Exactly one scheme is active per run; it is chosen here and never changes
/// while the run lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPredictor {
    /// Always predicts taken and never trains.
    #[default]
    Static,
    /// Global history XOR address indexed pattern table.
    #[serde(alias = "Gshare")]
    GShare,
    /// Local and global sub-predictors arbitrated by a choice table.
    Tournament,
    /// Base bimodal table plus tagged tables of increasing history length.
    #[serde(alias = "Tage", alias = "TAGE")]
    Custom,
}

impl fmt::Display for BranchPredictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Static => "Static",
            Self::GShare => "Gshare",
            Self::Tournament => "Tournament",
            Self::Custom => "Custom",
        };
        f.write_str(name)
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use bpred_core::config::{BranchPredictor, Config};
///
/// let json = r#"{
///     "predictor": {
///         "branch_predictor": "Tournament",
///         "tournament": { "global_size_bits": 10 }
///     }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.predictor.branch_predictor, BranchPredictor::Tournament);
/// assert_eq!(config.predictor.tournament.global_size_bits, 10);
/// assert_eq!(config.predictor.tournament.local_hist_bits, 10);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Predictor selection and per-scheme parameters
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// Missing fields take their documented defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown scheme
    /// names, and any validation error from [`Config::validate`].
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter block, including those of inactive schemes.
    ///
    /// # Errors
    ///
    /// Returns the first parameter that cannot describe a valid table layout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.predictor.validate()
    }
}

/// Scheme selection and per-scheme parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictorConfig {
    /// Active prediction scheme
    #[serde(default)]
    pub branch_predictor: BranchPredictor,

    /// Gshare history width in bits (the pattern table has 2^bits entries)
    #[serde(default = "PredictorConfig::default_ghistory_bits")]
    pub ghistory_bits: u32,

    /// Tournament predictor configuration
    #[serde(default)]
    pub tournament: TournamentConfig,

    /// Custom (tagged multi-table) predictor configuration
    #[serde(default, alias = "tage")]
    pub custom: CustomConfig,
}

impl PredictorConfig {
    /// Returns the default gshare history width.
    const fn default_ghistory_bits() -> u32 {
        defaults::GHISTORY_BITS
    }

    /// Validates the gshare width and both parameter blocks.
    ///
    /// # Errors
    ///
    /// Returns the first rejected parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_width("gshare history", self.ghistory_bits, MAX_TABLE_BITS)?;
        self.tournament.validate()?;
        self.custom.validate()
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            branch_predictor: BranchPredictor::default(),
            ghistory_bits: defaults::GHISTORY_BITS,
            tournament: TournamentConfig::default(),
            custom: CustomConfig::default(),
        }
    }
}

/// Tournament branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TournamentConfig {
    /// Global history width; also log2 of the global and choice tables
    #[serde(default = "TournamentConfig::default_global")]
    pub global_size_bits: u32,

    /// Local history table size (log2); selects the register by low address bits
    #[serde(default = "TournamentConfig::default_local_hist")]
    pub local_hist_bits: u32,

    /// Local history width; also log2 of the local counter table
    #[serde(default = "TournamentConfig::default_local_pred")]
    pub local_pred_bits: u32,
}

impl TournamentConfig {
    /// Returns the default global history width.
    const fn default_global() -> u32 {
        defaults::TOURNAMENT_GLOBAL_BITS
    }

    /// Returns the default local history table size (log2).
    const fn default_local_hist() -> u32 {
        defaults::TOURNAMENT_LOCAL_HIST_BITS
    }

    /// Returns the default local history width.
    const fn default_local_pred() -> u32 {
        defaults::TOURNAMENT_LOCAL_PRED_BITS
    }

    /// Validates the three table widths.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WidthOutOfRange`] for a zero or oversized width.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_width("tournament global history", self.global_size_bits, MAX_TABLE_BITS)?;
        check_width("tournament local table", self.local_hist_bits, MAX_TABLE_BITS)?;
        check_width("tournament local history", self.local_pred_bits, MAX_TABLE_BITS)
    }
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            global_size_bits: defaults::TOURNAMENT_GLOBAL_BITS,
            local_hist_bits: defaults::TOURNAMENT_LOCAL_HIST_BITS,
            local_pred_bits: defaults::TOURNAMENT_LOCAL_PRED_BITS,
        }
    }
}

/// Custom (tagged multi-table) predictor configuration.
///
/// The three per-table lists are ordered from the shortest history to the
/// longest and must have equal lengths.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomConfig {
    /// Entries in the base bimodal table
    #[serde(default = "CustomConfig::default_base_size")]
    pub base_size: usize,

    /// Entries in each tagged table
    #[serde(default = "CustomConfig::default_table_sizes")]
    pub table_sizes: Vec<usize>,

    /// Global history bits folded into each tagged table's index and tag
    #[serde(default = "CustomConfig::default_history_lengths")]
    pub history_lengths: Vec<u32>,

    /// Tag width of each tagged table
    #[serde(default = "CustomConfig::default_tag_widths")]
    pub tag_widths: Vec<u32>,
}

impl CustomConfig {
    /// Returns the default base table size.
    const fn default_base_size() -> usize {
        defaults::CUSTOM_BASE_SIZE
    }

    /// Returns the default tagged table sizes: [4096, 2048, 1024, 512].
    fn default_table_sizes() -> Vec<usize> {
        defaults::CUSTOM_TABLE_SIZES.to_vec()
    }

    /// Returns the default history lengths: [4, 8, 16, 32].
    fn default_history_lengths() -> Vec<u32> {
        defaults::CUSTOM_HISTORY_LENGTHS.to_vec()
    }

    /// Returns the default tag widths: [8, 10, 10, 12].
    fn default_tag_widths() -> Vec<u32> {
        defaults::CUSTOM_TAG_WIDTHS.to_vec()
    }

    /// Number of tagged tables described.
    pub fn num_tables(&self) -> usize {
        self.table_sizes.len()
    }

    /// Validates table shapes and the history-length ordering.
    ///
    /// # Errors
    ///
    /// Returns the first rejected parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pow2("custom base table", self.base_size)?;

        if self.history_lengths.len() != self.table_sizes.len()
            || self.tag_widths.len() != self.table_sizes.len()
        {
            return Err(ConfigError::TableCountMismatch {
                sizes: self.table_sizes.len(),
                history_lengths: self.history_lengths.len(),
                tag_widths: self.tag_widths.len(),
            });
        }

        for &size in &self.table_sizes {
            check_pow2("custom tagged table", size)?;
        }
        for &bits in &self.tag_widths {
            check_width("custom tag", bits, MAX_TAG_BITS)?;
        }

        let mut previous = 0;
        for (index, &length) in self.history_lengths.iter().enumerate() {
            check_width("custom history", length, MAX_HISTORY_LENGTH)?;
            if index > 0 && length <= previous {
                return Err(ConfigError::HistoryNotIncreasing {
                    index,
                    length,
                    previous,
                });
            }
            previous = length;
        }
        Ok(())
    }
}

impl Default for CustomConfig {
    fn default() -> Self {
        Self {
            base_size: defaults::CUSTOM_BASE_SIZE,
            table_sizes: Self::default_table_sizes(),
            history_lengths: Self::default_history_lengths(),
            tag_widths: Self::default_tag_widths(),
        }
    }
}

fn check_width(what: &'static str, bits: u32, max: u32) -> Result<(), ConfigError> {
    if bits == 0 || bits > max {
        return Err(ConfigError::WidthOutOfRange { what, bits, max });
    }
    Ok(())
}

fn check_pow2(table: &'static str, size: usize) -> Result<(), ConfigError> {
    if !size.is_power_of_two() || size > 1 << MAX_TABLE_BITS {
        return Err(ConfigError::NotPowerOfTwo { table, size });
    }
    Ok(())
}
