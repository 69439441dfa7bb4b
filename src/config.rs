use std::path::Path;

use crate::error::ConfigError;
use crate::game::{MAX_SIZE, MIN_SIZE};

const BOARD_SIZES: usize = MAX_SIZE - MIN_SIZE + 1;

/// Minimax depth tables and cache bound.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Cache is cleared wholesale once it grows past this many entries.
    pub cache_capacity: usize,
    /// Advanced-tier depth per connection board size, 3×3 first.
    pub advanced_depths: Vec<usize>,
    /// Master-tier depth per connection board size, 3×3 first.
    pub master_depths: Vec<usize>,
    pub drop_advanced_depth: usize,
    pub drop_master_depth: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            cache_capacity: 10_000,
            advanced_depths: vec![6, 4, 3, 2, 2],
            master_depths: vec![9, 6, 4, 3, 3],
            drop_advanced_depth: 5,
            drop_master_depth: 7,
        }
    }
}

/// Monte Carlo tree search settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Iterations on a 6×6 board; larger boards get proportionally fewer.
    pub iterations: usize,
    /// Exploration constant in UCB1.
    pub exploration: f64,
    /// Master uses MCTS instead of Minimax on connection boards this large.
    pub min_board_size: usize,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            iterations: 1000,
            exploration: std::f64::consts::SQRT_2,
            min_board_size: 6,
        }
    }
}

/// Deliberate weaknesses of the lowest tier.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NoviceConfig {
    /// Chance of noticing and blocking an opponent's immediate win.
    pub block_probability: f64,
    /// Chance of playing a uniformly random move instead of the center/corner rule.
    pub random_move_probability: f64,
}

impl Default for NoviceConfig {
    fn default() -> Self {
        NoviceConfig {
            block_probability: 0.35,
            random_move_probability: 0.5,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OpeningConfig {
    /// The book is only consulted while at least this many moves remain.
    pub min_legal_moves: usize,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        OpeningConfig { min_legal_moves: 8 }
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed RNG seed; entropy from the OS when absent.
    pub seed: Option<u64>,
    pub search: SearchConfig,
    pub mcts: MctsConfig,
    pub novice: NoviceConfig,
    pub opening: OpeningConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: EngineConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.cache_capacity == 0 {
            return Err(ConfigError::Validation(
                "search.cache_capacity must be >= 1".into(),
            ));
        }
        for (name, table) in [
            ("search.advanced_depths", &self.search.advanced_depths),
            ("search.master_depths", &self.search.master_depths),
        ] {
            if table.len() != BOARD_SIZES {
                return Err(ConfigError::Validation(format!(
                    "{name} must have {BOARD_SIZES} entries (sizes {MIN_SIZE}..={MAX_SIZE})"
                )));
            }
            if table.contains(&0) {
                return Err(ConfigError::Validation(format!("{name} entries must be >= 1")));
            }
        }
        if self.search.drop_advanced_depth == 0 || self.search.drop_master_depth == 0 {
            return Err(ConfigError::Validation(
                "search.drop_*_depth must be >= 1".into(),
            ));
        }

        if self.mcts.iterations == 0 {
            return Err(ConfigError::Validation(
                "mcts.iterations must be >= 1".into(),
            ));
        }
        if !(self.mcts.exploration.is_finite() && self.mcts.exploration > 0.0) {
            return Err(ConfigError::Validation(
                "mcts.exploration must be a finite number > 0".into(),
            ));
        }
        if !(MIN_SIZE..=MAX_SIZE).contains(&self.mcts.min_board_size) {
            return Err(ConfigError::Validation(format!(
                "mcts.min_board_size must be in {MIN_SIZE}..={MAX_SIZE}"
            )));
        }

        for (name, p) in [
            ("novice.block_probability", self.novice.block_probability),
            (
                "novice.random_move_probability",
                self.novice.random_move_probability,
            ),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Validation(format!("{name} must be in [0, 1]")));
            }
        }

        Ok(())
    }

    /// Minimax depth for the Advanced tier on a connection board of `size`.
    pub fn advanced_depth(&self, size: usize) -> usize {
        depth_for(&self.search.advanced_depths, size)
    }

    /// Minimax depth for the Master tier on a connection board of `size`.
    pub fn master_depth(&self, size: usize) -> usize {
        depth_for(&self.search.master_depths, size)
    }

    /// MCTS iteration budget, scaled down for boards larger than 6×6.
    pub fn mcts_iterations(&self, cells: usize) -> usize {
        let scaled = self.mcts.iterations.saturating_mul(36) / cells.max(36);
        scaled.max(1)
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&EngineConfig::default()).unwrap_or_default()
    }
}

fn depth_for(table: &[usize], size: usize) -> usize {
    let idx = size.clamp(MIN_SIZE, MAX_SIZE) - MIN_SIZE;
    table.get(idx).or(table.last()).copied().unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[mcts]
iterations = 250
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mcts.iterations, 250);
        assert!((config.mcts.exploration - std::f64::consts::SQRT_2).abs() < 1e-9);
        assert_eq!(config.search.cache_capacity, 10_000);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        let default = EngineConfig::default();
        assert_eq!(config.search.master_depths, default.search.master_depths);
        assert_eq!(config.opening.min_legal_moves, default.opening.min_legal_moves);
    }

    #[test]
    fn test_depth_lookup_by_size() {
        let config = EngineConfig::default();
        assert_eq!(config.master_depth(3), 9);
        assert_eq!(config.advanced_depth(4), 4);
        assert_eq!(config.advanced_depth(7), 2);
    }

    #[test]
    fn test_mcts_iterations_scale_down() {
        let config = EngineConfig::default();
        assert_eq!(config.mcts_iterations(36), 1000);
        assert!(config.mcts_iterations(49) < 1000);
        assert_eq!(config.mcts_iterations(9), 1000);
    }

    #[test]
    fn test_mcts_iterations_do_not_overflow() {
        let mut config = EngineConfig::default();
        config.mcts.iterations = usize::MAX;
        assert_eq!(config.mcts_iterations(36), usize::MAX / 36);
        assert!(config.mcts_iterations(49) > 0);
    }

    #[test]
    fn test_validation_rejects_short_depth_table() {
        let mut config = EngineConfig::default();
        config.search.advanced_depths = vec![3, 2];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = EngineConfig::default();
        config.search.master_depths[2] = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_cache_capacity() {
        let mut config = EngineConfig::default();
        config.search.cache_capacity = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_iterations() {
        let mut config = EngineConfig::default();
        config.mcts.iterations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_exploration() {
        let mut config = EngineConfig::default();
        config.mcts.exploration = 0.0;
        assert!(config.validate().is_err());
        config.mcts.exploration = f64::NAN;
        assert!(config.validate().is_err());
        config.mcts.exploration = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_probability_out_of_range() {
        let mut config = EngineConfig::default();
        config.novice.block_probability = 1.5;
        assert!(config.validate().is_err());
        config.novice.block_probability = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_mcts_board_size() {
        let mut config = EngineConfig::default();
        config.mcts.min_board_size = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = EngineConfig::load_or_default(Path::new("nonexistent_engine.toml")).unwrap();
        assert_eq!(config.mcts.iterations, 1000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
seed = 42

[novice]
block_probability = 0.4
"#
        )
        .unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.seed, Some(42));
        assert!((config.novice.block_probability - 0.4).abs() < 1e-9);
        assert!((config.novice.random_move_probability - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[mcts]\niterations = 0\n").unwrap();
        assert!(matches!(
            EngineConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = EngineConfig::default_toml();
        let config: EngineConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
    }
}
