//! Engine configuration.
//!
//! `EngineConfig` is owned by an `EngineContext` and fixes the memo cache
//! bound, the Zobrist table seed, and the endgame classifier thresholds.
//! Defaults can be overridden from the environment, which is how benches and
//! tooling pick alternative settings without code changes.

use tracing::warn;

/// Environment variable overriding [`EngineConfig::cache_capacity`].
pub const CACHE_CAPACITY_ENV: &str = "BITBOARD_RULES_CACHE_CAPACITY";
/// Environment variable overriding [`EngineConfig::zobrist_seed`].
pub const ZOBRIST_SEED_ENV: &str = "BITBOARD_RULES_ZOBRIST_SEED";

pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;
pub const DEFAULT_ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Tunables for the endgame-phase vote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndgameThresholds {
    /// Number of satisfied conditions that makes a position an endgame.
    pub required_conditions: usize,
    /// Maximum pieces on the board, kings and pawns included.
    pub max_pieces: u32,
    /// Minimum quiet king moves each king needs to count as active.
    pub active_king_moves: usize,
    /// Full turn from which the game counts as late.
    pub min_full_turns: u32,
    /// Maximum combined attack-set size of both sides.
    pub max_total_mobility: u32,
    /// Share of a side's pawns that must sit past their advancement rank.
    pub advanced_pawn_ratio: f64,
}

impl Default for EndgameThresholds {
    fn default() -> Self {
        Self {
            required_conditions: 4,
            max_pieces: 16,
            active_king_moves: 4,
            min_full_turns: 25,
            max_total_mobility: 25,
            advanced_pawn_ratio: 2.0 / 3.0,
        }
    }
}

/// Configuration shared by every position built from the same context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub cache_capacity: usize,
    pub zobrist_seed: u64,
    pub endgame: EndgameThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            zobrist_seed: DEFAULT_ZOBRIST_SEED,
            endgame: EndgameThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Build a config from process environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CACHE_CAPACITY_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => config.cache_capacity = capacity,
                _ => warn!(
                    variable = CACHE_CAPACITY_ENV,
                    value = %raw,
                    "ignoring invalid cache capacity"
                ),
            }
        }

        if let Some(raw) = lookup(ZOBRIST_SEED_ENV) {
            match parse_seed(raw.trim()) {
                Some(seed) => config.zobrist_seed = seed,
                None => warn!(
                    variable = ZOBRIST_SEED_ENV,
                    value = %raw,
                    "ignoring invalid zobrist seed"
                ),
            }
        }

        config
    }

    #[inline]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity.max(1);
        self
    }

    #[inline]
    pub fn with_zobrist_seed(mut self, seed: u64) -> Self {
        self.zobrist_seed = seed;
        self
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16).ok(),
        None => raw.parse::<u64>().ok(),
    }
}
