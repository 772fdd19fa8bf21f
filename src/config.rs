//! Configuration for the block graph engine.

/// Default number of document snapshots whose indexes are kept alive.
pub const DEFAULT_INDEX_CACHE_CAPACITY: usize = 8;

/// Default weight of `left` in the key/value reading-order key.
pub const DEFAULT_READING_ORDER_WEIGHT: f64 = 0.05;

/// Default factor used to quantize `top` differences when ordering matches.
///
/// Two tops are on the same visual line when `floor(|a - b| * factor) == 0`.
pub const DEFAULT_LINE_QUANTIZATION: f64 = 100.0;

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Maximum number of snapshot indexes held by an [`IndexCache`](crate::index::IndexCache).
    pub index_cache_capacity: usize,

    /// Weight applied to `left` when ordering key/value pairs by `top + weight * left`.
    pub reading_order_weight: f64,

    /// Quantization factor for the same-line tolerance of the search matcher.
    pub line_quantization: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            index_cache_capacity: DEFAULT_INDEX_CACHE_CAPACITY,
            reading_order_weight: DEFAULT_READING_ORDER_WEIGHT,
            line_quantization: DEFAULT_LINE_QUANTIZATION,
        }
    }

    /// Set the index cache capacity (clamped to at least one entry).
    pub fn with_index_cache_capacity(mut self, capacity: usize) -> Self {
        self.index_cache_capacity = capacity.max(1);
        self
    }

    /// Set the reading-order weight for key/value pairs.
    pub fn with_reading_order_weight(mut self, weight: f64) -> Self {
        self.reading_order_weight = weight;
        self
    }

    /// Set the same-line quantization factor for search results.
    pub fn with_line_quantization(mut self, factor: f64) -> Self {
        self.line_quantization = factor;
        self
    }
}
