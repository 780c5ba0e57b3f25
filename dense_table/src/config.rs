//! Resizing parameters of a dense table.
use hashkit_util::{Error, Result};

/// Load-factor limits controlling when a [`DenseHashTable`][crate::DenseHashTable] is rebuilt.
///
/// The table is rebuilt before an insertion would push the fraction of used buckets (live entries
/// plus tombstones) above `max_load`. A rebuild shrinks the table only when the live entries have
/// dropped below `min_load` of the current capacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    max_load: f64,
    min_load: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_load: Self::DEFAULT_MAX_LOAD,
            min_load: Self::DEFAULT_MIN_LOAD,
        }
    }
}

impl TableConfig {
    /// Default upper load factor.
    pub const DEFAULT_MAX_LOAD: f64 = 0.5;
    /// Default lower load factor.
    pub const DEFAULT_MIN_LOAD: f64 = 0.2;

    /// Returns the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the upper load factor.
    pub fn with_max_load(mut self, max_load: f64) -> Self {
        self.max_load = max_load;
        self
    }

    /// Sets the lower load factor.
    pub fn with_min_load(mut self, min_load: f64) -> Self {
        self.min_load = min_load;
        self
    }

    /// Returns the upper load factor.
    pub fn max_load(&self) -> f64 {
        self.max_load
    }

    /// Returns the lower load factor.
    pub fn min_load(&self) -> f64 {
        self.min_load
    }

    /// Checks that the load factors are usable.
    ///
    /// `max_load` must lie strictly between 0 and 1. `min_load` must be non-negative and below
    /// half of `max_load`, so that a table that was just shrunk is not immediately grown again.
    pub fn validate(&self) -> Result<()> {
        if !(self.max_load > 0.0 && self.max_load < 1.0) {
            return Err(Error::config_invalid("max_load must be in the open interval (0, 1)")
                .with_context("max_load", self.max_load));
        }
        if !(self.min_load >= 0.0 && self.min_load < self.max_load / 2.0) {
            return Err(
                Error::config_invalid("min_load must be in the interval [0, max_load / 2)")
                    .with_context("min_load", self.min_load)
                    .with_context("max_load", self.max_load),
            );
        }
        Ok(())
    }
}
