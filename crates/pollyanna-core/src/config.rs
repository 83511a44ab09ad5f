//! Draw configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PairingError, Result};

/// Years of history that feed the exclusion sets by default.
pub const DEFAULT_MEMORY_LENGTH: usize = 3;

/// Outer retries before a draw is declared infeasible.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5000;

/// Knobs accepted at the draw boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawConfig {
    /// How many prior years feed the exclusion sets
    pub memory_length: usize,
    /// Safety cap on full regular+gag redraws
    pub max_attempts: usize,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            memory_length: DEFAULT_MEMORY_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl DrawConfig {
    pub fn new(memory_length: usize, max_attempts: usize) -> Self {
        Self {
            memory_length,
            max_attempts,
        }
    }

    pub fn with_memory_length(mut self, memory_length: usize) -> Self {
        self.memory_length = memory_length;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.memory_length == 0 {
            return Err(PairingError::InvalidConfig(
                "memory_length must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(PairingError::InvalidConfig(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
