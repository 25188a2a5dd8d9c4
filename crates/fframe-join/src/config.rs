//! Join configuration.

use serde::{Deserialize, Serialize};

use fframe_error::{FrameError, Result};

/// Suffix appended to a right-table column whose name is already taken.
pub const DEFAULT_RIGHT_SUFFIX: &str = " (right)";

/// Radix base above which composite key codes are compacted.
pub const DEFAULT_MAX_KEY_SPACE: usize = 1 << 24;

/// How NA key values take part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaKeyPolicy {
    /// NA is an ordinary key value: NA keys pool together and match each other.
    #[default]
    Match,
    /// NA keys never match anything (SQL semantics). Rows with an NA key are
    /// kept as unmatched rows by outer joins and dropped by inner joins.
    Distinct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Appended to colliding right-table column names.
    pub right_suffix: String,
    /// NA key handling.
    pub na_keys: NaKeyPolicy,
    /// Largest composite-key radix base kept before codes are compacted.
    pub max_key_space: usize,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            right_suffix: DEFAULT_RIGHT_SUFFIX.to_owned(),
            na_keys: NaKeyPolicy::default(),
            max_key_space: DEFAULT_MAX_KEY_SPACE,
        }
    }
}

impl JoinConfig {
    #[must_use]
    pub fn with_right_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.right_suffix = suffix.into();
        self
    }

    #[must_use]
    pub const fn with_na_keys(mut self, policy: NaKeyPolicy) -> Self {
        self.na_keys = policy;
        self
    }

    #[must_use]
    pub const fn with_max_key_space(mut self, limit: usize) -> Self {
        self.max_key_space = limit;
        self
    }

    /// Check that every setting is usable.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::InvalidConfig`] for an empty right suffix (a
    /// collision could not be resolved) or a zero key-space limit.
    pub fn validate(&self) -> Result<()> {
        if self.right_suffix.is_empty() {
            return Err(FrameError::InvalidConfig(
                "right_suffix must not be empty".to_owned(),
            ));
        }
        if self.max_key_space == 0 {
            return Err(FrameError::InvalidConfig(
                "max_key_space must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
