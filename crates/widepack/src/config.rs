//! Decoder resource limits.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_LEN;

pub const DEFAULT_MAX_DEPTH: usize = 128;
pub const DEFAULT_MAX_ITEMS: usize = 1 << 24;
pub const DEFAULT_MAX_STR_LEN: usize = MAX_LEN;

/// Bounds applied while decoding untrusted input.
///
/// Each decode call starts from zero; limits are not shared across calls.
/// The struct deserializes with missing fields falling back to the defaults,
/// so it can sit inside a host application's own config file:
///
/// ```
/// let limits: widepack::DecodeLimits =
///     serde_json::from_str(r#"{ "max_depth": 16 }"#).unwrap();
/// assert_eq!(limits.max_depth, 16);
/// assert_eq!(limits.max_items, widepack::config::DEFAULT_MAX_ITEMS);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeLimits {
    /// Deepest container nesting accepted: a scalar nests 0 containers,
    /// `[1]` nests 1 and `[[1]]` nests 2.
    pub max_depth: usize,
    /// Total number of values (scalars, containers, keys) a single decode may
    /// produce.
    pub max_items: usize,
    /// Longest string payload accepted, in bytes.
    pub max_str_len: usize,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_items: DEFAULT_MAX_ITEMS,
            max_str_len: DEFAULT_MAX_STR_LEN,
        }
    }
}

impl DecodeLimits {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_max_str_len(mut self, max_str_len: usize) -> Self {
        self.max_str_len = max_str_len;
        self
    }
}
