//! Tunables for a simulation session.

use serde::{Deserialize, Serialize};

/// Defaults and limits applied by a [`crate::Session`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Width used when a grid is requested without explicit dimensions.
    pub grid_width: u32,
    /// Height used when a grid is requested without explicit dimensions.
    pub grid_height: u32,
    /// Health given to vessels created without an explicit value.
    pub default_health: u32,
    /// Largest health a vessel may be created with. Unbounded by default.
    pub max_health: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            grid_width: 50,
            grid_height: 50,
            default_health: 2,
            max_health: u32::MAX,
        }
    }
}
