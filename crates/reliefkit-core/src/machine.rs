//! Machine feed-rate configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, ParameterResult};

/// Feed rates for the three classes of machine motion, in units per minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRates {
    /// Rapid (non-cutting) moves.
    pub jog_speed: f64,
    /// Lateral cutting moves.
    pub work_speed: f64,
    /// Vertical engagement moves.
    pub plunge_speed: f64,
}

impl Default for FeedRates {
    fn default() -> Self {
        Self {
            jog_speed: 3000.0,
            work_speed: 1200.0,
            plunge_speed: 300.0,
        }
    }
}

impl FeedRates {
    pub fn validate(&self) -> ParameterResult<()> {
        for (name, value) in [
            ("jog_speed", self.jog_speed),
            ("work_speed", self.work_speed),
            ("plunge_speed", self.plunge_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: format!("feed rate must be positive, got {}", value),
                });
            }
        }
        Ok(())
    }
}
