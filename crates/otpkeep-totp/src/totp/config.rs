//! Generator settings.

use crate::totp::types::*;
use serde::{Deserialize, Serialize};

/// Largest digit count whose modulus (`10^9`) fits the 31-bit truncated value.
pub const MAX_DIGITS: u32 = 9;

/// Time-step and code length used by a [`TotpGenerator`](crate::totp::core::TotpGenerator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TotpSettings {
    /// Time-step in seconds (default: 30).
    pub step: u64,
    /// Number of digits in a code (default: 6).
    pub digits: u32,
}

impl Default for TotpSettings {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl TotpSettings {
    pub fn new(step: u64, digits: u32) -> Self {
        Self { step, digits }
    }

    /// Load settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TotpError> {
        let settings: Self = serde_json::from_str(json).map_err(|e| {
            TotpError::new(TotpErrorKind::InvalidConfig, "Invalid TOTP settings JSON")
                .with_detail(e.to_string())
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    pub fn validate(&self) -> Result<(), TotpError> {
        if self.step == 0 {
            return Err(TotpError::new(
                TotpErrorKind::InvalidConfig,
                "Time-step must be at least one second",
            ));
        }
        if self.digits == 0 || self.digits > MAX_DIGITS {
            return Err(TotpError::new(
                TotpErrorKind::InvalidConfig,
                format!("Digits must be between 1 and {}", MAX_DIGITS),
            )
            .with_detail(format!("got {}", self.digits)));
        }
        if self.step != DEFAULT_STEP || self.digits != DEFAULT_DIGITS {
            log::warn!(
                "TOTP profile {}s/{} digits differs from the widely supported 30s/6 digits",
                self.step,
                self.digits
            );
        }
        Ok(())
    }
}
