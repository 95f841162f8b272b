//! TOTP crate: sub-modules.

pub mod types;
pub mod base32;
pub mod uri;
pub mod validate;
pub mod core;
pub mod config;

// Re-export top-level items for convenience.
pub use types::*;
pub use config::TotpSettings;
pub use self::core::{generate_totp, generate_totp_at, progress, time_remaining, TotpGenerator};
pub use uri::{is_otpauth_uri, parse_otpauth_uri};
pub use validate::{extract_key_data, normalize_secret, validate_secret};
