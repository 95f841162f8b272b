//! Core OTP generation: RFC 6238 (TOTP) on top of the RFC 4226 truncation.
//!
//! HMAC-SHA1 keyed with the decoded secret over an 8-byte big-endian
//! time-step counter, dynamic truncation to a 31-bit value, and the
//! window-progress helpers used to drive a countdown display. Every
//! function re-reads the wall clock; nothing is cached between calls.

use crate::totp::base32;
use crate::totp::config::{TotpSettings, MAX_DIGITS};
use crate::totp::types::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute a code for raw key bytes and a counter.
pub fn hotp_raw(key: &[u8], counter: u64, digits: u32) -> Result<String, TotpError> {
    check_digits(digits)?;
    let digest = hmac_sha1(key, &counter.to_be_bytes())?;
    Ok(pad_code(truncate(&digest), digits))
}

/// HMAC-SHA1(key, message).
fn hmac_sha1(key: &[u8], message: &[u8]) -> Result<[u8; 20], TotpError> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key).map_err(|e| {
        TotpError::new(TotpErrorKind::DecodeFailure, "Secret rejected as HMAC key")
            .with_detail(e.to_string())
    })?;
    mac.update(message);
    let mut digest = [0u8; 20];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(digest: &[u8; 20]) -> u32 {
    let offset = (digest[19] & 0x0f) as usize;
    ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32)
}

/// Reduce a truncated value to `digits` decimal digits, zero-padded.
fn pad_code(value: u32, digits: u32) -> String {
    let code = value % 10u32.pow(digits);
    format!("{:0>width$}", code, width = digits as usize)
}

fn check_digits(digits: u32) -> Result<(), TotpError> {
    if digits == 0 || digits > MAX_DIGITS {
        return Err(TotpError::new(
            TotpErrorKind::InvalidDigits,
            format!("Digits must be between 1 and {}", MAX_DIGITS),
        )
        .with_detail(format!("got {}", digits)));
    }
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (time-based, RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Generate a code for a Base32 secret at the current time.
pub fn generate_totp(secret: impl AsRef<str>, step: u64, digits: u32) -> Result<String, TotpError> {
    generate_totp_at(secret, step, digits, current_unix_time())
}

/// Generate a code at an explicit unix timestamp.
pub fn generate_totp_at(
    secret: impl AsRef<str>,
    step: u64,
    digits: u32,
    unix_seconds: u64,
) -> Result<String, TotpError> {
    if step == 0 {
        return Err(TotpError::new(
            TotpErrorKind::InvalidStep,
            "Time-step must be at least one second",
        ));
    }
    check_digits(digits)?;

    let key = decode_key(secret.as_ref())?;
    hotp_raw(&key, time_step_at(unix_seconds, step), digits)
}

/// Decode a Base32 secret into HMAC key bytes.
fn decode_key(secret: &str) -> Result<Vec<u8>, TotpError> {
    let key = base32::decode(secret).map_err(|e| {
        TotpError::new(TotpErrorKind::DecodeFailure, "Secret is not valid Base32")
            .with_detail(e.to_string())
    })?;
    if key.is_empty() {
        return Err(TotpError::new(
            TotpErrorKind::DecodeFailure,
            "Secret decodes to an empty key",
        ));
    }
    Ok(key)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Time-window helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// A zero step is treated as one second so the helpers never divide by zero.

/// Current time-step counter.
pub fn time_step(step: u64) -> u64 {
    time_step_at(current_unix_time(), step)
}

/// Time-step counter for a given unix timestamp.
pub fn time_step_at(unix_seconds: u64, step: u64) -> u64 {
    unix_seconds / step.max(1)
}

/// Seconds until the current window rolls over, in `1..=step`.
pub fn time_remaining(step: u64) -> u64 {
    time_remaining_at(current_unix_time(), step)
}

/// Seconds remaining for a specific timestamp.
pub fn time_remaining_at(unix_seconds: u64, step: u64) -> u64 {
    let step = step.max(1);
    step - unix_seconds % step
}

/// Percentage of the current window already elapsed, in `0.0..100.0`.
pub fn progress(step: u64) -> f64 {
    progress_at(current_unix_time(), step)
}

/// Progress percentage for a specific timestamp.
pub fn progress_at(unix_seconds: u64, step: u64) -> f64 {
    let step = step.max(1);
    let elapsed = step - time_remaining_at(unix_seconds, step);
    elapsed as f64 / step as f64 * 100.0
}

/// Current unix timestamp in seconds.
fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generator with settings
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Code generator bound to one step/digits profile.
///
/// Holds no secret material; each call takes the secret it works on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TotpGenerator {
    settings: TotpSettings,
}

impl TotpGenerator {
    /// Generator with the default 30-second, 6-digit profile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TotpSettings) -> Result<Self, TotpError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> TotpSettings {
        self.settings
    }

    pub fn generate(&self, secret: impl AsRef<str>) -> Result<String, TotpError> {
        generate_totp(secret, self.settings.step, self.settings.digits)
    }

    pub fn generate_at(&self, secret: impl AsRef<str>, unix_seconds: u64) -> Result<String, TotpError> {
        generate_totp_at(secret, self.settings.step, self.settings.digits, unix_seconds)
    }

    pub fn time_remaining(&self) -> u64 {
        time_remaining(self.settings.step)
    }

    pub fn progress(&self) -> f64 {
        progress(self.settings.step)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Display
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Format a code with a space in the middle (e.g. "123 456").
pub fn format_code_display(code: &str) -> String {
    if code.len() <= 4 || !code.is_ascii() {
        return code.to_string();
    }
    let mid = code.len() / 2;
    format!("{} {}", &code[..mid], &code[mid..])
}
