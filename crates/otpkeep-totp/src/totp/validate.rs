//! Secret validation and normalisation.
//!
//! One entry point accepts whatever the user pasted (a raw Base32 secret in
//! any case and spacing, or an `otpauth://` URI) and returns either a
//! [`CanonicalSecret`] or the reason it was rejected.

use crate::totp::base32;
use crate::totp::types::*;
use crate::totp::uri;

/// Strip surrounding and interior whitespace and upper-case.
///
/// `normalize_secret("jbsw y3dp ehpk 3pxp") == "JBSWY3DPEHPK3PXP"`
pub fn normalize_secret(secret: &str) -> String {
    base32::normalize(secret.trim())
}

/// Validate free-form user input and produce a canonical secret.
pub fn validate_secret(input: &str) -> ValidationResult {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return invalid(InvalidReason::Empty);
    }

    if uri::is_otpauth_uri(trimmed) {
        return match uri::parse_otpauth_uri(trimmed) {
            Ok(record) => ValidationResult::Valid { secret: record.secret },
            Err(e) => {
                log::debug!("rejected otpauth URI input: {}", e);
                invalid(InvalidReason::InvalidUri)
            }
        };
    }

    validate_raw_secret(trimmed)
}

/// Validate input known to be a raw secret (never a URI).
pub(crate) fn validate_raw_secret(input: &str) -> ValidationResult {
    let normalized = normalize_secret(input);
    if normalized.is_empty() {
        return invalid(InvalidReason::Empty);
    }

    if !base32::is_padded_alphabet(&normalized) {
        return invalid(InvalidReason::BadAlphabet);
    }

    if base32::significant_len(&normalized) < MIN_SECRET_SYMBOLS {
        return invalid(InvalidReason::TooShort);
    }

    if let Err(e) = base32::decode(&normalized) {
        log::debug!("secret passed alphabet checks but failed to decode: {}", e);
        return invalid(InvalidReason::Undecodable);
    }

    ValidationResult::Valid {
        secret: CanonicalSecret::from_checked(normalized),
    }
}

/// Pull the secret (and a remark, for URIs) out of user input.
pub fn extract_key_data(input: &str) -> Result<KeyData, InvalidReason> {
    if uri::is_otpauth_uri(input) {
        let record = uri::parse_otpauth_uri(input).map_err(|e| {
            log::debug!("rejected otpauth URI input: {}", e);
            InvalidReason::InvalidUri
        })?;
        return Ok(KeyData {
            secret: record.secret,
            remark: Some(record.display_label),
        });
    }

    let secret = validate_secret(input).into_result()?;
    Ok(KeyData { secret, remark: None })
}

fn invalid(reason: InvalidReason) -> ValidationResult {
    ValidationResult::Invalid { reason }
}
