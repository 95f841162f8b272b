//! Core types for the TOTP key pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Supported profile
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The only HMAC algorithm the generator implements.
pub const SUPPORTED_ALGORITHM: &str = "SHA1";
/// Default number of digits in a generated code.
pub const DEFAULT_DIGITS: u32 = 6;
/// Default time-step in seconds.
pub const DEFAULT_STEP: u64 = 30;
/// Minimum number of Base32 symbols (excluding padding) in a secret.
pub const MIN_SECRET_SYMBOLS: usize = 8;
/// Display label used when a URI names neither issuer nor account.
pub const UNNAMED_KEY_LABEL: &str = "Unnamed Key";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Canonical secret
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A validated shared secret in canonical Base32 text form.
///
/// Upper case, no whitespace, alphabet `A–Z2–7` with optional trailing `=`
/// and at least [`MIN_SECRET_SYMBOLS`] significant symbols. Values only come
/// out of the validator or the URI parser, so every instance decodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CanonicalSecret(String);

impl CanonicalSecret {
    /// Wrap text that has already passed alphabet, length and decode checks.
    pub(crate) fn from_checked(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CanonicalSecret {
    type Err = InvalidReason;

    /// Parse raw Base32 text (not a URI) into its canonical form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::totp::validate::validate_raw_secret(s).into_result()
    }
}

impl TryFrom<String> for CanonicalSecret {
    type Error = InvalidReason;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CanonicalSecret> for String {
    fn from(secret: CanonicalSecret) -> String {
        secret.0
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  otpauth:// record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Non-fatal divergence of a parsed URI from the supported profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CompatibilityNotice {
    /// `algorithm` was something other than SHA1.
    UnsupportedAlgorithm(String),
    /// `digits` was not 6 (or not a number).
    UnsupportedDigits(String),
    /// `period` was not 30 (or not a number).
    UnsupportedPeriod(String),
}

impl fmt::Display for CompatibilityNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedAlgorithm(v) => {
                write!(f, "algorithm '{}' requested; only SHA1 is guaranteed to be supported", v)
            }
            Self::UnsupportedDigits(v) => {
                write!(f, "digits '{}' requested; only 6-digit codes are guaranteed to be supported", v)
            }
            Self::UnsupportedPeriod(v) => {
                write!(f, "period '{}' requested; only a 30-second period is guaranteed to be supported", v)
            }
        }
    }
}

/// The parsed content of one `otpauth://totp/...` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpAuthRecord {
    /// Validated, normalised secret.
    pub secret: CanonicalSecret,
    /// Human-readable label, e.g. `"Google (user@example.com)"`.
    pub display_label: String,
    /// Issuer; the query parameter wins over the path prefix.
    pub issuer: Option<String>,
    /// Account name from the path.
    pub account: Option<String>,
    /// Requested algorithm (informational only).
    pub algorithm: String,
    /// Requested digit count (informational only).
    pub digits: u32,
    /// Requested period in seconds (informational only).
    pub period: u64,
    /// Advisories raised while parsing.
    pub notices: Vec<CompatibilityNotice>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Why a piece of user input was rejected as a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    #[error("Secret is empty")]
    Empty,
    #[error("Invalid Base32 format. Only A-Z, 2-7, and = are allowed")]
    BadAlphabet,
    #[error("Secret must be at least 8 characters (excluding padding)")]
    TooShort,
    #[error("Secret cannot be decoded as valid Base32")]
    Undecodable,
    #[error("Invalid OTPAuth URI format")]
    InvalidUri,
}

/// Outcome of validating one piece of user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid { secret: CanonicalSecret },
    Invalid { reason: InvalidReason },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn secret(&self) -> Option<&CanonicalSecret> {
        match self {
            Self::Valid { secret } => Some(secret),
            Self::Invalid { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid { reason } => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<CanonicalSecret, InvalidReason> {
        match self {
            Self::Valid { secret } => Ok(secret),
            Self::Invalid { reason } => Err(reason),
        }
    }
}

/// What an input form needs in order to store a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyData {
    pub secret: CanonicalSecret,
    /// Display label taken from an `otpauth://` URI, if the input was one.
    pub remark: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Base32 codec failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Base32Error {
    #[error("Invalid Base32 character: {0:?}")]
    InvalidCharacter(char),
}

/// Error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TotpErrorKind {
    InvalidCharacter,
    MalformedUri,
    UnsupportedScheme,
    UnsupportedType,
    MissingSecret,
    InvalidSecret,
    DecodeFailure,
    InvalidStep,
    InvalidDigits,
    InvalidConfig,
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpError {
    pub kind: TotpErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for TotpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for TotpError {}

impl TotpError {
    pub fn new(kind: TotpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<Base32Error> for TotpError {
    fn from(e: Base32Error) -> Self {
        match e {
            Base32Error::InvalidCharacter(ch) => {
                TotpError::new(TotpErrorKind::InvalidCharacter, e.to_string())
                    .with_detail(format!("U+{:04X}", ch as u32))
            }
        }
    }
}

impl From<TotpError> for String {
    fn from(e: TotpError) -> String {
        e.to_string()
    }
}
