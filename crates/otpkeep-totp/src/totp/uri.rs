//! `otpauth://` URI parsing and generation per the Google Authenticator
//! key-URI format:
//! <https://github.com/google/google-authenticator/wiki/Key-Uri-Format>
//!
//! Format: `otpauth://totp/ISSUER:ACCOUNT?secret=BASE32&issuer=ISSUER&algorithm=SHA1&digits=6&period=30`
//!
//! Only the `totp` type is accepted. `algorithm`, `digits` and `period` are
//! recorded for information; values outside the supported profile produce a
//! [`CompatibilityNotice`] rather than an error.

use crate::totp::base32;
use crate::totp::types::*;

const SCHEME: &str = "otpauth";
const URI_PREFIX: &str = "otpauth://";
const TOTP_TYPE: &str = "totp";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Detect
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `true` if the trimmed input starts with `otpauth://` (any case).
pub fn is_otpauth_uri(input: &str) -> bool {
    input
        .trim()
        .get(..URI_PREFIX.len())
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case(URI_PREFIX))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Parse
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Parse an `otpauth://totp/...` URI into an [`OtpAuthRecord`].
pub fn parse_otpauth_uri(uri: &str) -> Result<OtpAuthRecord, TotpError> {
    let url = url::Url::parse(uri.trim()).map_err(|e| {
        TotpError::new(TotpErrorKind::MalformedUri, format!("Invalid URI: {}", e))
    })?;

    if url.scheme() != SCHEME {
        return Err(TotpError::new(
            TotpErrorKind::UnsupportedScheme,
            format!("Expected scheme 'otpauth', got '{}'", url.scheme()),
        ));
    }

    match url.host_str() {
        Some(TOTP_TYPE) => {}
        other => {
            return Err(TotpError::new(
                TotpErrorKind::UnsupportedType,
                format!("Only TOTP type is supported, got {:?}", other),
            ))
        }
    }

    // Path is "/ACCOUNT" or "/ISSUER:ACCOUNT"
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let (path_issuer, account) = match path.split_once(':') {
        Some((issuer, account)) => (non_empty(url_decode(issuer)?), non_empty(url_decode(account)?)),
        None => (None, non_empty(url_decode(path)?)),
    };

    // Query parameters; the first occurrence of each key wins.
    let mut secret: Option<String> = None;
    let mut param_issuer: Option<String> = None;
    let mut algorithm: Option<String> = None;
    let mut digits: Option<String> = None;
    let mut period: Option<String> = None;

    for (key, value) in url.query_pairs() {
        let slot = match key.as_ref() {
            "secret" => &mut secret,
            "issuer" => &mut param_issuer,
            "algorithm" => &mut algorithm,
            "digits" => &mut digits,
            "period" => &mut period,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.into_owned());
        }
    }

    let secret = secret.filter(|s| !s.trim().is_empty()).ok_or_else(|| {
        TotpError::new(TotpErrorKind::MissingSecret, "Missing 'secret' parameter")
    })?;
    let secret = checked_secret(&secret)?;

    let mut notices = Vec::new();

    let algorithm = non_empty(algorithm.unwrap_or_default())
        .unwrap_or_else(|| SUPPORTED_ALGORITHM.to_string());
    if !algorithm.eq_ignore_ascii_case(SUPPORTED_ALGORITHM) {
        notices.push(CompatibilityNotice::UnsupportedAlgorithm(algorithm.clone()));
    }

    let digits = match digits {
        None => DEFAULT_DIGITS,
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(d) if d == DEFAULT_DIGITS => d,
            Ok(d) => {
                notices.push(CompatibilityNotice::UnsupportedDigits(raw));
                d
            }
            Err(_) => {
                notices.push(CompatibilityNotice::UnsupportedDigits(raw));
                DEFAULT_DIGITS
            }
        },
    };

    let period = match period {
        None => DEFAULT_STEP,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(p) if p == DEFAULT_STEP => p,
            Ok(p) => {
                notices.push(CompatibilityNotice::UnsupportedPeriod(raw));
                p
            }
            Err(_) => {
                notices.push(CompatibilityNotice::UnsupportedPeriod(raw));
                DEFAULT_STEP
            }
        },
    };

    for notice in &notices {
        log::warn!("otpauth URI: {}", notice);
    }

    // Prefer issuer from query param, then from path prefix
    let issuer = param_issuer.and_then(non_empty).or(path_issuer);
    let display_label = display_label(issuer.as_deref(), account.as_deref());

    Ok(OtpAuthRecord {
        secret,
        display_label,
        issuer,
        account,
        algorithm,
        digits,
        period,
        notices,
    })
}

/// Normalise a URI secret and check it before it becomes canonical.
fn checked_secret(raw: &str) -> Result<CanonicalSecret, TotpError> {
    let normalized = base32::normalize(raw);

    if !base32::is_padded_alphabet(&normalized) || base32::significant_len(&normalized) < MIN_SECRET_SYMBOLS {
        return Err(TotpError::new(
            TotpErrorKind::InvalidSecret,
            "Invalid Base32 secret format",
        ));
    }
    base32::decode(&normalized).map_err(|e| {
        TotpError::new(TotpErrorKind::InvalidSecret, "Invalid Base32 secret format")
            .with_detail(e.to_string())
    })?;

    Ok(CanonicalSecret::from_checked(normalized))
}

/// `"Issuer (account)"`, `"Issuer"`, `"account"` or the unnamed fallback.
fn display_label(issuer: Option<&str>, account: Option<&str>) -> String {
    match (issuer, account) {
        (Some(iss), Some(acc)) if acc != iss => format!("{} ({})", iss, acc),
        (Some(iss), _) => iss.to_string(),
        (None, Some(acc)) => acc.to_string(),
        (None, None) => UNNAMED_KEY_LABEL.to_string(),
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn url_decode(s: &str) -> Result<String, TotpError> {
    urlencoding::decode(s).map(|c| c.into_owned()).map_err(|e| {
        TotpError::new(TotpErrorKind::MalformedUri, "Label is not valid percent-encoded UTF-8")
            .with_detail(e.to_string())
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Generate
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Build an `otpauth://totp/` URI for a secret using the supported profile.
///
/// Defaults (SHA1, 6 digits, 30 s) are left implicit.
pub fn build_otpauth_uri(secret: &CanonicalSecret, issuer: Option<&str>, account: &str) -> String {
    let account = urlencoding::encode(account.trim());
    match issuer.map(str::trim).filter(|i| !i.is_empty()) {
        Some(iss) => {
            let iss = urlencoding::encode(iss);
            format!(
                "otpauth://totp/{}:{}?secret={}&issuer={}",
                iss, account, secret, iss
            )
        }
        None => format!("otpauth://totp/{}?secret={}", account, secret),
    }
}
