//! RFC 4648 Base32 codec for shared secrets.
//!
//! Encoding always emits the upper-case alphabet `A–Z2–7` padded with `=` to
//! a multiple of eight symbols. Decoding is case-insensitive, ignores
//! whitespace and trailing padding, and rejects the first symbol outside the
//! alphabet instead of skipping it. Bit packing is delegated to the `base32`
//! crate once the input has been normalised and checked here.

use crate::totp::types::Base32Error;
use ::base32::Alphabet;

/// The 32-symbol RFC 4648 alphabet.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Padding symbol.
pub const PAD: char = '=';

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Encode / decode
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Encode raw bytes to padded, upper-case Base32.
pub fn encode(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    ::base32::encode(Alphabet::Rfc4648 { padding: true }, bytes)
}

/// Decode Base32 text into bytes.
///
/// Leftover bits that do not fill a whole byte are padding and dropped.
/// Empty, whitespace-only and padding-only input decode to an empty vector.
pub fn decode(text: &str) -> Result<Vec<u8>, Base32Error> {
    let normalized = normalize(text);
    let symbols = normalized.trim_end_matches(PAD);

    if let Some(ch) = symbols.chars().find(|c| !is_alphabet_symbol(*c)) {
        return Err(Base32Error::InvalidCharacter(ch));
    }
    if symbols.is_empty() {
        return Ok(Vec::new());
    }

    // Every symbol is ASCII and in the alphabet at this point.
    ::base32::decode(Alphabet::Rfc4648 { padding: false }, symbols).ok_or_else(|| {
        let ch = symbols.chars().next().unwrap_or(PAD);
        Base32Error::InvalidCharacter(ch)
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Strip all whitespace and fold ASCII letters to upper case.
///
/// Non-ASCII characters are left untouched so they still fail the alphabet
/// check (`'ß'.to_uppercase()` would otherwise turn into `"SS"`).
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// `true` if `ch` is one of the 32 upper-case alphabet symbols.
pub fn is_alphabet_symbol(ch: char) -> bool {
    ch.is_ascii() && ALPHABET.contains(&(ch as u8))
}

/// `true` if `text` is one or more alphabet symbols followed only by `=`.
///
/// Expects already-normalised text; lower case and whitespace fail.
pub fn is_padded_alphabet(text: &str) -> bool {
    let symbols = text.trim_end_matches(PAD);
    !symbols.is_empty() && symbols.chars().all(is_alphabet_symbol)
}

/// Number of symbols in `text` excluding trailing padding.
pub fn significant_len(text: &str) -> usize {
    text.trim_end_matches(PAD).chars().count()
}
