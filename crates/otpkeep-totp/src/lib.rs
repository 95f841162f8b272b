//! # otpkeep – TOTP core
//!
//! Self-contained codec/algorithm stack behind the otpkeep key list:
//!
//! - **RFC 4648** – Base32 encoding/decoding of shared secrets
//! - **RFC 6238** – HMAC-SHA1 time-based codes with window-progress helpers
//! - **otpauth:// URIs** – Parsing (and building) of provisioning URIs
//! - **Key validation** – One entry point turning free-form user input into
//!   a canonical secret or a typed rejection reason

pub mod totp;
