//! Expiry spec parsing
//!
//! Token and session lifetimes are configured as compact duration
//! strings: `"30s"`, `"15m"`, `"1h"`, `"7d"`. Grammar is
//! `^(\d+)([smhd])$`: one or more digits then exactly one unit
//! letter. Anything else is a configuration error, fatal at startup
//! when it is the server's own token expiry.

use crate::error::{AuthError, AuthResult};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Parse an expiry spec into milliseconds
pub fn parse_expiry(spec: &str) -> AuthResult<u64> {
    let err = || AuthError::Config(format!("invalid expiry spec {:?} (expected e.g. \"15m\")", spec));

    // The grammar is ASCII-only; checking up front also keeps the
    // split below on a char boundary for arbitrary env input
    if !spec.is_ascii() {
        return Err(err());
    }

    let (digits, unit) = spec.split_at(spec.len().saturating_sub(1));
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    let count: u64 = digits.parse().map_err(|_| err())?;
    let multiplier = match unit {
        "s" => MS_PER_SECOND,
        "m" => MS_PER_MINUTE,
        "h" => MS_PER_HOUR,
        "d" => MS_PER_DAY,
        _ => return Err(err()),
    };

    count
        .checked_mul(multiplier)
        .ok_or_else(err)
}
