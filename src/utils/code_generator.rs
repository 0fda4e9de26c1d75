//! Short code generation and alias normalization.
//!
//! Random codes are the base62 tail of a 128-bit random value. Aliases are
//! user-chosen codes that must match a stricter pattern than resolvable codes.

use regex::Regex;
use std::sync::LazyLock;

/// Base62 alphabet: digits, then lowercase, then uppercase.
pub const CODE_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default length of generated codes.
pub const DEFAULT_CODE_LEN: usize = 7;

/// Codes that would shadow service routes.
pub const RESERVED_CODES: &[&str] = &["shorten", "api"];

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{4,32}$").expect("alias pattern is valid"));

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]{4,64}$").expect("code pattern is valid"));

/// Encodes `n` in base62 using [`CODE_ALPHABET`], most significant digit first.
///
/// Zero encodes as `"0"`.
pub fn encode_base62(mut n: u128) -> String {
    if n == 0 {
        return (CODE_ALPHABET[0] as char).to_string();
    }

    let mut out = Vec::with_capacity(22);
    while n > 0 {
        out.push(CODE_ALPHABET[(n % 62) as usize]);
        n /= 62;
    }
    out.iter().rev().map(|&b| char::from(b)).collect()
}

/// Derives a code of exactly `len` characters from `n`.
///
/// Takes the last `len` characters of the base62 encoding, left-padding with
/// `'0'` when the encoding is shorter.
pub fn code_from_u128(n: u128, len: usize) -> String {
    let encoded = encode_base62(n);
    if encoded.len() >= len {
        encoded[encoded.len() - len..].to_string()
    } else {
        format!("{}{}", "0".repeat(len - encoded.len()), encoded)
    }
}

/// Produces random code candidates of a fixed length.
///
/// Candidates are not unique; the caller must insert them conditionally and
/// retry on collision.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
}

impl CodeGenerator {
    /// Creates a generator for codes of `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Returns the length of generated codes.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns a fresh random candidate.
    ///
    /// The value comes from the thread-local `rand` generator.
    pub fn next_candidate(&self) -> String {
        code_from_u128(rand::random::<u128>(), self.length)
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LEN)
    }
}

/// Cleans a user-supplied alias.
///
/// Trims surrounding whitespace and returns the alias if it fully matches
/// `[0-9A-Za-z_-]{4,32}` and is not reserved. Anything else yields an empty
/// string, meaning "no usable alias". This never errors.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_alias("  myLink "), "myLink");
/// assert_eq!(normalize_alias("abc"), "");        // too short
/// assert_eq!(normalize_alias("my link"), "");    // space
/// ```
pub fn normalize_alias(raw: &str) -> String {
    let alias = raw.trim();
    if alias.is_empty() || !ALIAS_REGEX.is_match(alias) || is_reserved(alias) {
        return String::new();
    }
    alias.to_string()
}

/// Returns true if `code` has the shape of a resolvable code
/// (`[0-9A-Za-z_-]{4,64}`).
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Returns true if `code` is reserved for a service route.
pub fn is_reserved(code: &str) -> bool {
    RESERVED_CODES.contains(&code)
}
