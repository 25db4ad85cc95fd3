//! Masking bypass candidates.
//!
//! Each entry maps a label to the exact string a job would print if it
//! emitted the secret under that encoding. The table is data: adding a
//! candidate is one line in [`TRANSFORMS`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use data_encoding::BASE32;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha2::Digest;

/// Everything except the RFC 3986 unreserved set.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A named plaintext → expected-string function.
#[derive(Clone, Copy)]
pub struct Transform {
    pub label: &'static str,
    pub encode: fn(&str) -> String,
    /// Recovers the plaintext, when the encoding is reversible on its own.
    pub decode: Option<fn(&str) -> Option<String>>,
}

impl Transform {
    pub fn apply(&self, plaintext: &str) -> String {
        (self.encode)(plaintext)
    }

    pub fn is_reversible(&self) -> bool {
        self.decode.is_some()
    }
}

impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("label", &self.label)
            .field("reversible", &self.is_reversible())
            .finish()
    }
}

macro_rules! transform {
    ($label:literal, $encode:expr) => {
        Transform {
            label: $label,
            encode: $encode,
            decode: None,
        }
    };
    ($label:literal, $encode:expr, $decode:expr) => {
        Transform {
            label: $label,
            encode: $encode,
            decode: Some($decode as fn(&str) -> Option<String>),
        }
    };
}

/// Every candidate the bypass experiment checks, in report order.
pub const TRANSFORMS: &[Transform] = &[
    transform!("hex", hex_encode, hex_decode),
    transform!("base64", base64_encode, base64_decode),
    transform!("base64-newline", base64_newline_encode, base64_newline_decode),
    transform!("base32", base32_encode, base32_decode),
    transform!("rot13", rot13, rot13_decode),
    transform!("uppercase", uppercase),
    transform!("reversed", reverse, reverse_decode),
    transform!("caesar-1", caesar, caesar_decode),
    transform!("ascii-decimal", ascii_decimal, ascii_decimal_decode),
    transform!("ascii-octal", ascii_octal, ascii_octal_decode),
    transform!("ascii-binary", ascii_binary, ascii_binary_decode),
    transform!("md5", md5_hex),
    transform!("sha1", sha1_hex),
    transform!("sha256", sha256_hex),
    transform!("url-encoded", percent_encode_component, percent_decode),
    transform!("url-encoded-all", percent_encode_all, percent_decode),
    transform!("html-entities", html_entities, html_entities_decode),
    transform!("unicode-escape", unicode_escape, unicode_unescape),
    transform!("first-half", first_half),
    transform!("second-half", second_half),
    transform!("even-chars", even_chars),
    transform!("odd-chars", odd_chars),
    transform!("token-embed", token_embed, token_embed_decode),
    transform!("userinfo-embed", userinfo_embed, userinfo_embed_decode),
];

/// Look up a transform by label.
pub fn find(label: &str) -> Option<&'static Transform> {
    TRANSFORMS.iter().find(|t| t.label == label)
}

/// Precompute every expected string for `plaintext`.
pub fn expected(plaintext: &str) -> Vec<(&'static str, String)> {
    TRANSFORMS
        .iter()
        .map(|t| (t.label, t.apply(plaintext)))
        .collect()
}

fn hex_encode(s: &str) -> String {
    hex::encode(s.as_bytes())
}

fn hex_decode(s: &str) -> Option<String> {
    String::from_utf8(hex::decode(s).ok()?).ok()
}

fn base64_encode(s: &str) -> String {
    STANDARD.encode(s.as_bytes())
}

fn base64_decode(s: &str) -> Option<String> {
    String::from_utf8(STANDARD.decode(s).ok()?).ok()
}

// What `echo "$SECRET" | base64` prints.
fn base64_newline_encode(s: &str) -> String {
    STANDARD.encode(format!("{}\n", s))
}

fn base64_newline_decode(s: &str) -> Option<String> {
    base64_decode(s)?.strip_suffix('\n').map(str::to_string)
}

fn base32_encode(s: &str) -> String {
    BASE32.encode(s.as_bytes())
}

fn base32_decode(s: &str) -> Option<String> {
    String::from_utf8(BASE32.decode(s.as_bytes()).ok()?).ok()
}

fn rot13(s: &str) -> String {
    shift_letters(s, 13)
}

fn rot13_decode(s: &str) -> Option<String> {
    Some(rot13(s))
}

fn uppercase(s: &str) -> String {
    s.to_ascii_uppercase()
}

fn caesar(s: &str) -> String {
    shift_letters(s, 1)
}

fn caesar_decode(s: &str) -> Option<String> {
    Some(shift_letters(s, 25))
}

/// Rotate ASCII letters forward by `n` places, preserving case.
fn shift_letters(s: &str, n: u8) -> String {
    s.chars()
        .map(|c| match c {
            'a'..='z' => ((c as u8 - b'a' + n) % 26 + b'a') as char,
            'A'..='Z' => ((c as u8 - b'A' + n) % 26 + b'A') as char,
            _ => c,
        })
        .collect()
}

fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

fn reverse_decode(s: &str) -> Option<String> {
    Some(reverse(s))
}

fn ascii_decimal(s: &str) -> String {
    join_bytes(s, |b| b.to_string())
}

fn ascii_decimal_decode(s: &str) -> Option<String> {
    split_bytes(s, 10)
}

fn ascii_octal(s: &str) -> String {
    join_bytes(s, |b| format!("{:o}", b))
}

fn ascii_octal_decode(s: &str) -> Option<String> {
    split_bytes(s, 8)
}

fn ascii_binary(s: &str) -> String {
    join_bytes(s, |b| format!("{:08b}", b))
}

fn ascii_binary_decode(s: &str) -> Option<String> {
    split_bytes(s, 2)
}

fn join_bytes(s: &str, f: impl Fn(u8) -> String) -> String {
    s.bytes().map(f).collect::<Vec<_>>().join(" ")
}

fn split_bytes(s: &str, radix: u32) -> Option<String> {
    let bytes = s
        .split_whitespace()
        .map(|part| u8::from_str_radix(part, radix).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

fn md5_hex(s: &str) -> String {
    hex::encode(md5::Md5::digest(s.as_bytes()))
}

fn sha1_hex(s: &str) -> String {
    hex::encode(sha1::Sha1::digest(s.as_bytes()))
}

fn sha256_hex(s: &str) -> String {
    hex::encode(sha2::Sha256::digest(s.as_bytes()))
}

fn percent_encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

fn percent_encode_all(s: &str) -> String {
    s.bytes().map(|b| format!("%{:02X}", b)).collect()
}

fn percent_decode(s: &str) -> Option<String> {
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(|cow| cow.into_owned())
}

fn html_entities(s: &str) -> String {
    s.chars().map(|c| format!("&#{};", c as u32)).collect()
}

fn html_entities_decode(s: &str) -> Option<String> {
    s.split_terminator(';')
        .map(|entity| {
            let code = entity.strip_prefix("&#")?.parse::<u32>().ok()?;
            char::from_u32(code)
        })
        .collect()
}

fn unicode_escape(s: &str) -> String {
    s.encode_utf16().map(|u| format!("\\u{:04x}", u)).collect()
}

fn unicode_unescape(s: &str) -> Option<String> {
    let units = s
        .split("\\u")
        .skip(1)
        .map(|hex| u16::from_str_radix(hex, 16).ok())
        .collect::<Option<Vec<u16>>>()?;
    if !s.is_empty() && !s.starts_with("\\u") {
        return None;
    }
    String::from_utf16(&units).ok()
}

/// Split at half the character count; the second half takes the odd char.
fn halves(s: &str) -> (String, String) {
    let mid = s.chars().count() / 2;
    (s.chars().take(mid).collect(), s.chars().skip(mid).collect())
}

fn first_half(s: &str) -> String {
    halves(s).0
}

fn second_half(s: &str) -> String {
    halves(s).1
}

fn every_other(s: &str, offset: usize) -> String {
    s.chars().skip(offset).step_by(2).collect()
}

fn even_chars(s: &str) -> String {
    every_other(s, 0)
}

fn odd_chars(s: &str) -> String {
    every_other(s, 1)
}

fn token_embed(s: &str) -> String {
    format!("token={}", s)
}

fn token_embed_decode(s: &str) -> Option<String> {
    s.strip_prefix("token=").map(str::to_string)
}

fn userinfo_embed(s: &str) -> String {
    format!("user:{}@", s)
}

fn userinfo_embed_decode(s: &str) -> Option<String> {
    s.strip_prefix("user:")
        .and_then(|rest| rest.strip_suffix('@'))
        .map(str::to_string)
}
