//! C string literal escaping.
//!
//! Keys are arbitrary byte strings. To print them, or to read them back
//! from a key file, they are written as double-quoted C string literals:
//! printable ASCII as-is, the usual single-letter escapes, and octal for
//! everything else.

use std::fmt::Write;

use crate::{Error, Result};

/// Single-letter escapes shared by both directions.
const MNEMONICS: &[(u8, u8)] = &[
    (b't', b'\t'),
    (b'n', b'\n'),
    (b'r', b'\r'),
    (b'f', 0x0c),
    (b'b', 0x08),
    (b'a', 0x07),
    (b'v', 0x0b),
];

/// ESC is accepted when reading but never written, since it isn't standard C.
const ESC_MNEMONIC: (u8, u8) = (b'e', 0x1b);

fn mnemonic_for_byte(byte: u8) -> Option<u8> {
    MNEMONICS
        .iter()
        .find(|&&(_, b)| b == byte)
        .map(|&(letter, _)| letter)
}

fn byte_for_mnemonic(letter: u8) -> Option<u8> {
    MNEMONICS
        .iter()
        .chain(std::iter::once(&ESC_MNEMONIC))
        .find(|&&(l, _)| l == letter)
        .map(|&(_, byte)| byte)
}

/// Escape a byte string as a double-quoted C string literal.
///
/// # Example
///
/// ```
/// use mphash_common::escape::escape_c_string;
///
/// assert_eq!(escape_c_string(b"a\"b\n\xff"), r#""a\"b\n\377""#);
/// ```
pub fn escape_c_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &byte in bytes {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            0x20..=0x7e => out.push(byte as char),
            _ => match mnemonic_for_byte(byte) {
                Some(letter) => {
                    out.push('\\');
                    out.push(letter as char);
                }
                // Always three digits so a following digit can't extend the escape.
                None => {
                    let _ = write!(out, "\\{:03o}", byte);
                }
            },
        }
    }
    out.push('"');
    out
}

/// Parse a double-quoted C string literal back into bytes.
///
/// Accepts everything [`escape_c_string`] produces, plus `\e`, one- and
/// two-digit octal, one- or two-digit hex (`\x`), and a backslash before
/// any printable non-alphanumeric character.
pub fn undump_c_string(s: &str) -> Result<Vec<u8>> {
    let content = match s.as_bytes() {
        [b'"', inner @ .., b'"'] => inner,
        _ => return Err(Error::InvalidQuoting(s.to_string())),
    };

    let mut out = Vec::with_capacity(content.len());
    let mut i = 0;
    while i < content.len() {
        match content[i] {
            b'"' => return Err(Error::InvalidQuoting(s.to_string())),
            b'\\' => {
                let Some(&next) = content.get(i + 1) else {
                    return Err(Error::InvalidQuoting(s.to_string()));
                };
                let (byte, consumed) = undump_escape(&content[i + 1..], next)?;
                out.push(byte);
                i += 1 + consumed;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Decode one escape. `rest` starts just after the backslash.
/// Returns the byte and how many bytes of `rest` it used.
fn undump_escape(rest: &[u8], next: u8) -> Result<(u8, usize)> {
    match next {
        b'x' => {
            let digits = rest[1..]
                .iter()
                .take(2)
                .take_while(|b| b.is_ascii_hexdigit())
                .count();
            if digits == 0 {
                return Err(Error::UnexpectedEscape("\\x".to_string()));
            }
            let value = rest[1..=digits]
                .iter()
                .fold(0u8, |acc, &d| (acc << 4) | hex_value(d));
            Ok((value, 1 + digits))
        }
        b'0'..=b'7' => {
            let run = rest
                .iter()
                .take(3)
                .take_while(|b| (b'0'..=b'7').contains(*b))
                .count();
            // Three digits only fit in a byte when the first is 0-3.
            let digits = if run == 3 && next <= b'3' { 3 } else { run.min(2) };
            let value = rest[..digits]
                .iter()
                .fold(0u8, |acc, &d| (acc << 3) | (d - b'0'));
            Ok((value, digits))
        }
        _ => {
            if let Some(byte) = byte_for_mnemonic(next) {
                Ok((byte, 1))
            } else if next == b' ' || next.is_ascii_punctuation() {
                Ok((next, 1))
            } else {
                Err(Error::UnexpectedEscape(format!(
                    "\\{}",
                    String::from_utf8_lossy(&[next])
                )))
            }
        }
    }
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}
