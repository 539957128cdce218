//! Decoding of C string-literal bodies into raw bytes.

use crate::errors::{Error, Result};

/// Decode the body of a C string literal (without the surrounding quotes).
///
/// `\x` takes at most two hex digits so that `"\x48\x00"` and
/// `"\x5Cabc"` decode the way signature authors write them.
pub fn decode_c_literal(body: &str) -> Result<Vec<u8>> {
    let bytes = body.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;
        if byte != b'\\' {
            out.push(byte);
            continue;
        }

        let Some(&escape) = bytes.get(i) else {
            return Err(invalid(body, "dangling backslash"));
        };
        i += 1;
        let decoded = match escape {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'a' => 0x07,
            b'b' => 0x08,
            b'f' => 0x0C,
            b'v' => 0x0B,
            b'\\' | b'"' | b'\'' | b'?' => escape,
            b'x' => {
                let digits = take_while_max(&bytes[i..], 2, u8::is_ascii_hexdigit);
                if digits.is_empty() {
                    return Err(invalid(body, "\\x without hex digits"));
                }
                i += digits.len();
                digits.iter().fold(0u8, |acc, d| (acc << 4) | hex_value(*d))
            }
            b'0'..=b'7' => {
                let rest = take_while_max(&bytes[i..], 2, |d| (b'0'..=b'7').contains(d));
                i += rest.len();
                let value = std::iter::once(&escape)
                    .chain(rest)
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                u8::try_from(value).map_err(|_| invalid(body, "octal escape out of range"))?
            }
            other => {
                return Err(invalid(
                    body,
                    &format!("unknown escape \\{}", char::from(other)),
                ))
            }
        };
        out.push(decoded);
    }

    Ok(out)
}

fn take_while_max(bytes: &[u8], max: usize, pred: impl Fn(&u8) -> bool) -> &[u8] {
    let len = bytes.iter().take(max).take_while(|b| pred(b)).count();
    &bytes[..len]
}

fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

fn invalid(body: &str, reason: &str) -> Error {
    Error::Validation(format!("invalid string literal \"{body}\": {reason}"))
}
