//! Pattern-navigation operations.
//!
//! After a pattern matches, the runtime walks from the match address to the
//! symbol address by applying these operations in order.

use crate::errors::{Error, Result};
use std::fmt;

/// One navigation step applied after a pattern match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigOperation {
    None,
    /// Move the cursor by a signed byte offset.
    Disp(i64),
    Deref,
    Call,
    Move,
    Lea,
}

impl SigOperation {
    /// Stable on-disk type code.
    pub fn type_code(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Disp(_) => 1,
            Self::Deref => 2,
            Self::Call => 3,
            Self::Move => 4,
            Self::Lea => 5,
        }
    }

    /// Build an operation from its type code. `Disp` gets a zero offset;
    /// the decoder fills the real one in.
    pub fn from_type_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Disp(0)),
            2 => Some(Self::Deref),
            3 => Some(Self::Call),
            4 => Some(Self::Move),
            5 => Some(Self::Lea),
            _ => None,
        }
    }

    /// Parse one operation token, case-insensitively.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "" | "none" => Some(Self::None),
            "deref" => Some(Self::Deref),
            "call" => Some(Self::Call),
            "move" | "mov" => Some(Self::Move),
            "lea" => Some(Self::Lea),
            _ => lower
                .strip_prefix("disp:")
                .and_then(|offset| parse_offset(offset.trim()))
                .map(Self::Disp),
        }
    }
}

impl fmt::Display for SigOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Disp(offset) => write!(f, "disp:{offset:+}"),
            Self::Deref => f.write_str("deref"),
            Self::Call => f.write_str("call"),
            Self::Move => f.write_str("move"),
            Self::Lea => f.write_str("lea"),
        }
    }
}

/// Parse a comma separated operation list such as `"disp:+1,deref"`.
///
/// A single bad token rejects the whole list.
pub fn parse_operations(text: &str) -> Result<Vec<SigOperation>> {
    text.split(',')
        .map(|token| {
            SigOperation::parse(token).ok_or_else(|| {
                Error::Validation(format!("invalid operation \"{}\" in \"{text}\"", token.trim()))
            })
        })
        .collect()
}

/// Signed decimal, or `0x` hexadecimal, with an optional sign.
fn parse_offset(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first()? {
        b'+' => (false, &text[1..]),
        b'-' => (true, &text[1..]),
        _ => (false, text),
    };
    let magnitude = match digits.strip_prefix("0x") {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            i64::from_str_radix(hex, 16).ok()?
        }
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse::<i64>().ok()?
        }
        _ => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}
