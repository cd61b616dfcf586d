//! Hex color strings: `#RGB`, `#RRGGBB`, `#RRGGBBAA`, with or without `#`.

use thiserror::Error;

use crate::color::Rgba;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HexColorError {
    #[error("expected 3, 6 or 8 hex digits, found {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit {0:?}")]
    InvalidDigit(char),
}

pub fn parse_hex(input: &str) -> Result<Rgba, HexColorError> {
    let digits = input.trim().strip_prefix('#').unwrap_or_else(|| input.trim());
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexColorError::InvalidDigit(bad));
    }
    // Only ASCII remains, so byte length equals digit count.
    let nibbles: Vec<u8> = digits.bytes().map(nibble).collect();
    let [r, g, b, a] = match nibbles.as_slice() {
        [r, g, b] => [r * 17, g * 17, b * 17, u8::MAX],
        [r1, r0, g1, g0, b1, b0] => [pair(*r1, *r0), pair(*g1, *g0), pair(*b1, *b0), u8::MAX],
        [r1, r0, g1, g0, b1, b0, a1, a0] => [
            pair(*r1, *r0),
            pair(*g1, *g0),
            pair(*b1, *b0),
            pair(*a1, *a0),
        ],
        other => return Err(HexColorError::InvalidLength(other.len())),
    };
    Ok(Rgba::from_rgba8(r, g, b, a))
}

/// `#RRGGBB` for opaque colors, `#RRGGBBAA` otherwise.
pub fn format_hex(color: Rgba) -> String {
    let [r, g, b, a] = color.to_rgba8();
    if a == u8::MAX {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}

fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        _ => digit - b'A' + 10,
    }
}

fn pair(hi: u8, lo: u8) -> u8 {
    hi << 4 | lo
}
