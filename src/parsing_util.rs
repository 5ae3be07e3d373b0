//! parsing codepoint selections from command line input

use read_fonts::collections::IntSet;
use thiserror::Error;

/// An error from parsing a codepoint selection string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid input unicode {0}")]
    InvalidUnicode(String),
    #[error("Invalid unicode range {start}-{end}")]
    InvalidUnicodeRange { start: u32, end: u32 },
}

/// Parses a list of Unicode codepoints and codepoint ranges.
///
/// Values are hexadecimal, separated by commas or whitespace, and may
/// carry a `U+` or `0x` prefix. A range is two values joined by `-`,
/// inclusive on both ends: `U+0041-005A, 61-7a` selects the ASCII
/// letters.
///
/// The result preserves input order; repeated codepoints keep their
/// first occurrence.
pub fn parse_unicodes(input: &str) -> Result<Vec<u32>, ParseError> {
    let mut codes = Vec::new();
    let mut seen = IntSet::empty();
    for piece in input.split([',', ' ', '\t']) {
        if piece.is_empty() {
            continue;
        }
        if let Some((start, end)) = piece.split_once('-') {
            let start = parse_code(start)?;
            let end = parse_code(end)?;
            if start > end {
                return Err(ParseError::InvalidUnicodeRange { start, end });
            }
            codes.extend((start..=end).filter(|code| seen.insert(*code)));
        } else {
            let code = parse_code(piece)?;
            if seen.insert(code) {
                codes.push(code);
            }
        }
    }
    Ok(codes)
}

fn parse_code(piece: &str) -> Result<u32, ParseError> {
    let digits = ["U+", "u+", "0x", "0X"]
        .iter()
        .find_map(|prefix| piece.strip_prefix(prefix))
        .unwrap_or(piece);
    u32::from_str_radix(digits, 16).map_err(|_| ParseError::InvalidUnicode(piece.to_owned()))
}
