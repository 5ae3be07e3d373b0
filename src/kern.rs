//! Reading pair adjustments from the `kern` table.
//!
//! Handles both header dialects (the OpenType version 0 layout and the
//! AAT version 1 layout) but only format 0 subtables, the sorted pair
//! list. That is the same subset FreeType's default kerning mode consults
//! (see `ttkern.c`); class matrix and state machine subtables are skipped.

use std::cmp::Ordering;

use read_fonts::{
    types::{GlyphId, Tag},
    FontData, TableProvider,
};

const KERN: Tag = Tag::new(b"kern");

/// Bytes per format 0 pair: left and right glyph ids and an FWORD value.
const PAIR_LEN: usize = 6;

/// Pair kerning data extracted from a face's `kern` table.
///
/// Holds the usable subtables in font order; [`adjustment`](Self::adjustment)
/// combines them the way FreeType does, accumulating values unless a
/// subtable carries the override flag.
pub(crate) struct KernTable<'a> {
    subtables: Vec<Subtable<'a>>,
}

struct Subtable<'a> {
    /// The pair array only; headers are dropped during parsing.
    pairs: FontData<'a>,
    n_pairs: usize,
    /// Pair keys verified strictly ascending, enabling binary search.
    sorted: bool,
    /// Replace the running value instead of adding to it.
    override_value: bool,
}

impl<'a> KernTable<'a> {
    /// Extracts the usable subtables of a face's `kern` table.
    ///
    /// `None` when the table is missing, malformed, or contains no
    /// horizontal format 0 subtable; a face in that state has no pair
    /// kerning to offer.
    pub(crate) fn new(font: &impl TableProvider<'a>) -> Option<Self> {
        let data = font.data_for_tag(KERN)?;
        // The dialects share the leading u16: 0 for OpenType, 1 for the
        // high word of the AAT 32 bit version.
        let subtables = match data.read_at::<u16>(0).ok()? {
            0 => parse_ot(&data),
            1 => parse_aat(&data),
            _ => return None,
        };
        (!subtables.is_empty()).then_some(Self { subtables })
    }

    /// Horizontal adjustment for an ordered glyph pair, in font units.
    ///
    /// Zero for pairs without an entry. Format 0 addresses 16 bit glyph
    /// ids only, so anything larger cannot be kerned.
    pub(crate) fn adjustment(&self, left: GlyphId, right: GlyphId) -> i32 {
        let (Ok(left), Ok(right)) = (
            u16::try_from(left.to_u32()),
            u16::try_from(right.to_u32()),
        ) else {
            return 0;
        };
        let key = (left as u32) << 16 | right as u32;
        let mut result = 0;
        for subtable in &self.subtables {
            if let Some(value) = subtable.value(key) {
                if subtable.override_value {
                    result = value as i32;
                } else {
                    result += value as i32;
                }
            }
        }
        result
    }
}

/// OpenType layout: u16 version, u16 nTables, then subtables headed by
/// u16 version, u16 length, u16 coverage.
fn parse_ot<'a>(data: &FontData<'a>) -> Vec<Subtable<'a>> {
    let mut subtables = Vec::new();
    let Ok(n_tables) = data.read_at::<u16>(2) else {
        return subtables;
    };
    let mut offset = 4;
    for _ in 0..n_tables {
        let (Ok(length), Ok(coverage)) = (
            data.read_at::<u16>(offset + 2),
            data.read_at::<u16>(offset + 4),
        ) else {
            break;
        };
        let length = length as usize;
        if length < 6 {
            break;
        }
        // Horizontal, not minimum, not cross-stream, format 0; the
        // override bit may be either. Same acceptance test as FreeType.
        if (coverage & !8) == 0x0001 {
            subtables.extend(parse_format0(
                data,
                offset + 6,
                offset + length,
                coverage & 8 != 0,
            ));
        }
        offset += length;
    }
    subtables
}

/// AAT layout: u32 version, u32 nTables, then subtables headed by
/// u32 length, u16 coverage, u16 tupleIndex. The coverage bit assignments
/// differ from the OpenType dialect.
fn parse_aat<'a>(data: &FontData<'a>) -> Vec<Subtable<'a>> {
    let mut subtables = Vec::new();
    if !matches!(data.read_at::<u32>(0), Ok(0x0001_0000)) {
        return subtables;
    }
    let Ok(n_tables) = data.read_at::<u32>(4) else {
        return subtables;
    };
    let mut offset = 8;
    for _ in 0..n_tables {
        let (Ok(length), Ok(coverage)) = (
            data.read_at::<u32>(offset),
            data.read_at::<u16>(offset + 4),
        ) else {
            break;
        };
        let length = length as usize;
        if length < 8 {
            break;
        }
        // Reject vertical (0x8000), cross-stream (0x4000) and variation
        // (0x2000) subtables; the low byte is the format.
        if (coverage & 0xE0FF) == 0 {
            subtables.extend(parse_format0(data, offset + 8, offset + length, false));
        }
        offset += length;
    }
    subtables
}

/// Parses a format 0 payload: u16 nPairs and three bogus search helper
/// fields, then nPairs entries of (left, right, value).
fn parse_format0<'a>(
    data: &FontData<'a>,
    start: usize,
    end: usize,
    override_value: bool,
) -> Option<Subtable<'a>> {
    let claimed = data.read_at::<u16>(start).ok()? as usize;
    let pairs_start = start + 8;
    let avail = end.min(data.len()).checked_sub(pairs_start)?;
    // Tolerate a pair count pointing past the subtable, as FreeType does.
    let n_pairs = claimed.min(avail / PAIR_LEN);
    let pairs = data.slice(pairs_start..pairs_start + n_pairs * PAIR_LEN)?;
    let mut sorted = true;
    let mut prev = 0;
    for i in 0..n_pairs {
        let key = pairs.read_at::<u32>(i * PAIR_LEN).ok()?;
        if i > 0 && key <= prev {
            sorted = false;
            break;
        }
        prev = key;
    }
    Some(Subtable {
        pairs,
        n_pairs,
        sorted,
        override_value,
    })
}

impl Subtable<'_> {
    /// Looks up `(left << 16) | right`. Binary search when the pair array
    /// is sorted as required, a linear sweep when it is not (yes, such
    /// fonts exist).
    fn value(&self, key: u32) -> Option<i16> {
        if self.sorted {
            let (mut lo, mut hi) = (0, self.n_pairs);
            while lo < hi {
                let mid = (lo + hi) / 2;
                let mid_key = self.pairs.read_at::<u32>(mid * PAIR_LEN).ok()?;
                match mid_key.cmp(&key) {
                    Ordering::Less => lo = mid + 1,
                    Ordering::Greater => hi = mid,
                    Ordering::Equal => {
                        return self.pairs.read_at::<i16>(mid * PAIR_LEN + 4).ok()
                    }
                }
            }
            None
        } else {
            (0..self.n_pairs)
                .find(|i| self.pairs.read_at::<u32>(i * PAIR_LEN).ok() == Some(key))
                .and_then(|i| self.pairs.read_at::<i16>(i * PAIR_LEN + 4).ok())
        }
    }
}
