//! Importing scalable font faces into a compact, renderer-ready outline form.
//!
//! Rista reads a font file with [`read-fonts`](https://crates.io/crates/read-fonts)
//! and [`skrifa`](https://crates.io/crates/skrifa), then flattens the
//! selected glyphs into a single self-contained record: quadratic
//! outlines as delta encoded point commands, pixel-space metrics in
//! 26.6 fixed point, and the pair kerning between the selected glyphs.
//! The record serializes with [`serde`](https://crates.io/crates/serde)
//! and carries no references back into the source font, so it can be
//! handed to a renderer or written to disk as is.
//!
//! The usual entry point is [`import_font`]; [`FaceSource`] and
//! [`import_face`] expose the steps separately for callers that want
//! to pick a face out of a collection or substitute their own glyph
//! source.

#![forbid(unsafe_code)]

mod face;
mod import;
mod kern;
mod outline;
mod parsing_util;
mod record;
mod source;

use read_fonts::ReadError;
use thiserror::Error;

pub use face::FaceSource;
pub use import::{import_face, Selection, KERNING_SCAN_WARN_LIMIT};
pub use outline::{
    decompose, flatten, replay, DecomposeError, OutlineEvent, PointCommand, LINE_TAG, MOVE_TAG,
    QUAD_TAG,
};
pub use parsing_util::{parse_unicodes, ParseError};
pub use record::{FaceRecord, GlyphRecord, GlyphTable, KerningEntry};
pub use source::{FaceInfo, GlyphExtents, GlyphSource, RawGlyph};

/// Type for a glyph identifier.
pub use skrifa::GlyphId;

/// Scale for glyph space, in pixels per em.
pub use skrifa::prelude::Size;

/// An error opening font data for import.
///
/// Anything that goes wrong after the face is open, such as a glyph
/// with cubic segments or a codepoint without a glyph, drops that one
/// glyph from the result instead of failing the import.
#[derive(Clone, Debug, Error)]
pub enum ImportError {
    #[error("unrecognized font data: {0}")]
    UnknownFormat(#[from] ReadError),
    #[error("no face at collection index {0}")]
    InvalidCollectionIndex(u32),
    #[error("face does not provide scalable outlines")]
    NotScalable,
}

/// Imports the selected glyphs of the first face in `data`.
///
/// Glyph space is scaled to `size`; pass [`Size::unscaled`] to keep
/// font units. Use [`FaceSource::with_index`] with [`import_face`] to
/// import another face from a collection.
pub fn import_font(
    data: &[u8],
    selection: Selection<'_>,
    size: Size,
) -> Result<FaceRecord, ImportError> {
    let mut source = FaceSource::new(data, size)?;
    Ok(import_face(&mut source, selection))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_font_reads_the_first_face() {
        let record =
            import_font(font_test_data::VAZIRMATN_VAR, Selection::All, Size::unscaled()).unwrap();
        assert_eq!(record.em_size, 2048);
        assert!(record.num_glyphs > 0);
        assert_eq!(record.num_glyphs as usize, record.glyphs.len());
        assert!(record
            .glyphs
            .windows(2)
            .all(|pair| pair[0].char_code < pair[1].char_code));
        // No kern table in this font.
        assert!(!record.has_kerning);
        assert!(record.kerning.is_none());
    }

    #[test]
    fn import_font_scales_to_the_requested_size() {
        let full =
            import_font(font_test_data::VAZIRMATN_VAR, Selection::All, Size::unscaled()).unwrap();
        // The em is 2048 units, so 1024 pixels per em is a 0.5 scale.
        let half =
            import_font(font_test_data::VAZIRMATN_VAR, Selection::All, Size::new(1024.0)).unwrap();
        assert_eq!(full.num_glyphs, half.num_glyphs);
        for (a, b) in full.glyphs.iter().zip(&half.glyphs) {
            assert_eq!(a.advance, b.advance * 2);
        }
    }

    #[test]
    fn import_font_rejects_junk() {
        let err = import_font(b"not a font", Selection::All, Size::unscaled()).unwrap_err();
        assert!(matches!(err, ImportError::UnknownFormat(_)));
    }
}
