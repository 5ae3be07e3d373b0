//! The face import pipeline.
//!
//! [`import_face`] drives one request end to end: select character codes,
//! load and delta encode each glyph, build the canonical table, then scan
//! the table pairwise for kerning. Glyphs that fail to load or to encode
//! are dropped silently (logged at debug level); only opening the face can
//! fail a request, and that happens before this pipeline runs.

use crate::{
    outline,
    record::{FaceRecord, GlyphRecord, GlyphTable, KerningEntry},
    source::GlyphSource,
};

/// Which character codes an import request covers.
#[derive(Copy, Clone, Default, Debug)]
pub enum Selection<'a> {
    /// Every code the source maps to a glyph.
    #[default]
    All,
    /// An explicit code list, in request order.
    Explicit(&'a [u32]),
}

/// Table size above which the pairwise kerning scan logs a warning.
///
/// The scan issues one query per ordered pair of table positions, so its
/// cost grows quadratically with the selection.
pub const KERNING_SCAN_WARN_LIMIT: usize = 512;

/// Imports the selected glyphs of a face into a [`FaceRecord`].
pub fn import_face(source: &mut impl GlyphSource, selection: Selection<'_>) -> FaceRecord {
    let glyphs = match selection {
        Selection::All => {
            let codes = source.char_codes();
            collect_glyphs(source, &codes)
        }
        Selection::Explicit(codes) => collect_glyphs(source, codes),
    };
    let table = GlyphTable::new(glyphs);
    let kerning = scan_kerning(source, &table);
    FaceRecord::assemble(source.face_info(), table, kerning)
}

fn collect_glyphs(source: &mut impl GlyphSource, codes: &[u32]) -> Vec<GlyphRecord> {
    let mut glyphs = Vec::with_capacity(codes.len());
    for &code in codes {
        let Some(raw) = source.load_glyph(code) else {
            log::debug!("U+{code:04X}: no glyph loaded, skipping");
            continue;
        };
        let commands = match outline::decompose(&raw.events) {
            Ok(commands) => commands,
            Err(err) => {
                log::debug!("U+{code:04X}: {err}, skipping");
                continue;
            }
        };
        glyphs.push(GlyphRecord {
            char_code: code,
            advance: raw.advance,
            min_x: raw.extents.x_min,
            max_x: raw.extents.x_max,
            min_y: raw.extents.y_min,
            max_y: raw.extents.y_max,
            commands,
            source_id: raw.id,
        });
    }
    glyphs
}

/// Queries every ordered pair of table positions, self pairs included, and
/// keeps the nonzero adjustments. `None` when the source has no kerning
/// data at all.
fn scan_kerning(source: &impl GlyphSource, table: &GlyphTable) -> Option<Vec<KerningEntry>> {
    if !source.has_kerning() {
        return None;
    }
    let glyphs = table.glyphs();
    if glyphs.len() > KERNING_SCAN_WARN_LIMIT {
        log::warn!(
            "kerning scan over {} glyphs issues {} pair queries",
            glyphs.len(),
            glyphs.len().saturating_mul(glyphs.len())
        );
    }
    let mut entries = Vec::new();
    for (left, left_glyph) in glyphs.iter().enumerate() {
        for (right, right_glyph) in glyphs.iter().enumerate() {
            let v = source.kerning(left_glyph.source_id, right_glyph.source_id);
            if v.x != 0 || v.y != 0 {
                entries.push(KerningEntry {
                    left_glyph: left as u32,
                    right_glyph: right as u32,
                    x: v.x,
                    y: v.y,
                });
            }
        }
    }
    Some(entries)
}
