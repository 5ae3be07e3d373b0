//! A glyph source backed by in-memory font data.

use read_fonts::{
    types::{GlyphId, Point},
    FileRef, FontRef, TableProvider,
};
use skrifa::{
    attribute::{Style, Weight},
    charmap::Charmap,
    metrics::GlyphMetrics,
    outline::{DrawSettings, OutlinePen},
    prelude::{LocationRef, Size},
    string::StringId,
    MetadataProvider, OutlineGlyphCollection,
};

use crate::{
    kern::KernTable,
    outline::OutlineEvent,
    source::{FaceInfo, GlyphExtents, GlyphSource, RawGlyph},
    ImportError,
};

/// Glyph source for one face of an in-memory font file.
///
/// Wraps the font at a fixed [`Size`] chosen at construction. Everything
/// glyph-space (outline points, advances, extents, kerning) is reported in
/// 26.6 fixed point: the scaled value times 64. With [`Size::unscaled`]
/// the scale factor is 1.0, so those values are font units times 64. The
/// face-wide values in [`FaceInfo`] stay in raw design units either way.
pub struct FaceSource<'a> {
    font: FontRef<'a>,
    outlines: OutlineGlyphCollection<'a>,
    charmap: Charmap<'a>,
    glyph_metrics: GlyphMetrics<'a>,
    kern: Option<KernTable<'a>>,
    size: Size,
    /// Font units to scaled units, for values the font keeps unscaled.
    scale: f32,
}

impl<'a> FaceSource<'a> {
    /// Creates a source for the first (or only) face in `data`.
    pub fn new(data: &'a [u8], size: Size) -> Result<Self, ImportError> {
        Self::with_index(data, 0, size)
    }

    /// Creates a source for the face at `index`.
    ///
    /// Only collections have more than one face; for a single font file
    /// any index other than 0 fails.
    pub fn with_index(data: &'a [u8], index: u32, size: Size) -> Result<Self, ImportError> {
        let font = match FileRef::new(data)? {
            FileRef::Font(font) => (index == 0)
                .then_some(font)
                .ok_or(ImportError::InvalidCollectionIndex(index))?,
            FileRef::Collection(collection) => collection
                .get(index)
                .map_err(|_| ImportError::InvalidCollectionIndex(index))?,
        };
        let outlines = font.outline_glyphs();
        if outlines.format().is_none() {
            return Err(ImportError::NotScalable);
        }
        let upem = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or_default();
        Ok(Self {
            outlines,
            charmap: font.charmap(),
            glyph_metrics: font.glyph_metrics(size, LocationRef::default()),
            kern: KernTable::new(&font),
            size,
            scale: size.linear_scale(upem),
            font,
        })
    }
}

impl std::fmt::Debug for FaceSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceSource").finish_non_exhaustive()
    }
}

impl GlyphSource for FaceSource<'_> {
    fn face_info(&self) -> FaceInfo {
        read_face_info(&self.font)
    }

    fn char_codes(&self) -> Vec<u32> {
        self.charmap.mappings().map(|(code, _)| code).collect()
    }

    fn load_glyph(&mut self, code: u32) -> Option<RawGlyph> {
        let id = self.charmap.map(code).filter(|id| *id != GlyphId::NOTDEF)?;
        let outline = self.outlines.get(id)?;
        let mut pen = EventPen::default();
        if let Err(err) = outline.draw(
            DrawSettings::unhinted(self.size, LocationRef::default()),
            &mut pen,
        ) {
            log::debug!("drawing glyph {id} failed: {err}");
            return None;
        }
        let advance = fixed(self.glyph_metrics.advance_width(id)?);
        let extents = match self.glyph_metrics.bounds(id) {
            Some(bounds) => GlyphExtents {
                x_min: fixed(bounds.x_min),
                x_max: fixed(bounds.x_max),
                y_min: fixed(bounds.y_min),
                y_max: fixed(bounds.y_max),
            },
            // No bounds for CFF outlines; fall back to the control box of
            // what was just drawn.
            None => GlyphExtents::control_box(&pen.events).unwrap_or_default(),
        };
        Some(RawGlyph {
            id,
            advance,
            extents,
            events: pen.events,
        })
    }

    fn has_kerning(&self) -> bool {
        self.kern.is_some()
    }

    fn kerning(&self, left: GlyphId, right: GlyphId) -> Point<i32> {
        match &self.kern {
            Some(kern) => {
                let value = kern.adjustment(left, right) as f32 * self.scale;
                Point::new(fixed(value), 0)
            }
            None => Point::default(),
        }
    }
}

/// Face-wide properties from the metadata tables, with the usual
/// fallbacks: missing names come back empty and missing metrics zero.
fn read_face_info(font: &FontRef) -> FaceInfo {
    let string = |ids: &[StringId]| {
        ids.iter()
            .find_map(|id| font.localized_strings(*id).english_or_first())
            .map(|name| name.to_string())
            .unwrap_or_default()
    };
    let attributes = font.attributes();
    let (ascend, descend, height) = match font.hhea() {
        Ok(hhea) => {
            let ascender = hhea.ascender().to_i16() as i32;
            let descender = hhea.descender().to_i16() as i32;
            let line_gap = hhea.line_gap().to_i16() as i32;
            (ascender, descender, ascender - descender + line_gap)
        }
        Err(_) => (0, 0, 0),
    };
    FaceInfo {
        // Typographic names take precedence over the legacy pair, which
        // folds styles beyond regular/bold/italic into the family.
        family_name: string(&[StringId::TYPOGRAPHIC_FAMILY_NAME, StringId::FAMILY_NAME]),
        style_name: string(&[StringId::TYPOGRAPHIC_SUBFAMILY_NAME, StringId::SUBFAMILY_NAME]),
        is_fixed_width: font
            .post()
            .is_ok_and(|post| post.is_fixed_pitch() != 0),
        has_glyph_names: font.post().is_ok_and(|post| post.num_names() != 0),
        // Oblique faces count as italic here; both are slanted styles.
        is_italic: attributes.style != Style::Normal,
        is_bold: attributes.weight >= Weight::BOLD,
        em_size: font
            .head()
            .map(|head| head.units_per_em() as i32)
            .unwrap_or_default(),
        ascend,
        descend,
        height,
    }
}

/// 26.6 fixed point from a scaled coordinate.
fn fixed(value: f32) -> i32 {
    (value * 64.0).round() as i32
}

/// Pen that records quantized drawing events.
#[derive(Default)]
struct EventPen {
    events: Vec<OutlineEvent>,
}

impl OutlinePen for EventPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.events.push(OutlineEvent::MoveTo {
            x: fixed(x),
            y: fixed(y),
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.events.push(OutlineEvent::LineTo {
            x: fixed(x),
            y: fixed(y),
        });
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.events.push(OutlineEvent::QuadTo {
            cx0: fixed(cx0),
            cy0: fixed(cy0),
            x: fixed(x),
            y: fixed(y),
        });
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.events.push(OutlineEvent::CurveTo {
            cx0: fixed(cx0),
            cy0: fixed(cy0),
            cx1: fixed(cx1),
            cy1: fixed(cy1),
            x: fixed(x),
            y: fixed(y),
        });
    }

    fn close(&mut self) {
        // Contours are implicitly closed in the encoded form.
    }
}
