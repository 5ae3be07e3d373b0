//! The glyph source interface consumed by the importer.

use read_fonts::types::{GlyphId, Point};

use crate::outline::OutlineEvent;

/// Extent box of a single glyph.
///
/// Derived from the glyph's horizontal bearings and dimensions, in the
/// same units as every other value the source reports.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct GlyphExtents {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl GlyphExtents {
    /// Returns the control box of an outline: the tightest box containing
    /// every on-curve and control point.
    ///
    /// Wider than the true bounding box when a curve does not pass through
    /// its control points. `None` for an empty outline.
    pub fn control_box(events: &[OutlineEvent]) -> Option<Self> {
        if events.is_empty() {
            return None;
        }
        // Every event carries at least one point, so the sentinels are
        // always replaced.
        let mut cbox = Self {
            x_min: i32::MAX,
            x_max: i32::MIN,
            y_min: i32::MAX,
            y_max: i32::MIN,
        };
        for event in events {
            match *event {
                OutlineEvent::MoveTo { x, y } | OutlineEvent::LineTo { x, y } => {
                    cbox.extend(x, y);
                }
                OutlineEvent::QuadTo { cx0, cy0, x, y } => {
                    cbox.extend(cx0, cy0);
                    cbox.extend(x, y);
                }
                OutlineEvent::CurveTo {
                    cx0,
                    cy0,
                    cx1,
                    cy1,
                    x,
                    y,
                } => {
                    cbox.extend(cx0, cy0);
                    cbox.extend(cx1, cy1);
                    cbox.extend(x, y);
                }
            }
        }
        Some(cbox)
    }

    fn extend(&mut self, x: i32, y: i32) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }
}

/// A glyph as loaded from a source, prior to delta encoding.
#[derive(Clone, Debug)]
pub struct RawGlyph {
    /// Source assigned glyph identifier.
    ///
    /// Opaque to the import pipeline; it is only handed back to the source
    /// for kerning queries.
    pub id: GlyphId,
    /// Advance width.
    pub advance: i32,
    /// Extent box.
    pub extents: GlyphExtents,
    /// Outline events in visit order.
    pub events: Vec<OutlineEvent>,
}

/// Face-wide properties reported by a source.
///
/// Vertical metrics and the em size are in the source's design units, not
/// the scaled glyph units. Name fields are empty when the face does not
/// carry them.
#[derive(Clone, Default, Debug)]
pub struct FaceInfo {
    pub family_name: String,
    pub style_name: String,
    pub is_fixed_width: bool,
    pub has_glyph_names: bool,
    pub is_italic: bool,
    pub is_bold: bool,
    pub em_size: i32,
    pub ascend: i32,
    pub descend: i32,
    pub height: i32,
}

/// Interface for the font engine side of an import.
///
/// A source wraps one loaded face at a fixed scale and owns the engine's
/// mutable current-glyph state; use one source per import request. Every
/// glyph-space value a source reports (outline coordinates, advances,
/// extents, kerning) must share a single unit system of the source's
/// choosing. The built-in [`FaceSource`](crate::FaceSource) reports 26.6
/// fixed point.
pub trait GlyphSource {
    /// Face-wide properties for the output record.
    fn face_info(&self) -> FaceInfo;

    /// Every character code the face maps to a glyph, in the source's
    /// enumeration order.
    fn char_codes(&self) -> Vec<u32>;

    /// Resolves a character code and loads its glyph.
    ///
    /// Returns `None` when no glyph maps to the code or the glyph fails to
    /// load; the importer silently skips such codes.
    fn load_glyph(&mut self, code: u32) -> Option<RawGlyph>;

    /// Whether the face carries pair kerning data.
    ///
    /// When this is false the importer never issues kerning queries.
    fn has_kerning(&self) -> bool;

    /// Kerning adjustment for the ordered glyph pair (left, right).
    ///
    /// Zero on both axes for pairs without an adjustment.
    fn kerning(&self, left: GlyphId, right: GlyphId) -> Point<i32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_box_covers_control_points() {
        let events = [
            OutlineEvent::MoveTo { x: 0, y: 0 },
            OutlineEvent::QuadTo {
                cx0: 50,
                cy0: 120,
                x: 100,
                y: 0,
            },
            OutlineEvent::LineTo { x: 0, y: 0 },
        ];
        assert_eq!(
            GlyphExtents::control_box(&events),
            Some(GlyphExtents {
                x_min: 0,
                x_max: 100,
                y_min: 0,
                y_max: 120,
            })
        );
    }

    #[test]
    fn control_box_of_empty_outline() {
        assert_eq!(GlyphExtents::control_box(&[]), None);
    }

    #[test]
    fn control_box_away_from_origin() {
        // A box that does not touch the origin must not be inflated by the
        // initial state.
        let events = [
            OutlineEvent::MoveTo { x: 40, y: 50 },
            OutlineEvent::LineTo { x: 60, y: 70 },
        ];
        assert_eq!(
            GlyphExtents::control_box(&events),
            Some(GlyphExtents {
                x_min: 40,
                x_max: 60,
                y_min: 50,
                y_max: 70,
            })
        );
    }
}
