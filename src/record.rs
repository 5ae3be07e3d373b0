//! The assembled face record and its canonical glyph table.

use read_fonts::types::GlyphId;
use serde::{Serialize, Serializer};

use crate::{
    outline::{self, PointCommand},
    source::FaceInfo,
};

/// One glyph of the canonical table.
///
/// Serializes with the outline flattened into a `points` array: a type tag
/// per command followed by that command's values, as produced by
/// [`outline::flatten`].
#[derive(Clone, Debug, Serialize)]
pub struct GlyphRecord {
    /// Character code the glyph was selected by.
    pub char_code: u32,
    /// Advance width.
    pub advance: i32,
    /// Left edge: horizontal bearing.
    pub min_x: i32,
    /// Right edge: bearing plus width.
    pub max_x: i32,
    /// Bottom edge: top bearing minus height.
    pub min_y: i32,
    /// Top edge: top bearing.
    pub max_y: i32,
    /// Delta encoded outline.
    #[serde(rename = "points", serialize_with = "flat_points")]
    pub commands: Vec<PointCommand>,
    /// Source assigned identifier, kept for kerning queries after the
    /// table is built. Not part of the serialized record.
    #[serde(skip)]
    pub(crate) source_id: GlyphId,
}

fn flat_points<S: Serializer>(
    commands: &[PointCommand],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(outline::flatten(commands))
}

/// One pair adjustment of the sparse kerning list.
///
/// The glyph fields are positions in the canonical table, not source
/// identifiers.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize)]
pub struct KerningEntry {
    pub left_glyph: u32,
    pub right_glyph: u32,
    pub x: i32,
    pub y: i32,
}

/// Canonically ordered glyph table.
///
/// Glyphs sit in ascending character code order and are identified by
/// position from then on: kerning entries and consumers address glyphs by
/// index into this table, never by source identifier.
#[derive(Clone, Default, Debug)]
pub struct GlyphTable {
    glyphs: Vec<GlyphRecord>,
}

impl GlyphTable {
    /// Builds the canonical table from records in selection order.
    ///
    /// The sort is stable, so records with equal character codes (possible
    /// only with a malformed source or selection) keep their relative
    /// order.
    pub fn new(mut glyphs: Vec<GlyphRecord>) -> Self {
        glyphs.sort_by_key(|glyph| glyph.char_code);
        Self { glyphs }
    }

    /// Table position of a character code, if present.
    pub fn position(&self, char_code: u32) -> Option<usize> {
        self.glyphs
            .binary_search_by_key(&char_code, |glyph| glyph.char_code)
            .ok()
    }

    /// The glyphs in table order.
    pub fn glyphs(&self) -> &[GlyphRecord] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    fn into_glyphs(self) -> Vec<GlyphRecord> {
        self.glyphs
    }
}

/// Assembled result of a face import.
///
/// Pure aggregation of the three upstream products: face-wide properties,
/// the canonical glyph table and the kerning list. `kerning` serializes as
/// `null` when the face reports no kerning support, and as a (possibly
/// empty) array otherwise.
#[derive(Clone, Debug, Serialize)]
pub struct FaceRecord {
    pub has_kerning: bool,
    pub is_fixed_width: bool,
    pub has_glyph_names: bool,
    pub is_italic: bool,
    pub is_bold: bool,
    pub num_glyphs: u32,
    pub family_name: String,
    pub style_name: String,
    pub em_size: i32,
    pub ascend: i32,
    pub descend: i32,
    pub height: i32,
    pub glyphs: Vec<GlyphRecord>,
    pub kerning: Option<Vec<KerningEntry>>,
}

impl FaceRecord {
    /// Combines the import products into the output record.
    pub fn assemble(
        info: FaceInfo,
        table: GlyphTable,
        kerning: Option<Vec<KerningEntry>>,
    ) -> Self {
        Self {
            has_kerning: kerning.is_some(),
            is_fixed_width: info.is_fixed_width,
            has_glyph_names: info.has_glyph_names,
            is_italic: info.is_italic,
            is_bold: info.is_bold,
            num_glyphs: table.len() as u32,
            family_name: info.family_name,
            style_name: info.style_name,
            em_size: info.em_size,
            ascend: info.ascend,
            descend: info.descend,
            height: info.height,
            glyphs: table.into_glyphs(),
            kerning,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn record(char_code: u32, source_id: u32) -> GlyphRecord {
        GlyphRecord {
            char_code,
            advance: 600,
            min_x: 0,
            max_x: 500,
            min_y: -20,
            max_y: 700,
            commands: Vec::new(),
            source_id: GlyphId::new(source_id),
        }
    }

    #[test]
    fn table_sorts_by_char_code() {
        let table = GlyphTable::new(vec![record(0x43, 7), record(0x41, 9), record(0x42, 3)]);
        let codes: Vec<_> = table.glyphs().iter().map(|g| g.char_code).collect();
        assert_eq!(codes, vec![0x41, 0x42, 0x43]);
    }

    #[test]
    fn position_is_table_index() {
        let table = GlyphTable::new(vec![record(0x62, 1), record(0x30, 2), record(0x41, 3)]);
        assert_eq!(table.position(0x30), Some(0));
        assert_eq!(table.position(0x41), Some(1));
        assert_eq!(table.position(0x62), Some(2));
        assert_eq!(table.position(0x61), None);
    }

    #[test]
    fn duplicate_codes_keep_selection_order() {
        let first = record(0x41, 10);
        let second = record(0x41, 11);
        let table = GlyphTable::new(vec![record(0x40, 1), first, second]);
        assert_eq!(table.glyphs()[1].source_id, GlyphId::new(10));
        assert_eq!(table.glyphs()[2].source_id, GlyphId::new(11));
    }

    #[test]
    fn glyph_record_serializes_flat_points() {
        let mut glyph = record(0x41, 1);
        glyph.commands = vec![
            PointCommand::Move { x: 64, y: 0 },
            PointCommand::Line { dx: 0, dy: 128 },
        ];
        let value = serde_json::to_value(&glyph).unwrap();
        assert_eq!(
            value,
            json!({
                "char_code": 0x41,
                "advance": 600,
                "min_x": 0,
                "max_x": 500,
                "min_y": -20,
                "max_y": 700,
                "points": [1, 64, 0, 2, 0, 128],
            })
        );
    }

    #[test]
    fn kerning_serializes_null_when_unsupported() {
        let record = FaceRecord::assemble(FaceInfo::default(), GlyphTable::default(), None);
        assert!(!record.has_kerning);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kerning"], serde_json::Value::Null);
    }

    #[test]
    fn kerning_serializes_empty_list_when_supported() {
        let record =
            FaceRecord::assemble(FaceInfo::default(), GlyphTable::default(), Some(Vec::new()));
        assert!(record.has_kerning);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["kerning"], json!([]));
    }

    #[test]
    fn assemble_copies_face_info() {
        let info = FaceInfo {
            family_name: "Test Family".into(),
            style_name: "Bold Italic".into(),
            is_fixed_width: false,
            has_glyph_names: true,
            is_italic: true,
            is_bold: true,
            em_size: 2048,
            ascend: 1900,
            descend: -500,
            height: 2400,
        };
        let table = GlyphTable::new(vec![record(0x20, 1), record(0x41, 2)]);
        let record = FaceRecord::assemble(info, table, Some(Vec::new()));
        assert_eq!(record.num_glyphs, 2);
        assert_eq!(record.family_name, "Test Family");
        assert_eq!(record.style_name, "Bold Italic");
        assert!(record.is_bold && record.is_italic && record.has_glyph_names);
        assert_eq!(
            (record.em_size, record.ascend, record.descend, record.height),
            (2048, 1900, -500, 2400)
        );
    }
}
