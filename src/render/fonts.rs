//! Font discovery and glyph outlines for the raster surface.
//!
//! Faces are found through a `fontdb` database (system fonts, a font
//! directory or raw bytes) and drawn from their `ttf-parser` outlines.

use log::debug;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tiny_skia::PathBuilder;

/// Families tried before the generic sans-serif fallback. Hangul coverage
/// comes first since most worksheets are Korean.
const PREFERRED_FAMILIES: &[&str] = &[
    "Noto Sans CJK KR",
    "Noto Sans KR",
    "NanumGothic",
    "Malgun Gothic",
    "Apple SD Gothic Neo",
    "DejaVu Sans",
    "Arial",
];

/// Searchable collection of font faces.
pub struct FontLibrary {
    db: fontdb::Database,
}

impl FontLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self {
            db: fontdb::Database::new(),
        }
    }

    /// Library holding the fonts installed on this machine.
    pub fn system() -> Self {
        let mut library = Self::new();
        library.db.load_system_fonts();
        debug!("Loaded {} system font faces", library.db.len());
        library
    }

    /// Add every font file under `dir`.
    pub fn with_font_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.db.load_fonts_dir(dir);
        self
    }

    /// Add a font from raw TrueType/OpenType bytes.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        self.db.load_font_data(data);
        self
    }

    /// Number of faces known to the library.
    pub fn len(&self) -> usize {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Pick a regular-weight face, preferring Hangul-capable families.
    pub fn resolve(&self) -> Option<FontFace> {
        let families: Vec<fontdb::Family<'_>> = PREFERRED_FAMILIES
            .iter()
            .map(|&name| fontdb::Family::Name(name))
            .chain(std::iter::once(fontdb::Family::SansSerif))
            .collect();
        let query = fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        };

        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|face| face.id))?;
        self.db
            .with_face_data(id, |data, index| FontFace::from_data(data.to_vec(), index))
            .flatten()
    }
}

impl Default for FontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontLibrary")
            .field("faces", &self.db.len())
            .finish()
    }
}

/// A parsed-on-demand font face.
#[derive(Clone)]
pub struct FontFace {
    data: Arc<Vec<u8>>,
    index: u32,
}

impl FontFace {
    /// Wrap font bytes; `None` if they do not parse.
    pub fn from_data(data: Vec<u8>, index: u32) -> Option<Self> {
        if ttf_parser::Face::parse(&data, index).is_err() {
            return None;
        }
        Some(Self {
            data: Arc::new(data),
            index,
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.index).ok()
    }

    /// Whether the face has a glyph for `ch`.
    pub fn has_glyph(&self, ch: char) -> bool {
        self.face()
            .and_then(|face| face.glyph_index(ch))
            .is_some()
    }

    /// Append the outline of `ch` to `builder`.
    ///
    /// The glyph is centred in a cell `advance` wide starting at `x`, with
    /// its ascender at `top`. Returns `false` when the face has no outline
    /// for the character.
    pub fn outline(
        &self,
        builder: &mut PathBuilder,
        ch: char,
        x: f32,
        top: f32,
        size: f32,
        advance: f32,
    ) -> bool {
        let Some(face) = self.face() else {
            return false;
        };
        let Some(glyph) = face.glyph_index(ch) else {
            return false;
        };

        let scale = size / f32::from(face.units_per_em().max(1));
        let glyph_advance = face
            .glyph_hor_advance(glyph)
            .map(|a| f32::from(a) * scale)
            .unwrap_or(advance);
        let baseline = top + f32::from(face.ascender()) * scale;

        let mut pen = GlyphPen {
            builder,
            x: x + (advance - glyph_advance) / 2.0,
            y: baseline,
            scale,
        };
        face.outline_glyph(glyph, &mut pen).is_some()
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Maps font units (y up) onto page points (y down).
struct GlyphPen<'a> {
    builder: &'a mut PathBuilder,
    x: f32,
    y: f32,
    scale: f32,
}

impl GlyphPen<'_> {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for GlyphPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
