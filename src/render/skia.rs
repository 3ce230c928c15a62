//! tiny-skia drawing surface.
//!
//! Glyphs are placed on the same fixed advances the layout engine measured
//! with, so rasterized lines occupy exactly the width they were wrapped to.
//! Each glyph is filled from the outline of the configured [`FontFace`];
//! without a face, or for characters it lacks, a solid box stands in.

use super::fonts::FontFace;
use super::raster::{fit_scale, DrawingSurface};
use crate::error::{Error, Result};
use crate::layout::FixedAdvanceMetrics;
use crate::model::{Color, Primitive, ShapeStyle, Style, TextAlign};
use tiny_skia::{
    FillRule, IntSize, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, StrokeDash,
    Transform,
};

/// Points per inch of the layout coordinate space.
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterizes pages into PNG images.
#[derive(Debug)]
pub struct SkiaSurface {
    scale: f32,
    metrics: FixedAdvanceMetrics,
    font: Option<FontFace>,
    pixmap: Option<Pixmap>,
}

impl SkiaSurface {
    /// Surface at 72 DPI (one pixel per point).
    pub fn new() -> Self {
        Self::with_scale(1.0)
    }

    /// Surface at the given resolution.
    pub fn with_dpi(dpi: f32) -> Self {
        Self::with_scale(dpi / POINTS_PER_INCH)
    }

    /// Surface with an explicit pixels-per-point factor.
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale: if scale > 0.0 { scale } else { 1.0 },
            metrics: FixedAdvanceMetrics::default(),
            font: None,
            pixmap: None,
        }
    }

    /// Draw glyph outlines from `font`.
    pub fn with_font(mut self, font: Option<FontFace>) -> Self {
        self.font = font;
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    fn fill(&mut self, path: &Path, color: Color) {
        let transform = self.transform();
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.fill_path(path, &paint(color), FillRule::Winding, transform, None);
        }
    }

    fn stroke(&mut self, path: &Path, style: &ShapeStyle) {
        let Some(color) = style.stroke else {
            return;
        };
        let dash = style
            .dash
            .and_then(|[on, off]| StrokeDash::new(vec![on, off], 0.0));
        let stroke = Stroke {
            width: style.stroke_width.max(0.5),
            dash,
            ..Stroke::default()
        };
        let transform = self.transform();
        if let Some(pixmap) = self.pixmap.as_mut() {
            pixmap.stroke_path(path, &paint(color), &stroke, transform, None);
        }
    }

    fn draw_shape(&mut self, x: f32, y: f32, width: f32, height: f32, style: &ShapeStyle) {
        let Some(path) = rect_path(x, y, width, height, style.corner_radius) else {
            return;
        };
        if let Some(fill) = style.fill {
            self.fill(&path, fill);
        }
        self.stroke(&path, style);
    }

    fn draw_line_of_text(&mut self, text: &str, x: f32, y: f32, style: &Style) {
        let size = style.font_size;
        let bold = style.is_bold();
        let factor = if bold { self.metrics.bold_factor } else { 1.0 };

        let mut outlines = PathBuilder::new();
        let mut boxes = PathBuilder::new();
        let mut cx = x;
        for ch in text.chars() {
            let advance = self.metrics.advance(ch) * size * factor;
            if !ch.is_whitespace() && !ch.is_control() {
                let outlined = self
                    .font
                    .as_ref()
                    .is_some_and(|font| font.outline(&mut outlines, ch, cx, y, size, advance));
                if !outlined {
                    push_glyph_box(&mut boxes, ch, cx, y, size, advance);
                }
            }
            cx += advance;
        }

        if let Some(path) = outlines.finish() {
            self.fill(&path, style.color);
            if bold {
                // Synthetic emboldening: a thin stroke around the outline.
                let emphasis = ShapeStyle {
                    stroke_width: size * 0.04,
                    ..ShapeStyle::stroke(style.color)
                };
                self.stroke(&path, &emphasis);
            }
        }
        if let Some(path) = boxes.finish() {
            self.fill(&path, style.color);
        }
    }

    fn text_width(&self, text: &str, style: &Style) -> f32 {
        let ems: f32 = text.chars().map(|c| self.metrics.advance(c)).sum();
        let factor = if style.is_bold() {
            self.metrics.bold_factor
        } else {
            1.0
        };
        ems * style.font_size * factor
    }
}

impl Default for SkiaSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSurface for SkiaSurface {
    fn begin_page(&mut self, width: f32, height: f32) -> Result<()> {
        let w = (width * self.scale).ceil() as u32;
        let h = (height * self.scale).ceil() as u32;
        let mut pixmap = Pixmap::new(w, h)
            .ok_or_else(|| Error::Render(format!("Failed to create pixmap {}x{}", w, h)))?;
        pixmap.fill(tiny_skia::Color::WHITE);
        self.pixmap = Some(pixmap);
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::TextRun {
                text,
                x,
                y,
                width,
                style,
            } => {
                let left = match style.align {
                    TextAlign::Left => *x,
                    TextAlign::Center => x - width / 2.0,
                    TextAlign::Right => x - width,
                };
                self.draw_line_of_text(text, left, *y, style);
            }
            Primitive::TextBox {
                x,
                y,
                width,
                lines,
                style,
                ..
            } => {
                let step = style.font_size * style.line_height;
                for (i, line) in lines.iter().enumerate() {
                    let line_width = self.text_width(line, style);
                    let left = match style.align {
                        TextAlign::Left => *x,
                        TextAlign::Center => x + (width - line_width) / 2.0,
                        TextAlign::Right => x + width - line_width,
                    };
                    self.draw_line_of_text(line, left, y + step * i as f32, style);
                }
            }
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                style,
            } => {
                let mut pb = PathBuilder::new();
                pb.move_to(*x1, *y1);
                pb.line_to(*x2, *y2);
                if let Some(path) = pb.finish() {
                    self.stroke(&path, style);
                }
            }
            Primitive::Rect {
                x,
                y,
                width,
                height,
                style,
            }
            | Primitive::ImagePlaceholder {
                x,
                y,
                width,
                height,
                style,
                ..
            } => self.draw_shape(*x, *y, *width, *height, style),
            Primitive::Group { .. } => {
                for leaf in primitive.flatten() {
                    self.draw(&leaf);
                }
            }
        }
    }

    fn draw_image(
        &mut self,
        bytes: &[u8],
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::Render(format!("Image decode failed: {}", e)))?
            .to_rgba8();
        let (iw, ih) = decoded.dimensions();

        let mut data = decoded.into_raw();
        premultiply(&mut data);
        let size = IntSize::from_wh(iw, ih)
            .ok_or_else(|| Error::Render(format!("Invalid image size {}x{}", iw, ih)))?;
        let image = Pixmap::from_vec(data, size)
            .ok_or_else(|| Error::Render("Image buffer size mismatch".to_string()))?;

        let fit = fit_scale(iw as f32, ih as f32, width, height);
        let k = self.scale;
        let transform = Transform::from_row(k * fit, 0.0, 0.0, k * fit, k * x, k * y);
        let pixmap = self
            .pixmap
            .as_mut()
            .ok_or_else(|| Error::Render("draw_image outside of a page".to_string()))?;
        pixmap.draw_pixmap(0, 0, image.as_ref(), &PixmapPaint::default(), transform, None);
        Ok(())
    }

    fn finish_page(&mut self) -> Result<Vec<u8>> {
        let pixmap = self
            .pixmap
            .take()
            .ok_or_else(|| Error::Render("finish_page without begin_page".to_string()))?;
        pixmap
            .encode_png()
            .map_err(|e| Error::Encode(format!("PNG encoding failed: {}", e)))
    }
}

/// Solid stand-in for a glyph with no outline. Lowercase latin sits at
/// x-height; everything else at cap height.
fn push_glyph_box(pb: &mut PathBuilder, ch: char, x: f32, y: f32, size: f32, advance: f32) {
    let top = if ch.is_ascii_lowercase() {
        y + size * 0.45
    } else {
        y + size * 0.2
    };
    let bottom = y + size * 0.95;
    if let Some(rect) = Rect::from_ltrb(x + advance * 0.1, top, x + advance * 0.9, bottom) {
        pb.push_rect(rect);
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, 255);
    paint.anti_alias = true;
    paint
}

fn rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    let rect = Rect::from_xywh(x, y, width, height)?;
    let r = radius.min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (right, bottom) = (x + width, y + height);
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.quad_to(right, y, right, y + r);
    pb.line_to(right, bottom - r);
    pb.quad_to(right, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.quad_to(x, bottom, x, bottom - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// Convert straight RGBA to the premultiplied form tiny-skia expects.
fn premultiply(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a < 255 {
            for c in &mut px[..3] {
                *c = ((*c as u16 * a + 127) / 255) as u8;
            }
        }
    }
}
