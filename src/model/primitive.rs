//! Format-agnostic layout primitives.
//!
//! Every renderer consumes the same primitive stream. Coordinates are in
//! points (1/72 inch) with the origin at the top-left of the page and y
//! growing downwards. Children of a [`Primitive::Group`] are positioned
//! relative to the group's origin.

use serde::{Deserialize, Serialize};

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color(0xff, 0xff, 0xff);

    /// Build a color from a `0xRRGGBB` value.
    pub const fn hex(rgb: u32) -> Self {
        Color((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Uppercase hex without `#`, as used by word-processor markup.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// CSS color, e.g. `#1a73e8`.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Horizontal anchoring of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Resolved text style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Font size in points
    pub font_size: f32,
    /// Text color
    pub color: Color,
    /// Weight
    pub weight: FontWeight,
    /// Italic emphasis
    pub italic: bool,
    /// Shaded background behind the block, if any
    pub background: Option<Color>,
    /// Padding inside the background
    pub padding: f32,
    /// Line height multiplier
    pub line_height: f32,
    /// Anchoring of runs
    pub align: TextAlign,
}

impl Style {
    /// Plain black text at the given size.
    pub fn plain(font_size: f32) -> Self {
        Self {
            font_size,
            color: Color::BLACK,
            weight: FontWeight::Normal,
            italic: false,
            background: None,
            padding: 0.0,
            line_height: 1.6,
            align: TextAlign::Left,
        }
    }

    /// Same style, bold.
    pub fn bold(mut self) -> Self {
        self.weight = FontWeight::Bold;
        self
    }

    /// Same style, italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Same style at a different size.
    pub fn sized(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// Same style, resized by `delta` points.
    pub fn resized(self, delta: f32) -> Self {
        let size = (self.font_size + delta).max(1.0);
        self.sized(size)
    }

    /// Same style in a different color.
    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Same style with a different anchoring.
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Whether the weight is bold.
    pub fn is_bold(&self) -> bool {
        self.weight == FontWeight::Bold
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::plain(12.0)
    }
}

/// Fill and stroke for lines, rectangles and placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color (`None` = transparent)
    pub fill: Option<Color>,
    /// Stroke color (`None` = no outline)
    pub stroke: Option<Color>,
    /// Stroke width in points
    pub stroke_width: f32,
    /// Dash pattern `[on, off]`
    pub dash: Option<[f32; 2]>,
    /// Corner radius for rectangles
    pub corner_radius: f32,
}

impl ShapeStyle {
    /// A 1pt solid stroke without fill.
    pub fn stroke(color: Color) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: 1.0,
            dash: None,
            corner_radius: 0.0,
        }
    }

    /// A fill without stroke.
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            dash: None,
            corner_radius: 0.0,
        }
    }

    /// Add a fill.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Use a dash pattern.
    pub fn dashed(mut self, on: f32, off: f32) -> Self {
        self.dash = Some([on, off]);
        self
    }

    /// Round the corners.
    pub fn rounded(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }
}

/// Axis-aligned extent of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Bounds from position and size.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + width,
            bottom: y + height,
        }
    }

    /// Smallest bounds containing both.
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Shift by an offset.
    pub fn offset(self, dx: f32, dy: f32) -> Bounds {
        Bounds {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
        }
    }

    /// Width of the bounds.
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Height of the bounds.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// A drawable layout instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// A single line of text
    TextRun {
        text: String,
        x: f32,
        y: f32,
        /// Measured advance width
        width: f32,
        style: Style,
    },

    /// Word-wrapped text; `lines` holds the wrap computed at layout time
    TextBox {
        text: String,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        lines: Vec<String>,
        style: Style,
    },

    /// A straight line
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        style: ShapeStyle,
    },

    /// A rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        style: ShapeStyle,
    },

    /// A reserved box for an image resolved after layout
    ImagePlaceholder {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image_ref: String,
        style: ShapeStyle,
    },

    /// Positioned composite; children are relative to `(x, y)`
    Group {
        x: f32,
        y: f32,
        children: Vec<Primitive>,
    },
}

impl Primitive {
    /// Extent of the primitive in its own coordinate space.
    ///
    /// An empty group has zero-size bounds at its origin.
    pub fn bounds(&self) -> Bounds {
        match self {
            Primitive::TextRun {
                x, y, width, style, ..
            } => {
                let left = match style.align {
                    TextAlign::Left => *x,
                    TextAlign::Center => x - width / 2.0,
                    TextAlign::Right => x - width,
                };
                Bounds::from_xywh(left, *y, *width, style.font_size * SINGLE_LINE_FACTOR)
            }
            Primitive::TextBox {
                x,
                y,
                width,
                height,
                ..
            } => Bounds::from_xywh(*x, *y, *width, *height),
            Primitive::Line { x1, y1, x2, y2, .. } => Bounds {
                left: x1.min(*x2),
                top: y1.min(*y2),
                right: x1.max(*x2),
                bottom: y1.max(*y2),
            },
            Primitive::Rect {
                x,
                y,
                width,
                height,
                ..
            }
            | Primitive::ImagePlaceholder {
                x,
                y,
                width,
                height,
                ..
            } => Bounds::from_xywh(*x, *y, *width, *height),
            Primitive::Group { x, y, children } => children
                .iter()
                .map(Primitive::bounds)
                .reduce(Bounds::union)
                .unwrap_or(Bounds::from_xywh(0.0, 0.0, 0.0, 0.0))
                .offset(*x, *y),
        }
    }

    /// Move the primitive to a new origin (groups) or shift it (leaves).
    pub fn translated(self, dx: f32, dy: f32) -> Primitive {
        match self {
            Primitive::TextRun {
                text,
                x,
                y,
                width,
                style,
            } => Primitive::TextRun {
                text,
                x: x + dx,
                y: y + dy,
                width,
                style,
            },
            Primitive::TextBox {
                text,
                x,
                y,
                width,
                height,
                lines,
                style,
            } => Primitive::TextBox {
                text,
                x: x + dx,
                y: y + dy,
                width,
                height,
                lines,
                style,
            },
            Primitive::Line {
                x1,
                y1,
                x2,
                y2,
                style,
            } => Primitive::Line {
                x1: x1 + dx,
                y1: y1 + dy,
                x2: x2 + dx,
                y2: y2 + dy,
                style,
            },
            Primitive::Rect {
                x,
                y,
                width,
                height,
                style,
            } => Primitive::Rect {
                x: x + dx,
                y: y + dy,
                width,
                height,
                style,
            },
            Primitive::ImagePlaceholder {
                x,
                y,
                width,
                height,
                image_ref,
                style,
            } => Primitive::ImagePlaceholder {
                x: x + dx,
                y: y + dy,
                width,
                height,
                image_ref,
                style,
            },
            Primitive::Group { x, y, children } => Primitive::Group {
                x: x + dx,
                y: y + dy,
                children,
            },
        }
    }

    /// Flatten into leaf primitives in absolute page coordinates, in paint
    /// order.
    pub fn flatten(&self) -> Vec<Primitive> {
        let mut out = Vec::new();
        self.flatten_into(0.0, 0.0, &mut out);
        out
    }

    fn flatten_into(&self, dx: f32, dy: f32, out: &mut Vec<Primitive>) {
        match self {
            Primitive::Group { x, y, children } => {
                for child in children {
                    child.flatten_into(dx + x, dy + y, out);
                }
            }
            leaf => out.push(leaf.clone().translated(dx, dy)),
        }
    }

    /// Check if this is a text primitive.
    pub fn is_text(&self) -> bool {
        matches!(self, Primitive::TextRun { .. } | Primitive::TextBox { .. })
    }

    /// Text carried by a text primitive.
    pub fn text(&self) -> Option<&str> {
        match self {
            Primitive::TextRun { text, .. } | Primitive::TextBox { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Height of a single unwrapped text line relative to its font size.
pub const SINGLE_LINE_FACTOR: f32 = 1.13;
