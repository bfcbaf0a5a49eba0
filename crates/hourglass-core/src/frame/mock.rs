//! Synthetic frame painting for tests

use super::{Frame, Rect};
use crate::vision::layout::glyph::{CHARS, TEMPLATES};
use crate::vision::layout::segment::DIGITS;
use crate::vision::segment::digit_cells;

/// Background of a display box: dark enough for the decoders, bright enough
/// to leave an edge against a black frame
pub const DISPLAY_FILL: [u8; 3] = [80, 80, 80];

const INK: [u8; 3] = [255, 255, 255];

/// Glyph rows in the bitmap font
const GLYPH_HEIGHT: usize = 7;

/// Segment strokes as `[x0, x1, y0, y1]` fractions of a digit cell, in mask
/// bit order: top, upper left, upper right, middle, lower left, lower right,
/// bottom
const STROKES: [[f64; 4]; 7] = [
    [0.12, 0.88, 0.06, 0.20],
    [0.12, 0.30, 0.06, 0.57],
    [0.70, 0.88, 0.06, 0.57],
    [0.12, 0.88, 0.43, 0.57],
    [0.12, 0.30, 0.43, 0.94],
    [0.70, 0.88, 0.43, 0.94],
    [0.12, 0.88, 0.80, 0.94],
];

/// One glyph position of a rendered percentage display
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphMark {
    /// A character from the font
    Char(char),
    /// Raw column bits, bit 0 on the bottom row
    Columns(Vec<u32>),
    /// Six-column percent sign
    Percent,
}

impl GlyphMark {
    pub fn text(text: &str) -> Vec<GlyphMark> {
        text.chars().map(GlyphMark::Char).collect()
    }

    fn columns(&self) -> Vec<u32> {
        match self {
            GlyphMark::Char(c) => {
                let index = CHARS
                    .iter()
                    .position(|x| x == c)
                    .unwrap_or_else(|| panic!("no glyph for {c:?}"));
                TEMPLATES[index].to_vec()
            }
            GlyphMark::Columns(columns) => columns.clone(),
            GlyphMark::Percent => vec![0b1100011, 0b1100100, 0b0001000, 0b0010000, 0b0100110, 0b1000110],
        }
    }
}

/// Builder painting solid boxes, countdown digits and glyphs onto a black frame
pub struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            frame: Frame::blank(width, height),
        }
    }

    pub fn fill(mut self, rect: Rect, rgb: [u8; 3]) -> Self {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                self.frame.set_rgb(x, y, rgb);
            }
        }
        self
    }

    /// Paint a countdown display; `None` leaves a cell blank
    pub fn countdown(mut self, rect: Rect, digits: [Option<u8>; 4]) -> Self {
        self = self.fill(rect, DISPLAY_FILL);
        for (cell, digit) in digit_cells(&rect).iter().zip(digits) {
            let Some(digit) = digit else { continue };
            let mask = DIGITS[digit as usize];
            let w = (cell.end_x - cell.start_x + 1) as f64;
            let h = (cell.end_y - cell.start_y + 1) as f64;
            for (bit, [x0, x1, y0, y1]) in STROKES.iter().enumerate() {
                if mask & (1 << bit) == 0 {
                    continue;
                }
                let left = cell.start_x + (w * x0) as usize;
                let right = cell.start_x + (w * x1) as usize;
                let top = cell.start_y + (h * y0) as usize;
                let bottom = cell.start_y + (h * y1) as usize;
                self = self.fill(Rect::new(left, top, right - left, bottom - top), INK);
            }
        }
        self
    }

    /// Paint a percentage display, one blank column between glyphs
    pub fn percentage(mut self, rect: Rect, marks: &[GlyphMark]) -> Self {
        self = self.fill(rect, DISPLAY_FILL);
        let top = rect.y + (rect.height - GLYPH_HEIGHT) / 2;
        let mut x = rect.x + 3;
        for mark in marks {
            let columns = mark.columns();
            for bits in &columns {
                for row in 0..GLYPH_HEIGHT {
                    if bits & (1 << (GLYPH_HEIGHT - 1 - row)) != 0 {
                        self.frame.set_rgb(x, top + row, INK);
                    }
                }
                x += 1;
            }
            x += 1;
        }
        self
    }

    /// Paint a pure red event marker
    pub fn marker(self, rect: Rect) -> Self {
        self.fill(rect, [255, 0, 0])
    }

    pub fn build(self) -> Frame {
        self.frame
    }
}
