//! Bitmap-font percentage reader.
//!
//! The percentage is rendered in a 5x7 bitmap font. Columns of the display are
//! scanned left to right; ink columns accumulate into a glyph until a blank
//! column closes it, and the closed glyph is matched against the template
//! table by counting mismatched bits.
//!
//! The decoded text always ends in one unrecognized marker: either a glyph
//! that matched nothing (the percent sign) or the one appended when the scan
//! runs out of columns. A reading is accepted only when that marker is the
//! sole unrecognized glyph and any decimal point is followed by one digit.

use crate::frame::{PixelBuffer, Rect};

use super::layout::glyph::{
    CHARS, DECIMAL_POINT, INK, LUMA, MAX_MISMATCH, SHARPEN, TEMPLATES, UNRECOGNIZED, WIDTH,
};

/// Left shift that drops bits instead of overflowing
fn shl(value: u64, shift: usize) -> u64 {
    if shift >= u64::BITS as usize {
        0
    } else {
        value << shift
    }
}

/// Rounded luma of every pixel in `rect`
fn luma_grid(buffer: &PixelBuffer, rect: &Rect) -> Vec<i32> {
    let mut grid = Vec::with_capacity(rect.area());
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            let [r, g, b] = buffer.rgb(x, y);
            let luma = LUMA[0] * r as f64 + LUMA[1] * g as f64 + LUMA[2] * b as f64;
            grid.push(luma.round() as i32);
        }
    }
    grid
}

/// Columns of the glyph currently being scanned, bottom-aligned on the
/// deepest ink row seen so far
#[derive(Debug, Default)]
struct GlyphColumns {
    columns: Vec<u64>,
    deepest: Option<usize>,
}

impl GlyphColumns {
    /// Add a column whose bits run from its topmost ink row down to `last_row`
    fn push(&mut self, bits: u64, last_row: usize) {
        let deepest = match self.deepest {
            Some(d) if d >= last_row => d,
            Some(d) => {
                for column in &mut self.columns {
                    *column = shl(*column, last_row - d);
                }
                last_row
            }
            None => last_row,
        };
        self.deepest = Some(deepest);
        self.columns.push(shl(bits, deepest - last_row));
    }

    fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Classify the buffered glyph and start a new one
    fn flush(&mut self) -> char {
        let glyph = classify(std::mem::take(&mut self.columns));
        self.deepest = None;
        glyph
    }
}

/// Match buffered columns against the templates
fn classify(mut columns: Vec<u64>) -> char {
    // Center narrow glyphs in the template width
    let mut center = columns.len() / 2;
    while center < WIDTH / 2 {
        columns.insert(0, 0);
        center += 1;
    }
    columns.resize(columns.len().max(WIDTH), 0);
    if columns.len() > WIDTH {
        return UNRECOGNIZED;
    }

    let mut best: Option<(usize, u32)> = None;
    for (i, template) in TEMPLATES.iter().enumerate() {
        let mismatch: u32 = template
            .iter()
            .zip(&columns)
            .map(|(&t, &c)| (t as u64 ^ c).count_ones())
            .sum();
        if best.is_none_or(|(_, m)| mismatch < m) {
            best = Some((i, mismatch));
        }
    }

    match best {
        Some((i, mismatch)) if mismatch < MAX_MISMATCH => CHARS[i],
        _ => UNRECOGNIZED,
    }
}

/// Decode the glyph string shown in `rect`, terminator included
pub fn read_glyphs(buffer: &PixelBuffer, rect: &Rect) -> String {
    let mut text = String::new();
    if !buffer.contains(rect) || rect.width < 3 || rect.height < 3 {
        text.push(UNRECOGNIZED);
        return text;
    }

    let luma = luma_grid(buffer, rect);
    let at = |x: usize, y: usize| luma[x + y * rect.width];
    let mut glyph = GlyphColumns::default();

    for x in 1..rect.width - 1 {
        let mut bits = 0u64;
        let mut last_row = None;
        for y in 1..rect.height - 1 {
            let mut sharpened = 0;
            for (dy, row) in SHARPEN.iter().enumerate() {
                for (dx, &weight) in row.iter().enumerate() {
                    sharpened += at(x + dx - 1, y + dy - 1) * weight;
                }
            }
            if sharpened >= INK {
                if let Some(last) = last_row {
                    bits = shl(bits, y - last);
                }
                bits |= 1;
                last_row = Some(y);
            }
        }

        match last_row {
            Some(last) => glyph.push(bits, last),
            None if !glyph.is_empty() => text.push(glyph.flush()),
            None => {}
        }
    }

    if !glyph.is_empty() {
        text.push(glyph.flush());
    }
    if !text.ends_with(UNRECOGNIZED) {
        text.push(UNRECOGNIZED);
    }
    text
}

/// Parse decoded glyph text into a percentage.
///
/// The text must be longer than three characters, contain its only
/// unrecognized marker at the end, and have any decimal point exactly two
/// characters before that marker.
pub fn parse_reading(text: &str) -> Option<f64> {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    if len <= 3 {
        return None;
    }
    if chars.iter().position(|&c| c == UNRECOGNIZED) != Some(len - 1) {
        return None;
    }
    match chars.iter().position(|&c| c == DECIMAL_POINT) {
        Some(point) if point != len - 3 => return None,
        _ => {}
    }
    chars[..len - 1].iter().collect::<String>().parse().ok()
}

/// Read the percentage shown in `rect`
pub fn read_percentage(buffer: &PixelBuffer, rect: &Rect) -> Option<f64> {
    parse_reading(&read_glyphs(buffer, rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::mock::{DISPLAY_FILL, FrameBuilder, GlyphMark};

    const DISPLAY: Rect = Rect::new(8, 6, 90, 21);

    fn render(marks: &[GlyphMark]) -> crate::frame::Frame {
        FrameBuilder::new(110, 34).percentage(DISPLAY, marks).build()
    }

    #[test]
    fn test_reads_decimal_value() {
        let frame = render(&GlyphMark::text("45.6"));
        assert_eq!(read_glyphs(&frame.as_buffer(), &DISPLAY), "45.6#");
        assert_eq!(read_percentage(&frame.as_buffer(), &DISPLAY), Some(45.6));
    }

    #[test]
    fn test_reads_value_followed_by_percent_sign() {
        let mut marks = GlyphMark::text("100");
        marks.push(GlyphMark::Percent);
        let frame = render(&marks);
        assert_eq!(read_glyphs(&frame.as_buffer(), &DISPLAY), "100#");
        assert_eq!(read_percentage(&frame.as_buffer(), &DISPLAY), Some(100.0));
    }

    #[test]
    fn test_reads_every_digit() {
        let frame = render(&GlyphMark::text("0123456789"));
        assert_eq!(read_glyphs(&frame.as_buffer(), &DISPLAY), "0123456789#");
    }

    #[test]
    fn test_malformed_glyph_rejects_reading() {
        let marks = vec![
            GlyphMark::Char('4'),
            GlyphMark::Columns(vec![127, 127, 127, 127, 127]),
            GlyphMark::Char('.'),
            GlyphMark::Char('6'),
        ];
        let frame = render(&marks);
        assert_eq!(read_glyphs(&frame.as_buffer(), &DISPLAY), "4#.6#");
        assert_eq!(read_percentage(&frame.as_buffer(), &DISPLAY), None);
    }

    #[test]
    fn test_wide_glyph_is_unrecognized() {
        let marks = vec![
            GlyphMark::Columns(vec![127; 7]),
            GlyphMark::Char('5'),
        ];
        let frame = render(&marks);
        assert_eq!(read_glyphs(&frame.as_buffer(), &DISPLAY), "#5#");
    }

    #[test]
    fn test_single_bit_error_is_tolerated() {
        // '8' with one extra bit set in its middle column
        let marks = vec![
            GlyphMark::Char('3'),
            GlyphMark::Columns(vec![54, 73, 75, 73, 54]),
            GlyphMark::Char('.'),
            GlyphMark::Char('5'),
        ];
        let frame = render(&marks);
        assert_eq!(read_percentage(&frame.as_buffer(), &DISPLAY), Some(38.5));
    }

    #[test]
    fn test_empty_display_is_rejected() {
        let frame = FrameBuilder::new(110, 34).fill(DISPLAY, DISPLAY_FILL).build();
        assert_eq!(read_glyphs(&frame.as_buffer(), &DISPLAY), "#");
        assert_eq!(read_percentage(&frame.as_buffer(), &DISPLAY), None);
    }

    #[test]
    fn test_parse_reading_contract() {
        assert_eq!(parse_reading("45.6#"), Some(45.6));
        assert_eq!(parse_reading("100#"), Some(100.0));
        assert_eq!(parse_reading("5.5#"), Some(5.5));
        // Too short
        assert_eq!(parse_reading("55#"), None);
        // Missing terminator
        assert_eq!(parse_reading("45.6"), None);
        // Unrecognized glyph before the end
        assert_eq!(parse_reading("4#.6#"), None);
        // Decimal point in the wrong place
        assert_eq!(parse_reading("12.34#"), None);
        assert_eq!(parse_reading("456.#"), None);
    }

    #[test]
    fn test_classify_pads_narrow_glyphs() {
        assert_eq!(classify(vec![1]), '.');
        assert_eq!(classify(vec![32, 127]), '1');
        assert_eq!(classify(vec![62, 65, 65, 65, 62]), '0');
        assert_eq!(classify(vec![1, 1, 1, 1, 1, 1]), UNRECOGNIZED);
    }
}
