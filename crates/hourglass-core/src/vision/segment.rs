//! Seven-segment countdown reader.
//!
//! The countdown shows `MM:SS` as four seven-segment digits at fixed
//! fractional positions of its display rectangle. Each digit cell is probed
//! on a 5x3 grid: odd grid positions are the seven segments, two of the even
//! ones are the "holes" inside the 8 that must stay dark.

use crate::frame::{PixelBuffer, Rect};

use super::layout::segment::{
    CELLS, COL_START, COL_STEP, DIGITS, LIT, ROW_START, ROW_STEP, SAMPLE_COLS, SAMPLE_ROWS,
};

/// Inclusive pixel bounds of one digit cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cell {
    pub start_x: usize,
    pub end_x: usize,
    pub start_y: usize,
    pub end_y: usize,
}

impl Cell {
    /// Pixel probed for grid position `(row, col)`
    pub fn sample(&self, row: usize, col: usize) -> (usize, usize) {
        let w = (self.end_x - self.start_x + 1) as f64;
        let h = (self.end_y - self.start_y + 1) as f64;
        let x = self.start_x + (w * (COL_START + COL_STEP * col as f64)) as usize;
        let y = self.start_y + (h * (ROW_START + ROW_STEP * row as f64)) as usize;
        (x, y)
    }

    fn is_border(&self, x: usize, y: usize) -> bool {
        x == self.start_x || x == self.end_x || y == self.start_y || y == self.end_y
    }
}

/// Role of a probe position in the sample grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    /// Segment contributing the given mask bit
    Segment(u8),
    /// Position that must never be lit
    Hole,
    Ignored,
}

pub(crate) fn probe(row: usize, col: usize) -> Probe {
    let n = row * SAMPLE_COLS + col;
    if n % 2 == 1 {
        Probe::Segment(1 << (n / 2))
    } else if n % 3 == 1 {
        Probe::Hole
    } else {
        Probe::Ignored
    }
}

/// Digit cells of a countdown display occupying `rect`
pub(crate) fn digit_cells(rect: &Rect) -> [Cell; 4] {
    CELLS.map(|[fx, fy, fw, fh]| {
        let w = rect.width as f64;
        let h = rect.height as f64;
        Cell {
            start_x: (rect.x as f64 + w * fx) as usize,
            end_x: (rect.x as f64 + w * (fx + fw)) as usize,
            start_y: (rect.y as f64 + h * fy) as usize,
            end_y: (rect.y as f64 + h * (fy + fh)) as usize,
        }
    })
}

/// Digit shown by a segment mask
pub fn decode_mask(mask: u8, leading: bool) -> Option<u32> {
    if let Some(digit) = DIGITS.iter().position(|&m| m == mask) {
        return Some(digit as u32);
    }
    // A blanked leading zero
    if leading && mask == 0 {
        return Some(0);
    }
    None
}

fn read_cell(buffer: &PixelBuffer, cell: &Cell) -> Option<u8> {
    for y in cell.start_y..=cell.end_y {
        for x in cell.start_x..=cell.end_x {
            if cell.is_border(x, y) && buffer.red(x, y) >= LIT {
                return None;
            }
        }
    }

    let mut mask = 0u8;
    for row in 0..SAMPLE_ROWS {
        for col in 0..SAMPLE_COLS {
            let (x, y) = cell.sample(row, col);
            let lit = buffer.red(x, y) >= LIT;
            match probe(row, col) {
                Probe::Segment(bit) if lit => mask |= bit,
                Probe::Hole if lit => return None,
                _ => {}
            }
        }
    }
    Some(mask)
}

/// Read the countdown shown in `rect`, in seconds.
///
/// Returns `None` when the rectangle does not fit the buffer, a cell border
/// is lit, a hole is lit, or any cell shows an unknown mask.
pub fn read_countdown(buffer: &PixelBuffer, rect: &Rect) -> Option<u32> {
    if !buffer.contains(rect) {
        return None;
    }

    let mut digits = [0u32; 4];
    for (i, cell) in digit_cells(rect).iter().enumerate() {
        let mask = read_cell(buffer, cell)?;
        digits[i] = decode_mask(mask, i == 0)?;
    }
    Some((digits[0] * 10 + digits[1]) * 60 + digits[2] * 10 + digits[3])
}
