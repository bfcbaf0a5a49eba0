//! Calibration tables for the on-screen displays
//!
//! These values are tuned for one fixed visual style and are load-bearing.
//! Constants are organized by the component that consumes them.

/// Edge map constants
pub mod edge {
    /// Horizontal-gradient kernel, indexed `[dy][dx]`
    pub const SOBEL_X: [[i32; 3]; 3] = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];

    /// Vertical-gradient kernel (transpose-negation of `SOBEL_X`), indexed `[dy][dx]`
    pub const SOBEL_Y: [[i32; 3]; 3] = [[1, 2, 1], [0, 0, 0], [-1, -2, -1]];

    /// A pixel is an edge when its magnitude exceeds this fraction of the maximum
    pub const THRESHOLD_RATIO: f64 = 0.3;
}

/// Rectangle discovery constants
pub mod locator {
    /// Shortest edge run kept, and smallest accepted rectangle side
    pub const MIN_RECT_WIDTH: usize = 10;
    pub const MIN_RECT_HEIGHT: usize = 10;

    /// Minimum min/max ratio of the three corner distances
    pub const CORNER_BALANCE: f64 = 0.5;

    /// Rectangles starting past this fraction of the frame width are ignored
    pub const MAX_START_FRACTION: f64 = 0.5;
}

/// Seven-segment countdown constants
pub mod segment {
    /// Digit cells as `[x, y, width, height]` fractions of the display rectangle
    pub const CELLS: [[f64; 4]; 4] = [
        [0.385, 0.175, 0.095, 0.615],
        [0.48, 0.175, 0.098, 0.615],
        [0.698, 0.175, 0.101, 0.615],
        [0.799, 0.175, 0.098, 0.615],
    ];

    pub const SAMPLE_ROWS: usize = 5;
    pub const SAMPLE_COLS: usize = 3;

    /// Sample column `k` sits at `COL_START + COL_STEP * k` of the cell width
    pub const COL_START: f64 = 0.2;
    pub const COL_STEP: f64 = 0.3;

    /// Sample row `j` sits at `ROW_START + ROW_STEP * j` of the cell height
    pub const ROW_START: f64 = 0.12;
    pub const ROW_STEP: f64 = 0.19;

    /// Red channel at or above this is lit
    pub const LIT: u8 = 0x80;

    /// Segment masks for digits 0 through 9
    pub const DIGITS: [u8; 10] = [0x77, 0x24, 0x5d, 0x6d, 0x2e, 0x6b, 0x7b, 0x25, 0x7f, 0x6f];
}

/// Bitmap-font percentage constants
pub mod glyph {
    /// Columns per glyph
    pub const WIDTH: usize = 5;

    /// Glyph bitmaps, one `u32` per column; bit 0 is the bottom row
    pub const TEMPLATES: [[u32; WIDTH]; 11] = [
        [62, 65, 65, 65, 62],
        [0, 32, 127, 0, 0],
        [33, 67, 69, 73, 49],
        [34, 65, 73, 73, 54],
        [12, 20, 36, 127, 4],
        [114, 73, 73, 73, 70],
        [62, 73, 73, 73, 38],
        [64, 64, 67, 76, 112],
        [54, 73, 73, 73, 54],
        [50, 73, 73, 73, 62],
        [0, 0, 1, 0, 0],
    ];

    /// Character for each entry of `TEMPLATES`
    pub const CHARS: [char; 11] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '.'];

    pub const DECIMAL_POINT: char = '.';

    /// Marker for a glyph matching no template; also ends the reading
    pub const UNRECOGNIZED: char = '#';

    /// Best match is accepted only below this many mismatched bits
    pub const MAX_MISMATCH: u32 = 3;

    /// Sharpening kernel, indexed `[dy][dx]`
    pub const SHARPEN: [[i32; 3]; 3] = [[0, -1, 0], [-1, 5, -1], [0, -1, 0]];

    /// Sharpened luma at or above this is ink
    pub const INK: i32 = 255;

    /// Luma weights for red, green and blue
    pub const LUMA: [f64; 3] = [0.299, 0.587, 0.114];
}

/// Event marker constants
pub mod marker {
    /// Quantization levels per channel
    pub const COLOR_DEPTH: u32 = 5;

    /// Components covering more than this fraction of the frame are significant
    pub const MIN_AREA_RATIO: f64 = 0.01;
}
