//! Pixel-level recognition of the on-screen displays.
//!
//! - `edge`: Sobel edge map over a frame rectangle
//! - `locator`: display rectangle discovery from an edge map
//! - `segment`: seven-segment countdown reader
//! - `glyph`: bitmap-font percentage reader
//! - `blob`: color-keyed event marker detection
//!
//! Every function here is pure: it borrows the pixel buffer for the duration
//! of the call and keeps no state between calls.

pub mod blob;
pub mod edge;
pub mod glyph;
pub mod layout;
pub mod locator;
pub mod segment;

pub use blob::{MarkerScan, detect_markers, is_marker_pixel};
pub use edge::EdgeMap;
pub use glyph::{parse_reading, read_glyphs, read_percentage};
pub use locator::find_rectangles;
pub use segment::{decode_mask, read_countdown};
