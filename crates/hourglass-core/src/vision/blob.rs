//! Event marker detection.
//!
//! Marker pixels are pure red after quantizing every channel to a handful of
//! levels. They are grouped into 8-connected components with an explicit
//! work stack; components covering enough of the frame are reported.

use serde::{Deserialize, Serialize};

use crate::frame::{PixelBuffer, Rect};

use super::layout::marker::{COLOR_DEPTH, MIN_AREA_RATIO};

const NEIGHBORS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Quantization level index of one channel value
#[inline]
fn level(value: u8) -> u32 {
    value as u32 * COLOR_DEPTH / 256
}

/// Whether a pixel quantizes to full red with no green or blue
#[inline]
pub fn is_marker_pixel([r, g, b]: [u8; 3]) -> bool {
    level(r) == COLOR_DEPTH - 1 && level(g) == 0 && level(b) == 0
}

/// Significant marker components of one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerScan {
    /// Sum of the area ratios of all significant components
    pub signal: f64,
    /// Bounding rectangle of each significant component, in scan order
    pub rects: Vec<Rect>,
}

/// Find significant marker components anywhere in the frame
pub fn detect_markers(buffer: &PixelBuffer) -> MarkerScan {
    let (width, height) = (buffer.width(), buffer.height());
    let total = (width * height) as f64;
    let mut scan = MarkerScan::default();
    if width == 0 || height == 0 {
        return scan;
    }

    let mut visited = vec![false; width * height];
    let mut stack = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if visited[x + y * width] {
                continue;
            }
            visited[x + y * width] = true;
            if !is_marker_pixel(buffer.rgb(x, y)) {
                continue;
            }

            let (mut left, mut top, mut right, mut bottom) = (x, y, x, y);
            let mut count = 0usize;
            stack.push((x, y));
            while let Some((px, py)) = stack.pop() {
                count += 1;
                left = left.min(px);
                right = right.max(px);
                top = top.min(py);
                bottom = bottom.max(py);

                for (dx, dy) in NEIGHBORS {
                    let (Some(nx), Some(ny)) = (px.checked_add_signed(dx), py.checked_add_signed(dy))
                    else {
                        continue;
                    };
                    if nx >= width || ny >= height || visited[nx + ny * width] {
                        continue;
                    }
                    if is_marker_pixel(buffer.rgb(nx, ny)) {
                        visited[nx + ny * width] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            let ratio = count as f64 / total;
            if ratio > MIN_AREA_RATIO {
                scan.signal += ratio;
                scan.rects.push(Rect::from_corners(left, top, right, bottom));
            }
        }
    }

    scan
}
