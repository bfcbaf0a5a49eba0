//! Binary edge map built from Sobel gradient magnitude.

use crate::frame::{PixelBuffer, Rect};

use super::layout::edge::{SOBEL_X, SOBEL_Y, THRESHOLD_RATIO};

/// Edge flags for every pixel of a rectangle, in rectangle-local coordinates
#[derive(Debug, Clone)]
pub struct EdgeMap {
    origin: Rect,
    edges: Vec<bool>,
}

impl EdgeMap {
    /// Build the edge map of `rect`.
    ///
    /// The red channel stands in for luma. Border pixels of the rectangle are
    /// never edges; a rectangle that does not fit the buffer yields no edges.
    pub fn build(buffer: &PixelBuffer, rect: Rect) -> Self {
        let mut edges = vec![false; rect.area()];
        if !buffer.contains(&rect) || rect.width < 3 || rect.height < 3 {
            return Self {
                origin: rect,
                edges,
            };
        }

        let mut magnitude = vec![0.0f64; rect.area()];
        let mut max = 0.0f64;
        for y in 1..rect.height - 1 {
            for x in 1..rect.width - 1 {
                let mut gx = 0i32;
                let mut gy = 0i32;
                for (dy, (row_x, row_y)) in SOBEL_X.iter().zip(SOBEL_Y.iter()).enumerate() {
                    for dx in 0..3 {
                        let r = buffer.red(rect.x + x + dx - 1, rect.y + y + dy - 1) as i32;
                        gx += r * row_x[dx];
                        gy += r * row_y[dx];
                    }
                }
                let value = ((gx * gx + gy * gy) as f64).sqrt();
                magnitude[x + y * rect.width] = value;
                max = max.max(value);
            }
        }

        if max > 0.0 {
            for (edge, value) in edges.iter_mut().zip(&magnitude) {
                *edge = value / max > THRESHOLD_RATIO;
            }
        }

        Self {
            origin: rect,
            edges,
        }
    }

    /// Rectangle this map covers, in frame coordinates
    pub fn origin(&self) -> Rect {
        self.origin
    }

    pub fn width(&self) -> usize {
        self.origin.width
    }

    pub fn height(&self) -> usize {
        self.origin.height
    }

    /// Edge flag at local `(x, y)`
    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        self.edges[x + y * self.origin.width]
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }
}
