//! Pixel buffers and rectangles.
//!
//! The analysis engine only ever borrows frame pixels through [`PixelBuffer`].
//! [`Frame`] is the owned counterpart used by hosts that load or capture
//! frames and hand them across threads.

#[cfg(test)]
pub mod mock;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Axis-aligned integer rectangle in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from inclusive corner coordinates
    pub fn from_corners(left: usize, top: usize, right: usize, bottom: usize) -> Self {
        Self::new(left, top, right + 1 - left, bottom + 1 - top)
    }

    /// Exclusive right edge
    pub fn right(&self) -> usize {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> usize {
        self.y + self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `other` lies entirely inside this rectangle (edges may touch)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Whether this rectangle is non-degenerate and fits in a `width`x`height` frame
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        !self.is_empty() && self.right() <= width && self.bottom() <= height
    }
}

/// Borrowed view of an RGBA8 row-major frame
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw RGBA bytes, checking that the length matches the dimensions
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        let expected = width * height * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(Error::InvalidPixelBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Full-frame rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        rect.fits_within(self.width, self.height)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        (x + y * self.width) * BYTES_PER_PIXEL
    }

    /// Red channel at `(x, y)`
    #[inline]
    pub fn red(&self, x: usize, y: usize) -> u8 {
        self.data[self.offset(x, y)]
    }

    /// Red, green and blue channels at `(x, y)`
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let pos = self.offset(x, y);
        [self.data[pos], self.data[pos + 1], self.data[pos + 2]]
    }
}

/// Owned RGBA8 frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Frame {
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        PixelBuffer::new(&data, width, height)?;
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Black frame of the given size
    pub fn blank(width: usize, height: usize) -> Self {
        let mut data = vec![0u8; width * height * BYTES_PER_PIXEL];
        for alpha in data.iter_mut().skip(3).step_by(BYTES_PER_PIXEL) {
            *alpha = 0xFF;
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Load an image file and convert it to RGBA8
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(image.into_raw(), width as usize, height as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer {
            data: &self.data,
            width: self.width,
            height: self.height,
        }
    }

    /// Overwrite the RGB channels of one pixel
    pub fn set_rgb(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let pos = (x + y * self.width) * BYTES_PER_PIXEL;
        self.data[pos..pos + 3].copy_from_slice(&rgb);
    }
}
