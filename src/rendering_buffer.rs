//! Rendering buffer: row-oriented access to packed ARGB pixels.
//!
//! [`PixelBuffer`] borrows a caller-owned `&mut [u32]` and addresses a
//! rectangular region inside it. Pixel `(x, y)` lives at
//! `offset + y * stride + x`. The region is validated once on construction,
//! so row access afterwards never goes out of bounds of the slice.

/// Mutable view of a packed-pixel region.
///
/// The exclusive borrow makes a fill the only writer for its duration.
pub struct PixelBuffer<'a> {
    pixels: &'a mut [u32],
    offset: usize,
    stride: usize,
    width: u32,
    height: u32,
}

impl<'a> PixelBuffer<'a> {
    /// Attach to a region of `pixels`.
    ///
    /// Returns `None` when `stride < width` or when the last row would run
    /// past the end of the slice.
    pub fn new(
        pixels: &'a mut [u32],
        offset: usize,
        stride: usize,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        if stride < width as usize {
            return None;
        }
        if height > 0 {
            let last_row = (height as usize - 1).checked_mul(stride)?;
            let end = offset.checked_add(last_row)?.checked_add(width as usize)?;
            if end > pixels.len() {
                return None;
            }
        }
        Some(Self {
            pixels,
            offset,
            stride,
            width,
            height,
        })
    }

    /// Attach to a tightly packed `width * height` slice.
    pub fn from_slice(pixels: &'a mut [u32], width: u32, height: u32) -> Option<Self> {
        Self::new(pixels, 0, width as usize, width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Row `y`, exactly `width` pixels long, or `None` outside the region.
    #[inline]
    pub fn row(&self, y: i32) -> Option<&[u32]> {
        let start = self.row_start(y)?;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// Mutable row `y`, exactly `width` pixels long, or `None` outside the
    /// region.
    #[inline]
    pub fn row_mut(&mut self, y: i32) -> Option<&mut [u32]> {
        let start = self.row_start(y)?;
        let width = self.width as usize;
        Some(&mut self.pixels[start..start + width])
    }

    /// Read one pixel.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || x as u32 >= self.width {
            return None;
        }
        self.row(y).map(|row| row[x as usize])
    }

    /// Set every pixel of the region to `v`.
    pub fn clear(&mut self, v: u32) {
        for y in 0..self.height as i32 {
            if let Some(row) = self.row_mut(y) {
                row.fill(v);
            }
        }
    }

    #[inline]
    fn row_start(&self, y: i32) -> Option<usize> {
        if y < 0 || y as u32 >= self.height {
            return None;
        }
        Some(self.offset + y as usize * self.stride)
    }
}

// ============================================================================
// Tests
// ============================================================================
