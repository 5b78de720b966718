//! Color types and packed pixel conversion.
//!
//! `Rgba8` is the straight (non-premultiplied) 8-bit color used for gradient
//! stops. Framebuffer pixels and ramp entries are packed 32-bit words laid
//! out as `0xAARRGGBB`.

// ============================================================================
// Packed ARGB layout
// ============================================================================

pub const ALPHA_SHIFT: u32 = 24;
pub const RED_SHIFT: u32 = 16;
pub const GREEN_SHIFT: u32 = 8;
pub const BLUE_SHIFT: u32 = 0;

/// Red and blue lanes of a packed pixel, processed together.
pub const RED_BLUE_MASK: u32 = 0x00FF_00FF;
/// Green lane of a packed pixel.
pub const GREEN_MASK: u32 = 0x0000_FF00;
/// Alpha lane of a packed pixel.
pub const ALPHA_MASK: u32 = 0xFF00_0000;

/// Extract the alpha channel of a packed pixel.
#[inline]
pub fn argb_alpha(p: u32) -> u8 {
    (p >> ALPHA_SHIFT) as u8
}

/// Extract the red channel of a packed pixel.
#[inline]
pub fn argb_red(p: u32) -> u8 {
    (p >> RED_SHIFT) as u8
}

/// Extract the green channel of a packed pixel.
#[inline]
pub fn argb_green(p: u32) -> u8 {
    (p >> GREEN_SHIFT) as u8
}

/// Extract the blue channel of a packed pixel.
#[inline]
pub fn argb_blue(p: u32) -> u8 {
    (p >> BLUE_SHIFT) as u8
}

/// Pack four channels into a `0xAARRGGBB` word.
#[inline]
pub fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << ALPHA_SHIFT
        | (r as u32) << RED_SHIFT
        | (g as u32) << GREEN_SHIFT
        | (b as u32) << BLUE_SHIFT
}

// ============================================================================
// Rgba8
// ============================================================================

/// RGBA color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BASE_SHIFT: u32 = 8;
    pub const BASE_SCALE: u32 = 1 << Self::BASE_SHIFT;
    pub const BASE_MASK: u32 = Self::BASE_SCALE - 1;
    pub const BASE_MSB: u32 = 1 << (Self::BASE_SHIFT - 1);

    pub fn new(r: u32, g: u32, b: u32, a: u32) -> Self {
        Self {
            r: r as u8,
            g: g as u8,
            b: b as u8,
            a: a as u8,
        }
    }

    pub fn new_opaque(r: u32, g: u32, b: u32) -> Self {
        Self::new(r, g, b, Self::BASE_MASK)
    }

    /// Same color with the alpha channel replaced.
    pub fn with_opacity(c: &Rgba8, a: u32) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: a as u8,
        }
    }

    /// Fixed-point multiply, exact over u8.
    /// `(a * b + 128) >> 8`, with rounding correction.
    #[inline]
    pub fn multiply(a: u8, b: u8) -> u8 {
        let t: u32 = a as u32 * b as u32 + Self::BASE_MSB;
        (((t >> Self::BASE_SHIFT) + t) >> Self::BASE_SHIFT) as u8
    }

    /// Pack into a `0xAARRGGBB` word.
    #[inline]
    pub fn to_argb(&self) -> u32 {
        pack_argb(self.a, self.r, self.g, self.b)
    }

    /// Unpack from a `0xAARRGGBB` word.
    #[inline]
    pub fn from_argb(p: u32) -> Self {
        Self {
            r: argb_red(p),
            g: argb_green(p),
            b: argb_blue(p),
            a: argb_alpha(p),
        }
    }
}

impl From<u32> for Rgba8 {
    fn from(p: u32) -> Self {
        Self::from_argb(p)
    }
}

impl From<Rgba8> for u32 {
    fn from(c: Rgba8) -> Self {
        c.to_argb()
    }
}

// ============================================================================
// Tests
// ============================================================================
