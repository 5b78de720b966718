//! Foundation types and constants.
//!
//! Rounding helpers, the coverage type shared by the resolver and the
//! compositor, the filling rule, and the point type used for gradient
//! geometry.

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round a double to the nearest integer (round half away from zero).
#[inline]
pub fn iround(v: f64) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Round a double to the nearest unsigned integer (round half up).
#[inline]
pub fn uround(v: f64) -> u32 {
    (v + 0.5) as u32
}

/// Round a double to the nearest 64-bit integer, saturating at the type
/// bounds. Used for fixed-point accumulators that may sit far outside the
/// gradient span.
#[inline]
pub fn lround(v: f64) -> i64 {
    if v < 0.0 {
        (v - 0.5) as i64
    } else {
        (v + 0.5) as i64
    }
}

/// Compare two doubles within an absolute epsilon.
#[inline]
pub fn is_equal_eps(v1: f64, v2: f64, epsilon: f64) -> bool {
    (v1 - v2).abs() <= epsilon
}

// ============================================================================
// Cover (anti-aliasing) constants
// ============================================================================

/// The type used for anti-aliasing coverage values.
pub type CoverType = u8;

pub const COVER_SHIFT: u32 = 8;
pub const COVER_SIZE: u32 = 1 << COVER_SHIFT;
pub const COVER_MASK: u32 = COVER_SIZE - 1;
pub const COVER_NONE: CoverType = 0;
pub const COVER_FULL: CoverType = COVER_MASK as CoverType;

// ============================================================================
// Filling rule
// ============================================================================

/// Filling rule for polygon coverage resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillingRule {
    /// Any non-zero winding count is inside.
    #[default]
    NonZero,
    /// Odd crossing parity is inside.
    EvenOdd,
}

// ============================================================================
// PointD
// ============================================================================

/// A point with `f64` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointD {
    pub x: f64,
    pub y: f64,
}

impl PointD {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for PointD {
    fn from(p: (f64, f64)) -> Self {
        Self::new(p.0, p.1)
    }
}

// ============================================================================
// Tests
// ============================================================================
