//! Linear gradient geometry and the index projector.
//!
//! A pixel `(x, y)` is projected onto the gradient axis to get the gradient
//! parameter `t = ((p - start) · d) / |d|²`, where `d = end - start`. The
//! projection is affine in `x` and `y`, so it is carried as a 64-bit
//! fixed-point accumulator stepped by a constant per-pixel and per-row
//! increment. The same projector serves every orientation, with or without
//! an inverse user transform.

use crate::basics::{iround, lround, PointD};
use crate::color::Rgba8;
use crate::gradient_lut::{ColorStop, COLOR_RAMP_MASK, COLOR_RAMP_SHIFT};
use crate::trans_affine::TransAffine;

// ============================================================================
// Fixed-point constants
// ============================================================================

/// Fraction bits of a colour index below one ramp entry.
pub const COLOR_INDEX_SHIFT: u32 = 16;
/// Colour-index bits covering the whole ramp (`t` in [0, 1]).
pub const COLOR_INDEX_INCLUDE_INCREMENT_SHIFT: u32 = COLOR_RAMP_SHIFT + COLOR_INDEX_SHIFT;
/// `t = 1.0` in colour-index units.
pub const COLOR_INDEX_INCLUDE_INCREMENT_SCALE: i64 = 1 << COLOR_INDEX_INCLUDE_INCREMENT_SHIFT;
pub const COLOR_INDEX_INCLUDE_INCREMENT_MASK: i64 = COLOR_INDEX_INCLUDE_INCREMENT_SCALE - 1;
/// One reflect period (forward then mirrored) in colour-index units.
pub const COLOR_INDEX_INCLUDE_INCREMENT_DOUBLE_MASK: i64 =
    (COLOR_INDEX_INCLUDE_INCREMENT_SCALE << 1) - 1;

/// Extra fraction bits carried by accumulators and increments. They keep
/// per-pixel stepping error below one colour-index unit and are rounded off
/// before spread addressing.
pub const INCREMENT_COLOR_INDEX_SHIFT: u32 = 16;
const INCREMENT_ROUND: i64 = 1 << (INCREMENT_COLOR_INDEX_SHIFT - 1);

/// Total fraction bits of an accumulator per unit of `t` (40).
pub const ACCUMULATOR_SHIFT: u32 = COLOR_INDEX_INCLUDE_INCREMENT_SHIFT + INCREMENT_COLOR_INDEX_SHIFT;
const ACCUMULATOR_SCALE: f64 = (1u64 << ACCUMULATOR_SHIFT) as f64;

/// Resolution of the gradient length for the degeneracy test.
pub const DISTANCE_SHIFT: u32 = 4;
pub const DISTANCE_SCALE: i32 = 1 << DISTANCE_SHIFT;

// ============================================================================
// Spread and orientation
// ============================================================================

/// How colours are chosen outside the [0, 1] range of the gradient axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadMethod {
    /// Clamp to the end colours.
    #[default]
    Pad,
    /// Tile the ramp.
    Repeat,
    /// Alternate forward and mirrored copies of the ramp.
    Reflect,
}

/// Direction of the gradient axis in gradient space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientOrientation {
    Horizontal,
    Vertical,
    /// `dx` and `dy` have the same sign.
    ForwardDiagonal,
    /// `dx` and `dy` have opposite signs.
    BackwardDiagonal,
}

impl GradientOrientation {
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        if dy == 0.0 {
            GradientOrientation::Horizontal
        } else if dx == 0.0 {
            GradientOrientation::Vertical
        } else if (dx > 0.0) == (dy > 0.0) {
            GradientOrientation::ForwardDiagonal
        } else {
            GradientOrientation::BackwardDiagonal
        }
    }
}

// ============================================================================
// LinearGradient
// ============================================================================

/// A linear gradient: axis from `start` to `end`, spread method and stops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearGradient {
    pub start: PointD,
    pub end: PointD,
    pub spread: SpreadMethod,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: PointD, end: PointD, spread: SpreadMethod) -> Self {
        Self {
            start,
            end,
            spread,
            stops: Vec::new(),
        }
    }

    /// Append a stop (builder style).
    pub fn with_stop(mut self, offset: f64, color: Rgba8) -> Self {
        self.stops.push(ColorStop::new(offset, color));
        self
    }

    pub fn add_stop(&mut self, offset: f64, color: Rgba8) {
        self.stops.push(ColorStop::new(offset, color));
    }

    #[inline]
    pub fn delta(&self) -> (f64, f64) {
        (self.end.x - self.start.x, self.end.y - self.start.y)
    }

    pub fn length(&self) -> f64 {
        let (dx, dy) = self.delta();
        (dx * dx + dy * dy).sqrt()
    }

    pub fn orientation(&self) -> GradientOrientation {
        let (dx, dy) = self.delta();
        GradientOrientation::from_delta(dx, dy)
    }

    /// True when the axis is shorter than one distance unit (1/16 pixel),
    /// or not a finite length at all.
    pub fn is_degenerate(&self) -> bool {
        iround(self.length() * DISTANCE_SCALE as f64) == 0
    }
}

// ============================================================================
// IndexProjector
// ============================================================================

/// Maps device pixels to ramp entries.
///
/// Accumulators hold `t` with `ACCUMULATOR_SHIFT` fraction bits. The value
/// at `(x, y)` is `origin + y * row_increment + x * pixel_increment`, so a
/// row's start depends only on its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexProjector {
    origin: i64,
    pixel_increment: i64,
    row_increment: i64,
    spread: SpreadMethod,
}

impl IndexProjector {
    /// Projector sampling gradient space directly in device coordinates.
    ///
    /// Returns `None` for a degenerate gradient.
    pub fn new(gradient: &LinearGradient) -> Option<Self> {
        Self::from_basis(
            gradient,
            PointD::new(0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
        )
    }

    /// Projector for device pixels mapped into gradient space by `inverse`.
    ///
    /// The device origin and the unit steps along each device axis are
    /// transformed once; everything after that is integer stepping.
    pub fn with_transform(gradient: &LinearGradient, inverse: &TransAffine) -> Option<Self> {
        let o = inverse.transform_point(PointD::new(0.0, 0.0));
        let px = inverse.transform_point(PointD::new(1.0, 0.0));
        let py = inverse.transform_point(PointD::new(0.0, 1.0));
        Self::from_basis(
            gradient,
            o,
            (px.x - o.x, px.y - o.y),
            (py.x - o.x, py.y - o.y),
        )
    }

    fn from_basis(
        gradient: &LinearGradient,
        origin: PointD,
        ex: (f64, f64),
        ey: (f64, f64),
    ) -> Option<Self> {
        if gradient.is_degenerate() {
            return None;
        }
        let (dx, dy) = gradient.delta();
        let len2 = dx * dx + dy * dy;

        let a = (ex.0 * dx + ex.1 * dy) / len2;
        let b = (ey.0 * dx + ey.1 * dy) / len2;
        let c = ((origin.x - gradient.start.x) * dx + (origin.y - gradient.start.y) * dy) / len2;

        Some(Self {
            origin: lround(c * ACCUMULATOR_SCALE),
            pixel_increment: lround(a * ACCUMULATOR_SCALE),
            row_increment: lround(b * ACCUMULATOR_SCALE),
            spread: gradient.spread,
        })
    }

    #[inline]
    pub fn pixel_increment(&self) -> i64 {
        self.pixel_increment
    }

    #[inline]
    pub fn row_increment(&self) -> i64 {
        self.row_increment
    }

    #[inline]
    pub fn spread(&self) -> SpreadMethod {
        self.spread
    }

    /// Every pixel of a row samples the same index.
    #[inline]
    pub fn is_row_constant(&self) -> bool {
        self.pixel_increment == 0
    }

    /// Accumulator at column 0 of row `y`.
    #[inline]
    pub fn row_origin(&self, y: i32) -> i64 {
        self.origin
            .saturating_add(self.row_increment.saturating_mul(y as i64))
    }

    /// Accumulator at column `x` of a row whose origin is `row_origin`.
    #[inline]
    pub fn row_start(&self, row_origin: i64, x: i32) -> i64 {
        row_origin.saturating_add(self.pixel_increment.saturating_mul(x as i64))
    }

    /// Accumulator at `(x, y)`.
    #[inline]
    pub fn accumulator_at(&self, x: i32, y: i32) -> i64 {
        self.row_start(self.row_origin(y), x)
    }

    /// Spread-addressed colour index in `[0, COLOR_INDEX_INCLUDE_INCREMENT_SCALE]`.
    #[inline]
    pub fn color_index(&self, acc: i64) -> i64 {
        let ci = acc.saturating_add(INCREMENT_ROUND) >> INCREMENT_COLOR_INDEX_SHIFT;
        match self.spread {
            SpreadMethod::Pad => ci.clamp(0, COLOR_INDEX_INCLUDE_INCREMENT_SCALE),
            SpreadMethod::Repeat => ci & COLOR_INDEX_INCLUDE_INCREMENT_MASK,
            SpreadMethod::Reflect => {
                let ci = ci & COLOR_INDEX_INCLUDE_INCREMENT_DOUBLE_MASK;
                if ci >= COLOR_INDEX_INCLUDE_INCREMENT_SCALE {
                    (COLOR_INDEX_INCLUDE_INCREMENT_SCALE << 1) - ci
                } else {
                    ci
                }
            }
        }
    }

    /// Ramp entry for an accumulator value.
    #[inline]
    pub fn entry(&self, acc: i64) -> usize {
        ((self.color_index(acc) >> COLOR_INDEX_SHIFT) as usize).min(COLOR_RAMP_MASK)
    }

    /// Ramp entry sampled at `(x, y)`.
    pub fn entry_at(&self, x: i32, y: i32) -> usize {
        self.entry(self.accumulator_at(x, y))
    }
}

// ============================================================================
// Tests
// ============================================================================
