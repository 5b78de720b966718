//! Gamma functions and per-channel lookup tables.
//!
//! The gamma compositing pipeline maps each blended colour channel through
//! its own 256-entry table. Tables are built from any `GammaFunction` or
//! supplied directly by the caller.

use crate::basics::uround;

// ============================================================================
// Gamma function trait
// ============================================================================

/// A transfer curve over normalised channel values in [0, 1].
pub trait GammaFunction {
    fn call(&self, x: f64) -> f64;
}

/// No gamma correction: returns input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaNone;

impl GammaFunction for GammaNone {
    #[inline]
    fn call(&self, x: f64) -> f64 {
        x
    }
}

/// Power-law gamma correction: `x^gamma`.
#[derive(Debug, Clone, Copy)]
pub struct GammaPower {
    gamma: f64,
}

impl GammaPower {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Default for GammaPower {
    fn default() -> Self {
        Self { gamma: 1.0 }
    }
}

impl GammaFunction for GammaPower {
    #[inline]
    fn call(&self, x: f64) -> f64 {
        x.powf(self.gamma)
    }
}

/// sRGB encoding curve (linear light in, sRGB-encoded out).
#[derive(Debug, Clone, Copy, Default)]
pub struct GammaSrgb;

impl GammaFunction for GammaSrgb {
    #[inline]
    fn call(&self, x: f64) -> f64 {
        linear_to_srgb(x)
    }
}

/// Encode a linear value (0..1) as sRGB.
#[inline]
pub fn linear_to_srgb(x: f64) -> f64 {
    if x <= 0.0031308 {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

// ============================================================================
// Per-channel tables
// ============================================================================

pub const GAMMA_TABLE_SIZE: usize = 256;

/// One 256-entry u8 table per colour channel.
///
/// Alpha is never gamma corrected, so there is no alpha table.
#[derive(Clone, PartialEq, Eq)]
pub struct GammaTables {
    red: [u8; GAMMA_TABLE_SIZE],
    green: [u8; GAMMA_TABLE_SIZE],
    blue: [u8; GAMMA_TABLE_SIZE],
}

impl GammaTables {
    /// Use three caller-supplied tables.
    pub fn new(
        red: [u8; GAMMA_TABLE_SIZE],
        green: [u8; GAMMA_TABLE_SIZE],
        blue: [u8; GAMMA_TABLE_SIZE],
    ) -> Self {
        Self { red, green, blue }
    }

    /// Sample `f` at every table index; all three channels share the curve.
    pub fn from_function<G: GammaFunction>(f: &G) -> Self {
        let mask = (GAMMA_TABLE_SIZE - 1) as f64;
        let mut table = [0u8; GAMMA_TABLE_SIZE];
        for (i, entry) in table.iter_mut().enumerate() {
            let v = f.call(i as f64 / mask).clamp(0.0, 1.0);
            *entry = uround(v * mask) as u8;
        }
        Self::new(table, table, table)
    }

    /// Power-law tables, `x^gamma` on every channel.
    pub fn from_gamma(gamma: f64) -> Self {
        Self::from_function(&GammaPower::new(gamma))
    }

    /// sRGB encoding tables.
    pub fn srgb() -> Self {
        Self::from_function(&GammaSrgb)
    }

    /// Tables that map every value to itself.
    pub fn identity() -> Self {
        Self::from_function(&GammaNone)
    }

    #[inline]
    pub fn red(&self, v: u8) -> u8 {
        self.red[v as usize]
    }

    #[inline]
    pub fn green(&self, v: u8) -> u8 {
        self.green[v as usize]
    }

    #[inline]
    pub fn blue(&self, v: u8) -> u8 {
        self.blue[v as usize]
    }
}

impl Default for GammaTables {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::fmt::Debug for GammaTables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaTables")
            .field("red[128]", &self.red[128])
            .field("green[128]", &self.green[128])
            .field("blue[128]", &self.blue[128])
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn test_gamma_none() {
        let g = GammaNone;
        assert!((g.call(0.0) - 0.0).abs() < EPSILON);
        assert!((g.call(0.5) - 0.5).abs() < EPSILON);
        assert!((g.call(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_gamma_power_square() {
        let g = GammaPower::new(2.0);
        assert!((g.call(0.5) - 0.25).abs() < EPSILON);
        assert!((g.call(1.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_linear_to_srgb() {
        assert_eq!(linear_to_srgb(0.0), 0.0);
        assert!((linear_to_srgb(1.0) - 1.0).abs() < EPSILON);
        // Linear toe below the knee
        assert!((linear_to_srgb(0.002) - 0.002 * 12.92).abs() < EPSILON);
        let mid = linear_to_srgb(0.5);
        assert!((mid - 0.735_357).abs() < 1e-6, "mid={}", mid);
    }

    #[test]
    fn test_identity_tables() {
        let t = GammaTables::identity();
        for v in 0..=255u8 {
            assert_eq!(t.red(v), v);
            assert_eq!(t.green(v), v);
            assert_eq!(t.blue(v), v);
        }
        assert_eq!(GammaTables::from_gamma(1.0), t);
    }

    #[test]
    fn test_power_tables() {
        let t = GammaTables::from_gamma(2.0);
        assert_eq!(t.red(0), 0);
        assert_eq!(t.red(255), 255);
        let d = t.green(128);
        assert!(
            (d as i32 - 64).unsigned_abs() <= 1,
            "green(128) at gamma 2.0 should be ~64, got {}",
            d
        );
    }

    #[test]
    fn test_srgb_tables_brighten_midtones() {
        let t = GammaTables::srgb();
        assert_eq!(t.blue(0), 0);
        assert_eq!(t.blue(255), 255);
        assert!(t.blue(64) > 64);
    }

    #[test]
    fn test_independent_channels() {
        let mut r = [0u8; GAMMA_TABLE_SIZE];
        r[10] = 200;
        let t = GammaTables::new(r, [7; GAMMA_TABLE_SIZE], [9; GAMMA_TABLE_SIZE]);
        assert_eq!(t.red(10), 200);
        assert_eq!(t.green(10), 7);
        assert_eq!(t.blue(10), 9);
    }
}
