//! Packed ARGB32 compositing.
//!
//! Blends a sampled gradient colour into a `0xAARRGGBB` destination word.
//! Two compositors share the same alpha arithmetic: [`LinearBlend`] does the
//! "over" blend directly in packed lanes, [`GammaBlend`] maps each blended
//! colour channel through per-channel gamma tables.
//!
//! Alpha works in a lifted 0–256 domain, `v⁺ = v + (v >> 7)`, so an opaque
//! sample at full coverage has effective alpha exactly 256 and the blend
//! reduces to a plain copy. This keeps the overwrite fast path bit-identical
//! to the general blend.

use std::sync::OnceLock;

use crate::basics::CoverType;
use crate::color::{
    argb_alpha, argb_blue, argb_green, argb_red, pack_argb, ALPHA_SHIFT, GREEN_MASK,
    RED_BLUE_MASK,
};
use crate::gamma::GammaTables;

/// Effective alpha of a fully opaque sample at full coverage.
pub const ALPHA_FULL: u32 = 256;

/// Lift an 8-bit value into the 0–256 domain (255 becomes 256).
#[inline]
pub fn lift(v: u8) -> u32 {
    v as u32 + (v as u32 >> 7)
}

/// Sample alpha combined with coverage, in 0..=256.
#[inline]
pub fn effective_alpha(alpha: u8, cover: CoverType) -> u32 {
    (lift(alpha) * lift(cover)) >> 8
}

// ============================================================================
// AlphaCache
// ============================================================================

/// Precomputed result alpha of the "over" operator.
///
/// `get(da, ea) ≈ da + ea - da * ea / 255`, for destination alpha `da` and
/// effective alpha `ea` in 0..=255.
pub struct AlphaCache {
    table: Box<[u8]>,
}

static ALPHA_CACHE: OnceLock<AlphaCache> = OnceLock::new();

impl AlphaCache {
    fn build() -> Self {
        let mut table = vec![0u8; 256 * 256];
        for da in 0..256usize {
            for ea in 0..256usize {
                let prod = (da * ea + 127) / 255;
                table[da << 8 | ea] = (da + ea - prod).min(255) as u8;
            }
        }
        Self {
            table: table.into_boxed_slice(),
        }
    }

    /// The process-wide table, built on first use.
    pub fn global() -> &'static AlphaCache {
        ALPHA_CACHE.get_or_init(Self::build)
    }

    #[inline]
    pub fn get(&self, da: u8, ea: u8) -> u8 {
        self.table[(da as usize) << 8 | ea as usize]
    }

    /// Result alpha for a lifted effective alpha (256 reads as 255).
    #[inline]
    pub fn over(&self, da: u8, ea: u32) -> u8 {
        self.get(da, ea.min(255) as u8)
    }
}

// ============================================================================
// PixelCompositor
// ============================================================================

/// Writes sampled colours into destination pixels.
pub trait PixelCompositor {
    /// Destination value for a sample whose effective alpha is 256.
    fn opaque(&self, src: u32) -> u32;

    /// Blend `src` over `dst` with effective alpha `ea` in 1..=255.
    fn blend(&self, src: u32, dst: u32, ea: u32) -> u32;

    /// Composite one sample at `cover` into `dst`.
    #[inline]
    fn blend_pixel(&self, dst: &mut u32, src: u32, cover: CoverType) {
        let ea = effective_alpha(argb_alpha(src), cover);
        if ea >= ALPHA_FULL {
            *dst = self.opaque(src);
        } else if ea != 0 {
            *dst = self.blend(src, *dst, ea);
        }
    }

    /// Overwrite a run without reading it.
    #[inline]
    fn copy_hline(&self, dst: &mut [u32], src: u32) {
        dst.fill(self.opaque(src));
    }

    /// Composite one sample over a run at uniform `cover`.
    fn blend_hline(&self, dst: &mut [u32], src: u32, cover: CoverType) {
        let ea = effective_alpha(argb_alpha(src), cover);
        if ea >= ALPHA_FULL {
            self.copy_hline(dst, src);
        } else if ea != 0 {
            for p in dst.iter_mut() {
                *p = self.blend(src, *p, ea);
            }
        }
    }
}

// ============================================================================
// LinearBlend
// ============================================================================

/// Linear "over" blending in packed lanes.
#[derive(Clone, Copy)]
pub struct LinearBlend {
    alpha: &'static AlphaCache,
}

impl LinearBlend {
    pub fn new() -> Self {
        Self {
            alpha: AlphaCache::global(),
        }
    }
}

impl Default for LinearBlend {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelCompositor for LinearBlend {
    #[inline]
    fn opaque(&self, src: u32) -> u32 {
        src
    }

    #[inline]
    fn blend(&self, src: u32, dst: u32, ea: u32) -> u32 {
        let inv = ALPHA_FULL - ea;
        // Red and blue share one multiply; the lanes are 16 bits apart
        let rb = (((src & RED_BLUE_MASK) * ea + (dst & RED_BLUE_MASK) * inv) >> 8) & RED_BLUE_MASK;
        let g = (((src & GREEN_MASK) * ea + (dst & GREEN_MASK) * inv) >> 8) & GREEN_MASK;
        let a = self.alpha.over(argb_alpha(dst), ea) as u32;
        a << ALPHA_SHIFT | rb | g
    }
}

// ============================================================================
// GammaBlend
// ============================================================================

/// Per-channel blend followed by a gamma table lookup. Alpha is never gamma
/// corrected.
#[derive(Clone, Copy)]
pub struct GammaBlend<'g> {
    alpha: &'static AlphaCache,
    tables: &'g GammaTables,
}

impl<'g> GammaBlend<'g> {
    pub fn new(tables: &'g GammaTables) -> Self {
        Self {
            alpha: AlphaCache::global(),
            tables,
        }
    }

    #[inline]
    fn channel(s: u8, d: u8, ea: u32) -> u8 {
        ((s as u32 * ea + d as u32 * (ALPHA_FULL - ea)) >> 8) as u8
    }
}

impl PixelCompositor for GammaBlend<'_> {
    #[inline]
    fn opaque(&self, src: u32) -> u32 {
        pack_argb(
            argb_alpha(src),
            self.tables.red(argb_red(src)),
            self.tables.green(argb_green(src)),
            self.tables.blue(argb_blue(src)),
        )
    }

    #[inline]
    fn blend(&self, src: u32, dst: u32, ea: u32) -> u32 {
        let r = Self::channel(argb_red(src), argb_red(dst), ea);
        let g = Self::channel(argb_green(src), argb_green(dst), ea);
        let b = Self::channel(argb_blue(src), argb_blue(dst), ea);
        pack_argb(
            self.alpha.over(argb_alpha(dst), ea),
            self.tables.red(r),
            self.tables.green(g),
            self.tables.blue(b),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lift() {
        assert_eq!(lift(0), 0);
        assert_eq!(lift(127), 127);
        assert_eq!(lift(128), 129);
        assert_eq!(lift(255), 256);
        assert_eq!(effective_alpha(255, 255), 256);
        assert_eq!(effective_alpha(255, 0), 0);
        assert_eq!(effective_alpha(0, 255), 0);
        assert_eq!(effective_alpha(255, 128), 129);
    }

    #[test]
    fn test_alpha_cache_matches_formula() {
        let cache = AlphaCache::global();
        for da in 0..=255u32 {
            for ea in 0..=255u32 {
                let exact = da as f64 + ea as f64 - (da * ea) as f64 / 255.0;
                let got = cache.get(da as u8, ea as u8) as f64;
                assert!(
                    (got - exact).abs() <= 1.0,
                    "da={} ea={}: got {} expected {}",
                    da,
                    ea,
                    got,
                    exact
                );
            }
        }
        assert_eq!(cache.get(255, 255), 255);
        assert_eq!(cache.get(0, 0), 0);
        assert_eq!(cache.get(0, 200), 200);
        assert_eq!(cache.get(200, 0), 200);
    }

    #[test]
    fn test_linear_blend_endpoints() {
        let b = LinearBlend::new();
        let mut dst = 0xFF00_0000;
        b.blend_pixel(&mut dst, 0xFFFF_FFFF, 255);
        assert_eq!(dst, 0xFFFF_FFFF);

        let mut dst = 0x8012_3456;
        b.blend_pixel(&mut dst, 0xFFFF_FFFF, 0);
        assert_eq!(dst, 0x8012_3456);
    }

    #[test]
    fn test_linear_blend_half() {
        let b = LinearBlend::new();
        // White at half coverage over opaque black
        let mut dst = 0xFF00_0000;
        b.blend_pixel(&mut dst, 0xFFFF_FFFF, 128);
        let r = argb_red(dst);
        assert!((128..=129).contains(&r), "r={}", r);
        assert_eq!(argb_red(dst), argb_green(dst));
        assert_eq!(argb_red(dst), argb_blue(dst));
        assert_eq!(argb_alpha(dst), 255);
    }

    #[test]
    fn test_lanes_do_not_bleed() {
        let b = LinearBlend::new();
        for ea in [1u32, 77, 128, 200, 255] {
            let out = b.blend(0x00FF_00FF, 0x0000_FF00, ea);
            let inv = ALPHA_FULL - ea;
            assert_eq!(argb_red(out) as u32, (255 * ea) >> 8);
            assert_eq!(argb_blue(out) as u32, (255 * ea) >> 8);
            assert_eq!(argb_green(out) as u32, (255 * inv) >> 8);
        }
    }

    #[test]
    fn test_fast_path_bit_identical() {
        let linear = LinearBlend::new();
        let tables = GammaTables::from_gamma(2.2);
        let gamma = GammaBlend::new(&tables);
        let samples = [0xFF10_2030u32, 0xFFFF_FFFF, 0xFF00_0000, 0xFF80_7F01];
        let dests = [0x0000_0000u32, 0xFFFF_FFFF, 0x7F12_3456, 0xFF00_FF00];
        for &src in &samples {
            for &dst in &dests {
                let ea = effective_alpha(argb_alpha(src), 255);
                assert_eq!(ea, ALPHA_FULL);

                // The general formula evaluated at ea = 256
                let r = GammaBlend::channel(argb_red(src), argb_red(dst), ea);
                assert_eq!(r, argb_red(src));
                let general = {
                    let inv = ALPHA_FULL - ea;
                    let rb = (((src & RED_BLUE_MASK) * ea + (dst & RED_BLUE_MASK) * inv) >> 8)
                        & RED_BLUE_MASK;
                    let g = (((src & GREEN_MASK) * ea + (dst & GREEN_MASK) * inv) >> 8)
                        & GREEN_MASK;
                    let a = AlphaCache::global().over(argb_alpha(dst), ea) as u32;
                    a << ALPHA_SHIFT | rb | g
                };
                let mut fast = dst;
                linear.blend_pixel(&mut fast, src, 255);
                assert_eq!(fast, general, "src={:#x} dst={:#x}", src, dst);

                let mut fast_gamma = dst;
                gamma.blend_pixel(&mut fast_gamma, src, 255);
                assert_eq!(fast_gamma, gamma.blend(src, dst, ea));
            }
        }
    }

    #[test]
    fn test_gamma_identity_matches_linear() {
        let tables = GammaTables::identity();
        let gamma = GammaBlend::new(&tables);
        let linear = LinearBlend::new();
        for ea in [1u32, 64, 128, 255] {
            for (src, dst) in [(0xFF20_4060u32, 0xFFA0_B0C0u32), (0x80FF_0000, 0x4000_00FF)] {
                assert_eq!(gamma.blend(src, dst, ea), linear.blend(src, dst, ea));
            }
        }
    }

    #[test]
    fn test_gamma_alpha_untouched() {
        let tables = GammaTables::from_gamma(0.5);
        let gamma = GammaBlend::new(&tables);
        let linear = LinearBlend::new();
        let (src, dst) = (0xC040_4040u32, 0x6020_2020u32);
        let ea = effective_alpha(0xC0, 200);
        assert_eq!(
            argb_alpha(gamma.blend(src, dst, ea)),
            argb_alpha(linear.blend(src, dst, ea))
        );
    }

    #[test]
    fn test_hline_helpers() {
        let b = LinearBlend::new();
        let mut row = [0xFF00_0000u32; 4];
        b.blend_hline(&mut row[1..3], 0xFFFF_FFFF, 255);
        assert_eq!(row, [0xFF00_0000, 0xFFFF_FFFF, 0xFFFF_FFFF, 0xFF00_0000]);
        b.copy_hline(&mut row, 0xFF12_3456);
        assert!(row.iter().all(|&p| p == 0xFF12_3456));
        // Transparent sample leaves the run alone
        b.blend_hline(&mut row, 0x00FF_FFFF, 255);
        assert!(row.iter().all(|&p| p == 0xFF12_3456));
    }
}
