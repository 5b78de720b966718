//! Gradient colour ramp.
//!
//! Builds the fixed-size lookup table a gradient fill samples from: color
//! stops are sorted, deduplicated and interpolated with a fixed-point DDA
//! into `COLOR_RAMP_SIZE` packed ARGB words, with the paint opacity folded
//! into every alpha.

use log::trace;

use crate::basics::uround;
use crate::color::{argb_alpha, Rgba8};

/// log2 of the number of ramp entries.
pub const COLOR_RAMP_SHIFT: u32 = 8;
pub const COLOR_RAMP_SIZE: usize = 1 << COLOR_RAMP_SHIFT;
pub const COLOR_RAMP_MASK: usize = COLOR_RAMP_SIZE - 1;

/// Fraction bits used by the per-channel interpolator.
const DDA_SHIFT: i32 = 14;

// ============================================================================
// Channel interpolator
// ============================================================================

/// Fixed-point DDA stepping one channel from `y1` towards `y2` over `count`
/// steps.
struct ChannelDda {
    y: i32,
    inc: i32,
    dy: i32,
}

impl ChannelDda {
    fn new(y1: u8, y2: u8, count: u32) -> Self {
        Self {
            y: y1 as i32,
            inc: ((y2 as i32 - y1 as i32) << DDA_SHIFT) / count.max(1) as i32,
            dy: 0,
        }
    }

    #[inline]
    fn inc(&mut self) {
        self.dy += self.inc;
    }

    #[inline]
    fn y(&self) -> u8 {
        (self.y + (self.dy >> DDA_SHIFT)).clamp(0, 255) as u8
    }
}

/// Interpolates all four channels of a segment between two stops.
struct ColorInterpolator {
    r: ChannelDda,
    g: ChannelDda,
    b: ChannelDda,
    a: ChannelDda,
}

impl ColorInterpolator {
    fn new(c1: &Rgba8, c2: &Rgba8, len: u32) -> Self {
        Self {
            r: ChannelDda::new(c1.r, c2.r, len),
            g: ChannelDda::new(c1.g, c2.g, len),
            b: ChannelDda::new(c1.b, c2.b, len),
            a: ChannelDda::new(c1.a, c2.a, len),
        }
    }

    fn inc(&mut self) {
        self.r.inc();
        self.g.inc();
        self.b.inc();
        self.a.inc();
    }

    fn color(&self) -> Rgba8 {
        Rgba8 {
            r: self.r.y(),
            g: self.g.y(),
            b: self.b.y(),
            a: self.a.y(),
        }
    }
}

// ============================================================================
// ColorStop
// ============================================================================

/// A gradient stop: colour at a position along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba8,
}

impl ColorStop {
    pub fn new(offset: f64, color: Rgba8) -> Self {
        Self { offset, color }
    }

    /// Offset clamped to [0, 1]; NaN reads as 0.
    fn clamped_offset(&self) -> f64 {
        if self.offset.is_nan() {
            0.0
        } else {
            self.offset.clamp(0.0, 1.0)
        }
    }
}

// ============================================================================
// ColorRamp
// ============================================================================

/// The sampled gradient: `COLOR_RAMP_SIZE` packed `0xAARRGGBB` words.
#[derive(Clone)]
pub struct ColorRamp {
    entries: [u32; COLOR_RAMP_SIZE],
    no_blending: bool,
}

impl ColorRamp {
    /// Build the ramp from `stops` with the paint `opacity` (0–255) applied.
    ///
    /// Stops may arrive in any order; same-offset stops keep the first one
    /// supplied. An empty stop set produces a fully transparent ramp.
    pub fn build(stops: &[ColorStop], opacity: u8) -> Self {
        let mut profile: Vec<ColorStop> = stops
            .iter()
            .map(|s| ColorStop::new(s.clamped_offset(), s.color))
            .collect();
        profile.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        profile.dedup_by(|later, earlier| later.offset == earlier.offset);

        let mut colors = [Rgba8::default(); COLOR_RAMP_SIZE];
        match profile.as_slice() {
            [] => {}
            [only] => colors.fill(only.color),
            [first, .., last] => {
                let mut start = Self::entry_of(first.offset);
                colors[..start].fill(first.color);

                for pair in profile.windows(2) {
                    let end = Self::entry_of(pair[1].offset);
                    let len = end.saturating_sub(start) as u32;
                    let mut ci = ColorInterpolator::new(&pair[0].color, &pair[1].color, len);
                    while start < end {
                        colors[start] = ci.color();
                        ci.inc();
                        start += 1;
                    }
                }
                colors[start..].fill(last.color);
            }
        }

        let mut entries = [0u32; COLOR_RAMP_SIZE];
        for (entry, c) in entries.iter_mut().zip(colors.iter()) {
            let a = Rgba8::multiply(c.a, opacity);
            *entry = Rgba8::with_opacity(c, a as u32).to_argb();
        }
        let no_blending = !profile.is_empty() && entries.iter().all(|&p| argb_alpha(p) == 255);

        trace!(
            "color ramp built: {} stops ({} distinct), opacity {}, no_blending={}",
            stops.len(),
            profile.len(),
            opacity,
            no_blending
        );

        Self {
            entries,
            no_blending,
        }
    }

    /// Ramp entry a stop offset lands on.
    #[inline]
    fn entry_of(offset: f64) -> usize {
        (uround(offset * COLOR_RAMP_MASK as f64) as usize).min(COLOR_RAMP_MASK)
    }

    /// True iff every entry is fully opaque.
    #[inline]
    pub fn no_blending(&self) -> bool {
        self.no_blending
    }

    /// Packed colour at `entry`; indices past the end read the last entry.
    #[inline]
    pub fn get(&self, entry: usize) -> u32 {
        self.entries[entry.min(COLOR_RAMP_MASK)]
    }

    pub fn entries(&self) -> &[u32; COLOR_RAMP_SIZE] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        COLOR_RAMP_SIZE
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::fmt::Debug for ColorRamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorRamp")
            .field("first", &format_args!("{:#010x}", self.entries[0]))
            .field("last", &format_args!("{:#010x}", self.entries[COLOR_RAMP_MASK]))
            .field("no_blending", &self.no_blending)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{argb_blue, argb_green, argb_red};

    fn red_to_blue() -> Vec<ColorStop> {
        vec![
            ColorStop::new(0.0, Rgba8::new(255, 0, 0, 255)),
            ColorStop::new(1.0, Rgba8::new(0, 0, 255, 255)),
        ]
    }

    #[test]
    fn test_two_stops_hit_both_ends() {
        let ramp = ColorRamp::build(&red_to_blue(), 255);
        assert_eq!(ramp.get(0), 0xFFFF_0000);
        assert_eq!(ramp.get(255), 0xFF00_00FF);
        let mid = ramp.get(128);
        assert!(argb_red(mid) > 100 && argb_red(mid) < 150, "mid={:#x}", mid);
        assert!(argb_blue(mid) > 100 && argb_blue(mid) < 150, "mid={:#x}", mid);
        assert!(ramp.no_blending());
    }

    #[test]
    fn test_three_stops() {
        let stops = [
            ColorStop::new(0.0, Rgba8::new(255, 0, 0, 255)),
            ColorStop::new(0.5, Rgba8::new(0, 255, 0, 255)),
            ColorStop::new(1.0, Rgba8::new(0, 0, 255, 255)),
        ];
        let ramp = ColorRamp::build(&stops, 255);
        assert_eq!(argb_green(ramp.get(128)), 255);
        assert_eq!(ramp.get(255), 0xFF00_00FF);
    }

    #[test]
    fn test_unsorted_and_duplicate_stops() {
        let stops = [
            ColorStop::new(1.0, Rgba8::new(0, 0, 255, 255)),
            ColorStop::new(0.0, Rgba8::new(255, 0, 0, 255)),
            ColorStop::new(0.0, Rgba8::new(0, 255, 0, 255)),
        ];
        let ramp = ColorRamp::build(&stops, 255);
        // The first supplied stop at offset 0 wins
        assert_eq!(ramp.get(0), 0xFFFF_0000);
        assert_eq!(ramp.get(255), 0xFF00_00FF);
    }

    #[test]
    fn test_end_colours_repeat_outside_stops() {
        let stops = [
            ColorStop::new(0.25, Rgba8::new(10, 20, 30, 255)),
            ColorStop::new(0.75, Rgba8::new(40, 50, 60, 255)),
        ];
        let ramp = ColorRamp::build(&stops, 255);
        for i in 0..60 {
            assert_eq!(ramp.get(i), 0xFF0A_141E, "entry {}", i);
        }
        for i in 192..256 {
            assert_eq!(ramp.get(i), 0xFF28_323C, "entry {}", i);
        }
    }

    #[test]
    fn test_offsets_clamped() {
        let stops = [
            ColorStop::new(-3.0, Rgba8::new(0, 0, 0, 255)),
            ColorStop::new(7.0, Rgba8::new(255, 255, 255, 255)),
        ];
        let ramp = ColorRamp::build(&stops, 255);
        assert_eq!(ramp.get(0), 0xFF00_0000);
        assert_eq!(ramp.get(255), 0xFFFF_FFFF);
    }

    #[test]
    fn test_single_stop_is_constant() {
        let ramp = ColorRamp::build(&[ColorStop::new(0.4, Rgba8::new(1, 2, 3, 255))], 255);
        assert!(ramp.entries().iter().all(|&p| p == 0xFF01_0203));
        assert!(ramp.no_blending());
    }

    #[test]
    fn test_empty_stops_transparent() {
        let ramp = ColorRamp::build(&[], 255);
        assert!(ramp.entries().iter().all(|&p| p == 0));
        assert!(!ramp.no_blending());
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let stops = red_to_blue();
        let mut last_alpha = 256u32;
        for opacity in (0..=255u32).rev().step_by(15) {
            let ramp = ColorRamp::build(&stops, opacity as u8);
            let a = argb_alpha(ramp.get(100)) as u32;
            let expected = (255 * opacity + 127) / 255;
            assert!(
                (a as i32 - expected as i32).abs() <= 1,
                "opacity {}: alpha {} expected {}",
                opacity,
                a,
                expected
            );
            assert!(a <= last_alpha);
            last_alpha = a;
            assert_eq!(ramp.no_blending(), opacity == 255);
        }
        assert!(ColorRamp::build(&stops, 0)
            .entries()
            .iter()
            .all(|&p| argb_alpha(p) == 0));
    }

    #[test]
    fn test_translucent_stop_disables_fast_path() {
        let stops = [
            ColorStop::new(0.0, Rgba8::new(255, 0, 0, 255)),
            ColorStop::new(1.0, Rgba8::new(0, 0, 255, 254)),
        ];
        assert!(!ColorRamp::build(&stops, 255).no_blending());
    }

    #[test]
    fn test_dda_reaches_target() {
        let mut ci = ColorInterpolator::new(
            &Rgba8::new(0, 0, 0, 255),
            &Rgba8::new(255, 255, 255, 255),
            10,
        );
        assert_eq!(ci.color().r, 0);
        for _ in 0..10 {
            ci.inc();
        }
        assert_eq!(ci.color().r, 255);
    }
}
