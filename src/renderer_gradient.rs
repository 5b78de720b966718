//! Linear gradient fill driver.
//!
//! Ties the pipeline together: the paint is validated and the colour ramp
//! and index projector are built once per fill, then each requested row is
//! resolved into coverage spans and composited into the framebuffer.
//!
//! The row loop is generic over the winding-rule fold and the pixel
//! compositor, so every `(rule, transform, gamma)` combination runs its own
//! monomorphised loop. The transform only changes how the projector is
//! built.
//!
//! Rows are independent: a row's output depends on its own cells, the
//! read-only ramp and [`IndexProjector::row_origin`], which is a pure
//! function of the row index.

use log::debug;

use crate::basics::{CoverType, FillingRule, COVER_FULL};
use crate::error::FillError;
use crate::gamma::GammaTables;
use crate::gradient_lut::ColorRamp;
use crate::paint::Paint;
use crate::pixfmt_argb::{GammaBlend, LinearBlend, PixelCompositor};
use crate::rasterizer_cells_aa::CellRows;
use crate::rasterizer_scanline_aa::{CoverageFold, CoverageSpans, EvenOddFold, NonZeroFold};
use crate::rendering_buffer::PixelBuffer;
use crate::span_gradient::IndexProjector;
use crate::trans_affine::TransAffine;

// ============================================================================
// Fill parameters and results
// ============================================================================

/// Inclusive range of device rows to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: i32,
    pub end: i32,
}

impl RowRange {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// A single row.
    pub fn row(y: i32) -> Self {
        Self { start: y, end: y }
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

/// Per-fill configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions<'g> {
    pub filling_rule: FillingRule,
    /// Inverse user matrix: device space to gradient space.
    pub transform: Option<TransAffine>,
    /// Per-channel gamma tables; `None` blends linearly.
    pub gamma: Option<&'g GammaTables>,
}

impl<'g> FillOptions<'g> {
    pub fn new(filling_rule: FillingRule) -> Self {
        Self {
            filling_rule,
            transform: None,
            gamma: None,
        }
    }

    pub fn with_transform(mut self, inverse: TransAffine) -> Self {
        self.transform = Some(inverse);
        self
    }

    pub fn with_gamma(mut self, tables: &'g GammaTables) -> Self {
        self.gamma = Some(tables);
        self
    }
}

/// What a fill wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FillSummary {
    /// Rows with at least one pixel written.
    pub rows: u32,
    /// Pixels covered by a non-zero span, after clipping.
    pub pixels: u64,
}

// ============================================================================
// Entry points
// ============================================================================

/// Fill `rows` of `buffer` with a linear gradient `paint`, using the
/// coverage in `cells`.
///
/// Rows outside the range, rows without cells and columns outside the
/// cells' spans are left untouched. All validation happens before the
/// first write: on error the buffer is unchanged.
pub fn fill_linear_gradient<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    options: &FillOptions<'_>,
) -> Result<FillSummary, FillError> {
    let (ramp, projector) = prepare(paint, rows, options).map_err(|err| {
        debug!("gradient fill rejected: {}", err);
        err
    })?;

    let summary = match (options.filling_rule, options.gamma) {
        (FillingRule::NonZero, None) => render_rows(
            buffer,
            &ramp,
            &projector,
            cells,
            rows,
            NonZeroFold,
            LinearBlend::new(),
        ),
        (FillingRule::EvenOdd, None) => render_rows(
            buffer,
            &ramp,
            &projector,
            cells,
            rows,
            EvenOddFold,
            LinearBlend::new(),
        ),
        (FillingRule::NonZero, Some(tables)) => render_rows(
            buffer,
            &ramp,
            &projector,
            cells,
            rows,
            NonZeroFold,
            GammaBlend::new(tables),
        ),
        (FillingRule::EvenOdd, Some(tables)) => render_rows(
            buffer,
            &ramp,
            &projector,
            cells,
            rows,
            EvenOddFold,
            GammaBlend::new(tables),
        ),
    };

    debug!(
        "gradient fill done: {} rows, {} pixels written",
        summary.rows, summary.pixels
    );
    Ok(summary)
}

/// Non-zero winding, linear blending.
pub fn fill_non_zero<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::NonZero);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Even-odd winding, linear blending.
pub fn fill_even_odd<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::EvenOdd);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Non-zero winding, sampled through the inverse matrix `inverse`.
pub fn fill_non_zero_transformed<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    inverse: &TransAffine,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::NonZero).with_transform(*inverse);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Even-odd winding, sampled through the inverse matrix `inverse`.
pub fn fill_even_odd_transformed<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    inverse: &TransAffine,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::EvenOdd).with_transform(*inverse);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Non-zero winding, gamma-corrected blending.
pub fn fill_non_zero_gamma<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    gamma: &GammaTables,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::NonZero).with_gamma(gamma);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Even-odd winding, gamma-corrected blending.
pub fn fill_even_odd_gamma<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    gamma: &GammaTables,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::EvenOdd).with_gamma(gamma);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Non-zero winding, transformed sampling, gamma-corrected blending.
pub fn fill_non_zero_transformed_gamma<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    inverse: &TransAffine,
    gamma: &GammaTables,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::NonZero)
        .with_transform(*inverse)
        .with_gamma(gamma);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

/// Even-odd winding, transformed sampling, gamma-corrected blending.
pub fn fill_even_odd_transformed_gamma<C: CellRows + ?Sized>(
    buffer: &mut PixelBuffer<'_>,
    paint: &Paint,
    cells: &C,
    rows: RowRange,
    inverse: &TransAffine,
    gamma: &GammaTables,
) -> Result<FillSummary, FillError> {
    let options = FillOptions::new(FillingRule::EvenOdd)
        .with_transform(*inverse)
        .with_gamma(gamma);
    fill_linear_gradient(buffer, paint, cells, rows, &options)
}

// ============================================================================
// Internals
// ============================================================================

/// Validate the request and build the per-fill state.
fn prepare(
    paint: &Paint,
    rows: RowRange,
    options: &FillOptions<'_>,
) -> Result<(ColorRamp, IndexProjector), FillError> {
    let (gradient, opacity) = match paint {
        Paint::LinearGradient { gradient, opacity } => (gradient, *opacity),
        other => {
            return Err(FillError::NotLinearGradient { kind: other.kind() });
        }
    };

    let projector = match &options.transform {
        Some(inverse) => IndexProjector::with_transform(gradient, inverse),
        None => IndexProjector::new(gradient),
    }
    .ok_or(FillError::DegenerateGradient {
        start: gradient.start,
        end: gradient.end,
    })?;

    if !rows.is_valid() {
        return Err(FillError::InvalidRowRange {
            start: rows.start,
            end: rows.end,
        });
    }

    debug!(
        "gradient fill: {:?} {:?} {:?}, rows {}..={}, transform={}, gamma={}",
        options.filling_rule,
        gradient.orientation(),
        gradient.spread,
        rows.start,
        rows.end,
        options.transform.is_some(),
        options.gamma.is_some()
    );

    Ok((ColorRamp::build(&gradient.stops, opacity), projector))
}

fn render_rows<C, F, P>(
    buffer: &mut PixelBuffer<'_>,
    ramp: &ColorRamp,
    projector: &IndexProjector,
    cells: &C,
    rows: RowRange,
    fold: F,
    compositor: P,
) -> FillSummary
where
    C: CellRows + ?Sized,
    F: CoverageFold + Copy,
    P: PixelCompositor,
{
    let mut summary = FillSummary::default();
    let width = buffer.width() as i32;
    let height = buffer.height() as i32;

    // Rows outside the buffer cannot be written
    let first = rows.start.max(0);
    let last = rows.end.min(height - 1);
    if first > last {
        return summary;
    }

    let no_blending = ramp.no_blending();
    let mut row_origin = projector.row_origin(first);
    for y in first..=last {
        let origin = row_origin;
        row_origin = row_origin.saturating_add(projector.row_increment());

        let row_cells = cells.row(y);
        if row_cells.is_empty() {
            continue;
        }
        let Some(dst) = buffer.row_mut(y) else {
            continue;
        };

        let mut written = 0u64;
        for span in CoverageSpans::new(row_cells, fold) {
            let x1 = span.x.max(0);
            let x2 = span.end().min(width);
            if x1 >= x2 {
                continue;
            }
            let run = &mut dst[x1 as usize..x2 as usize];
            written += run.len() as u64;
            render_span(run, x1, origin, span.cover, ramp, projector, &compositor, no_blending);
        }
        if written > 0 {
            summary.rows += 1;
            summary.pixels += written;
        }
    }
    summary
}

#[inline]
#[allow(clippy::too_many_arguments)]
fn render_span<P: PixelCompositor>(
    run: &mut [u32],
    x: i32,
    row_origin: i64,
    cover: CoverType,
    ramp: &ColorRamp,
    projector: &IndexProjector,
    compositor: &P,
    no_blending: bool,
) {
    let overwrite = no_blending && cover == COVER_FULL;
    let mut acc = projector.row_start(row_origin, x);

    if projector.is_row_constant() {
        let src = ramp.get(projector.entry(acc));
        if overwrite {
            compositor.copy_hline(run, src);
        } else {
            compositor.blend_hline(run, src, cover);
        }
        return;
    }

    let inc = projector.pixel_increment();
    if overwrite {
        for p in run.iter_mut() {
            *p = compositor.opaque(ramp.get(projector.entry(acc)));
            acc = acc.saturating_add(inc);
        }
    } else {
        for p in run.iter_mut() {
            compositor.blend_pixel(p, ramp.get(projector.entry(acc)), cover);
            acc = acc.saturating_add(inc);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::PointD;
    use crate::color::Rgba8;
    use crate::rasterizer_cells_aa::{Cell, ScanlineCells};
    use crate::span_gradient::{LinearGradient, SpreadMethod};

    const SENTINEL: u32 = 0x1234_5678;

    fn black_to_white() -> Paint {
        Paint::linear(
            LinearGradient::new(PointD::new(0.0, 0.0), PointD::new(100.0, 0.0), SpreadMethod::Pad)
                .with_stop(0.0, Rgba8::new_opaque(0, 0, 0))
                .with_stop(1.0, Rgba8::new_opaque(255, 255, 255)),
        )
    }

    #[test]
    fn test_row_range() {
        assert!(RowRange::new(0, 0).is_valid());
        assert!(!RowRange::new(3, 2).is_valid());
        assert_eq!(RowRange::row(4), RowRange::new(4, 4));
    }

    #[test]
    fn test_options_default() {
        let o = FillOptions::default();
        assert_eq!(o.filling_rule, FillingRule::NonZero);
        assert!(o.transform.is_none());
        assert!(o.gamma.is_none());
    }

    #[test]
    fn test_solid_paint_rejected() {
        let mut data = vec![SENTINEL; 16];
        let mut buf = PixelBuffer::from_slice(&mut data, 4, 4).unwrap();
        let rows = vec![vec![Cell::new(0, 0, 256), Cell::new(4, 0, 0)]];
        let err = fill_non_zero(
            &mut buf,
            &Paint::Solid(Rgba8::new_opaque(1, 2, 3)),
            &rows,
            RowRange::new(0, 3),
        )
        .unwrap_err();
        assert!(matches!(err, FillError::NotLinearGradient { .. }));
        assert!(data.iter().all(|&p| p == SENTINEL));
    }

    #[test]
    fn test_inverted_rows_rejected() {
        let mut data = vec![SENTINEL; 16];
        let mut buf = PixelBuffer::from_slice(&mut data, 4, 4).unwrap();
        let rows = vec![vec![Cell::new(0, 0, 256), Cell::new(4, 0, 0)]];
        let err = fill_even_odd(&mut buf, &black_to_white(), &rows, RowRange::new(2, 1)).unwrap_err();
        assert_eq!(err, FillError::InvalidRowRange { start: 2, end: 1 });
        assert!(data.iter().all(|&p| p == SENTINEL));
    }

    #[test]
    fn test_summary_counts_clipped_pixels() {
        let mut data = vec![0u32; 8 * 4];
        let mut buf = PixelBuffer::from_slice(&mut data, 8, 4).unwrap();
        let mut cells = ScanlineCells::new();
        cells.add_span(1, -5, 3);
        cells.add_span(2, 6, 20);
        cells.add_span(9, 0, 8);
        cells.finish();
        let summary =
            fill_non_zero(&mut buf, &black_to_white(), &cells, RowRange::new(-10, 100)).unwrap();
        assert_eq!(summary, FillSummary { rows: 2, pixels: 5 });
        assert!(data[..8].iter().all(|&p| p == 0));
        assert_eq!(data[8 + 3], 0);
        assert_eq!(data[16 + 5], 0);
        assert_ne!(data[16 + 6], 0);
    }

    #[test]
    fn test_vertical_run_uses_row_colour() {
        let paint = Paint::linear(
            LinearGradient::new(PointD::new(0.0, 0.0), PointD::new(0.0, 4.0), SpreadMethod::Pad)
                .with_stop(0.0, Rgba8::new_opaque(0, 0, 0))
                .with_stop(1.0, Rgba8::new_opaque(255, 0, 0)),
        );
        let mut data = vec![0u32; 6 * 5];
        let mut buf = PixelBuffer::from_slice(&mut data, 6, 5).unwrap();
        let mut cells = ScanlineCells::new();
        for y in 0..5 {
            cells.add_span(y, 0, 6);
        }
        cells.finish();
        fill_non_zero(&mut buf, &paint, &cells, RowRange::new(0, 4)).unwrap();
        for y in 0..5 {
            let row = &data[y * 6..y * 6 + 6];
            assert!(row.iter().all(|&p| p == row[0]), "row {} not uniform", y);
        }
        assert_eq!(data[0], 0xFF00_0000);
        assert_eq!(data[4 * 6], 0xFFFF_0000);
    }
}
