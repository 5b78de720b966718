//! Coverage resolution: scanline cells to anti-aliased spans.
//!
//! Walks one row's cells left to right the way the AGG scanline sweep does,
//! folding the signed accumulated area into a 0–255 coverage under the
//! active winding rule.

use crate::basics::{CoverType, COVER_MASK, COVER_NONE, COVER_SHIFT};
use crate::rasterizer_cells_aa::Cell;

/// `(cover << CELL_AREA_SHIFT) - area` is the pixel's signed coverage in
/// area units.
pub const CELL_AREA_SHIFT: u32 = COVER_SHIFT + 1;
/// Parity fold works on a 9-bit accumulator.
pub const EVEN_ODD_MASK: i64 = (1 << CELL_AREA_SHIFT) - 1;
const EVEN_ODD_SCALE: i64 = 1 << COVER_SHIFT;

// ============================================================================
// Winding-rule folds
// ============================================================================

/// Folds a signed coverage value into an 8-bit cover.
pub trait CoverageFold {
    fn fold(&self, v: i64) -> CoverType;
}

/// Any non-zero winding is inside.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonZeroFold;

impl CoverageFold for NonZeroFold {
    #[inline]
    fn fold(&self, v: i64) -> CoverType {
        v.unsigned_abs().min(COVER_MASK as u64) as CoverType
    }
}

/// Odd winding is inside.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenOddFold;

impl CoverageFold for EvenOddFold {
    #[inline]
    fn fold(&self, v: i64) -> CoverType {
        let mut cover = (v.unsigned_abs() & EVEN_ODD_MASK as u64) as i64;
        if cover >= EVEN_ODD_SCALE {
            cover = EVEN_ODD_MASK - cover;
        }
        cover.min(COVER_MASK as i64) as CoverType
    }
}

/// Coverage of the pixel holding a cell.
#[inline]
pub fn cell_coverage<F: CoverageFold>(fold: &F, cover: i32, area: i64) -> CoverType {
    fold.fold((((cover as i64) << CELL_AREA_SHIFT) - area) >> CELL_AREA_SHIFT)
}

// ============================================================================
// CoverageSpans
// ============================================================================

/// A horizontal run of pixels sharing one coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageSpan {
    pub x: i32,
    pub len: i32,
    pub cover: CoverType,
}

impl CoverageSpan {
    /// Span over `[x, end)`, `end > x`.
    ///
    /// A gap wider than `i32::MAX` keeps its right end exact and gives up
    /// columns on the left, which are all negative.
    #[inline]
    fn up_to(x: i32, end: i32, cover: CoverType) -> Self {
        let start = (x as i64).max(end as i64 - i32::MAX as i64);
        Self {
            x: start as i32,
            len: (end as i64 - start) as i32,
            cover,
        }
    }

    /// One past the last column.
    #[inline]
    pub fn end(&self) -> i32 {
        self.x.saturating_add(self.len)
    }
}

/// Iterator over the non-empty coverage spans of one row.
///
/// Cells sharing a column are merged (areas summed, the later running cover
/// kept). A cell with area yields a one-pixel span; the gap up to the next
/// cell is a single span at the running cover.
pub struct CoverageSpans<'a, F> {
    cells: &'a [Cell],
    idx: usize,
    pending: Option<CoverageSpan>,
    fold: F,
}

impl<'a, F: CoverageFold> CoverageSpans<'a, F> {
    pub fn new(cells: &'a [Cell], fold: F) -> Self {
        Self {
            cells,
            idx: 0,
            pending: None,
            fold,
        }
    }
}

impl<F: CoverageFold> Iterator for CoverageSpans<'_, F> {
    type Item = CoverageSpan;

    fn next(&mut self) -> Option<CoverageSpan> {
        loop {
            if let Some(span) = self.pending.take() {
                if span.cover != COVER_NONE {
                    return Some(span);
                }
            }

            let cell = self.cells.get(self.idx)?;
            let x = cell.x;
            let mut area = cell.area as i64;
            let mut cover = cell.cover;
            self.idx += 1;

            // Accumulate all cells with the same X
            while let Some(next) = self.cells.get(self.idx) {
                if next.x != x {
                    break;
                }
                area += next.area as i64;
                cover = next.cover;
                self.idx += 1;
            }

            let next_x = self.cells.get(self.idx).map(|c| c.x);
            let run_cover = self.fold.fold(cover as i64);

            if area != 0 {
                let x_next = x.saturating_add(1);
                if let Some(nx) = next_x {
                    if nx > x_next {
                        self.pending = Some(CoverageSpan::up_to(x_next, nx, run_cover));
                    }
                }
                let c = cell_coverage(&self.fold, cover, area);
                if c != COVER_NONE {
                    return Some(CoverageSpan { x, len: 1, cover: c });
                }
            } else {
                // Zero area: the cell pixel joins the following gap
                if run_cover != COVER_NONE {
                    return Some(match next_x {
                        Some(nx) => CoverageSpan::up_to(x, nx, run_cover),
                        None => CoverageSpan {
                            x,
                            len: 1,
                            cover: run_cover,
                        },
                    });
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
