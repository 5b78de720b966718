//! Scanline cell storage.
//!
//! A cell carries the coverage an edge rasterizer accumulated for one pixel:
//! the signed `area` of edge fragments inside the pixel and the running
//! `cover` of the row up to and including that pixel. [`ScanlineCells`]
//! collects per-cell deltas as an AGG-style cell rasterizer emits them and
//! turns them into sorted rows the compositor can read.

// ============================================================================
// Cell
// ============================================================================

/// One pixel cell of a scanline row.
///
/// - `area`: signed area of edge fragments, in 1/512 of cover × subpixel
/// - `cover`: signed running total of the row's coverage, in 1/256
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub x: i32,
    pub area: i32,
    pub cover: i32,
}

impl Cell {
    pub fn new(x: i32, area: i32, cover: i32) -> Self {
        Self { x, area, cover }
    }
}

// ============================================================================
// CellRows
// ============================================================================

/// A source of scanline rows.
pub trait CellRows {
    /// Cells of row `y`, ascending by `x`, with running covers.
    /// Rows without cells return an empty slice.
    fn row(&self, y: i32) -> &[Cell];
}

/// Rows held as a vector indexed by `y` from 0.
impl<R: AsRef<[Cell]>> CellRows for [R] {
    fn row(&self, y: i32) -> &[Cell] {
        if y < 0 {
            return &[];
        }
        self.get(y as usize).map(|r| r.as_ref()).unwrap_or(&[])
    }
}

impl<R: AsRef<[Cell]>> CellRows for Vec<R> {
    fn row(&self, y: i32) -> &[Cell] {
        self.as_slice().row(y)
    }
}

// ============================================================================
// ScanlineCells
// ============================================================================
/// A cell delta as emitted by an edge walker.
#[derive(Debug, Clone, Copy)]
struct DeltaCell {
    x: i32,
    y: i32,
    cover: i32,
    area: i32,
}

/// Cells of one non-empty row.
#[derive(Debug, Clone, Copy)]
struct SortedY {
    y: i32,
    start: u32,
    num: u32,
}

/// Scanline array: rows of cells keyed by device `y`.
///
/// Deltas are added in any order with [`add_cell`](Self::add_cell); after
/// [`finish`](Self::finish) each row is sorted by `x`, cells sharing a
/// column are merged and covers are running totals. Only rows holding
/// cells are indexed, so the `y` span of the input is unbounded.
pub struct ScanlineCells {
    deltas: Vec<DeltaCell>,
    cells: Vec<Cell>,
    sorted_y: Vec<SortedY>,
    min_y: i32,
    max_y: i32,
    finished: bool,
}

impl ScanlineCells {
    pub fn new() -> Self {
        Self {
            deltas: Vec::new(),
            cells: Vec::new(),
            sorted_y: Vec::new(),
            min_y: i32::MAX,
            max_y: i32::MIN,
            finished: false,
        }
    }

    /// Discard all cells.
    pub fn reset(&mut self) {
        self.deltas.clear();
        self.cells.clear();
        self.sorted_y.clear();
        self.min_y = i32::MAX;
        self.max_y = i32::MIN;
        self.finished = false;
    }

    /// Add a cover delta and area for pixel `(x, y)`.
    ///
    /// Adding after [`finish`](Self::finish) reopens the array; call
    /// `finish` again before reading rows.
    pub fn add_cell(&mut self, x: i32, y: i32, cover_delta: i32, area: i32) {
        if cover_delta == 0 && area == 0 {
            return;
        }
        self.deltas.push(DeltaCell {
            x,
            y,
            cover: cover_delta,
            area,
        });
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.finished = false;
    }

    /// Full-coverage span `[x1, x2)` on row `y`.
    pub fn add_span(&mut self, y: i32, x1: i32, x2: i32) {
        if x2 <= x1 {
            return;
        }
        self.add_cell(x1, y, 256, 0);
        self.add_cell(x2, y, -256, 0);
    }

    /// Sort, merge and accumulate the collected deltas into rows.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.cells.clear();
        self.sorted_y.clear();
        self.finished = true;
        if self.deltas.is_empty() {
            return;
        }

        // Row-major order; the sort is stable so same-column deltas merge
        // in insertion order
        let deltas = &self.deltas;
        let mut order: Vec<u32> = (0..deltas.len() as u32).collect();
        order.sort_by_key(|&i| {
            let d = &deltas[i as usize];
            (d.y, d.x)
        });

        self.cells.reserve(deltas.len());
        let mut cover = 0i32;
        for &i in &order {
            let d = deltas[i as usize];
            let new_row = self.sorted_y.last().map_or(true, |sy| sy.y != d.y);
            if new_row {
                self.sorted_y.push(SortedY {
                    y: d.y,
                    start: self.cells.len() as u32,
                    num: 0,
                });
                cover = 0;
            }
            cover = cover.saturating_add(d.cover);
            match self.cells.last_mut() {
                Some(last) if !new_row && last.x == d.x => {
                    last.area = last.area.saturating_add(d.area);
                    last.cover = cover;
                }
                _ => self.cells.push(Cell::new(d.x, d.area, cover)),
            }
        }

        let mut end = self.cells.len() as u32;
        for sy in self.sorted_y.iter_mut().rev() {
            sy.num = end - sy.start;
            end = sy.start;
        }
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of merged cells (valid after `finish`).
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
}

impl Default for ScanlineCells {
    fn default() -> Self {
        Self::new()
    }
}

impl CellRows for ScanlineCells {
    /// Empty until [`finish`](ScanlineCells::finish) has run.
    fn row(&self, y: i32) -> &[Cell] {
        if !self.finished {
            return &[];
        }
        match self.sorted_y.binary_search_by_key(&y, |sy| sy.y) {
            Ok(i) => {
                let sy = self.sorted_y[i];
                &self.cells[sy.start as usize..(sy.start + sy.num) as usize]
            }
            Err(_) => &[],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
