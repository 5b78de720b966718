//! # agg-gradient-fill
//!
//! Anti-aliased scanline compositor for linear gradient fills, in the style
//! of Anti-Grain Geometry (AGG).
//!
//! It consumes per-scanline coverage cells produced by a polygon rasterizer
//! and writes final pixels into a packed ARGB32 framebuffer. Supported:
//!
//! - Non-zero and even-odd winding rules
//! - Horizontal, vertical and diagonal gradient axes
//! - Pad, repeat and reflect spread methods
//! - An optional inverse affine transform applied to the sampling position
//! - Linear "over" blending or gamma-corrected blending
//!
//! ## Architecture
//!
//! A fill runs four stages, the first two once per call:
//!
//! 1. **Colour Ramp**: stops and opacity become a 256-entry packed table
//! 2. **Index Projector**: pixel position to fixed-point ramp index
//! 3. **Coverage Resolver**: scanline cells to spans of 0–255 coverage
//! 4. **Pixel Compositor**: blends the sampled colour into the framebuffer
//!
//! The entry points live in [`renderer_gradient`].
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade at `debug` and `trace` level.
//! The crate never installs a logger.

// Foundation types
pub mod basics;
pub mod color;
pub mod error;
pub mod gamma;
pub mod paint;
pub mod rendering_buffer;
pub mod trans_affine;

// Scanline cells and coverage
pub mod rasterizer_cells_aa;
pub mod rasterizer_scanline_aa;

// Gradient sampling
pub mod gradient_lut;
pub mod span_gradient;

// Compositing and rendering
pub mod pixfmt_argb;
pub mod renderer_gradient;
