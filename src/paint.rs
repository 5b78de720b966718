//! Paint descriptions handed to a fill.

use std::fmt;

use crate::color::Rgba8;
use crate::span_gradient::LinearGradient;

/// What a filled shape is painted with.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A single colour; its own alpha is its opacity.
    Solid(Rgba8),
    /// A linear gradient with a paint-level opacity (0–255) applied on top
    /// of the stop alphas.
    LinearGradient {
        gradient: LinearGradient,
        opacity: u8,
    },
}

impl Paint {
    /// Fully opaque linear gradient paint.
    pub fn linear(gradient: LinearGradient) -> Self {
        Paint::LinearGradient {
            gradient,
            opacity: 255,
        }
    }

    /// Linear gradient paint with an explicit opacity.
    pub fn linear_with_opacity(gradient: LinearGradient, opacity: u8) -> Self {
        Paint::LinearGradient { gradient, opacity }
    }

    pub fn kind(&self) -> PaintKind {
        match self {
            Paint::Solid(_) => PaintKind::Solid,
            Paint::LinearGradient { .. } => PaintKind::LinearGradient,
        }
    }
}

impl From<Rgba8> for Paint {
    fn from(c: Rgba8) -> Self {
        Paint::Solid(c)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::linear(g)
    }
}

/// Discriminant of [`Paint`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    Solid,
    LinearGradient,
}

impl fmt::Display for PaintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintKind::Solid => f.write_str("solid"),
            PaintKind::LinearGradient => f.write_str("linear gradient"),
        }
    }
}
