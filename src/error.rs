//! Errors reported by gradient fills.
//!
//! Every error is raised before the first pixel write, so a failed fill
//! leaves the framebuffer untouched.

use thiserror::Error;

use crate::basics::PointD;
use crate::paint::PaintKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FillError {
    /// The paint cannot be drawn by the linear gradient compositor.
    #[error("cannot fill with a {kind} paint: not a linear gradient")]
    NotLinearGradient { kind: PaintKind },

    /// The gradient axis is shorter than one distance unit.
    #[error(
        "degenerate gradient axis ({}, {}) -> ({}, {})",
        .start.x, .start.y, .end.x, .end.y
    )]
    DegenerateGradient { start: PointD, end: PointD },

    /// The first row lies after the last row.
    #[error("invalid row range {start}..={end}")]
    InvalidRowRange { start: i32, end: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = FillError::NotLinearGradient {
            kind: PaintKind::Solid,
        };
        assert_eq!(e.to_string(), "cannot fill with a solid paint: not a linear gradient");

        let e = FillError::DegenerateGradient {
            start: PointD::new(5.0, 5.0),
            end: PointD::new(5.0, 5.0),
        };
        assert_eq!(e.to_string(), "degenerate gradient axis (5, 5) -> (5, 5)");

        let e = FillError::InvalidRowRange { start: 9, end: 2 };
        assert_eq!(e.to_string(), "invalid row range 9..=2");
    }
}
