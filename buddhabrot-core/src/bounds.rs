use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An axis-aligned rectangle `[x_min, x_max] × [y_min, y_max]` of the complex
/// plane.
///
/// Used both for the histogram domain (the visible window) and for the region
/// the seed grid covers. The two need not coincide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// The classic `[-2, 2] × [-2, 2]` square that contains the whole set.
    pub const MANDELBROT: Self = Self {
        x_min: -2.0,
        x_max: 2.0,
        y_min: -2.0,
        y_max: 2.0,
    };

    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> crate::Result<Self> {
        let bounds = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Reject non-finite, inverted, or zero-width rectangles.
    ///
    /// Called by every constructor that accepts bounds, including ones that
    /// arrive through deserialization.
    pub fn validate(&self) -> crate::Result<()> {
        let all_finite = [self.x_min, self.x_max, self.y_min, self.y_max]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(CoreError::InvalidBounds {
                reason: format!("bounds must be finite, got {self}"),
            });
        }
        if self.x_max <= self.x_min {
            return Err(CoreError::InvalidBounds {
                reason: format!("x_max ({}) must exceed x_min ({})", self.x_max, self.x_min),
            });
        }
        if self.y_max <= self.y_min {
            return Err(CoreError::InvalidBounds {
                reason: format!("y_max ({}) must exceed y_min ({})", self.y_max, self.y_min),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Inclusive containment test. NaN coordinates are never contained.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::MANDELBROT
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}
