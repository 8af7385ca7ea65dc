use crate::complex::Complex;

/// Squared escape radius. An orbit with `|z|² > 4` (i.e. `|z| > 2`) diverges.
pub const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// A single orbit under the Mandelbrot map `z ← z² + c`.
///
/// The orbit starts at `z₀ = c`, so the first step already yields `c² + c`.
/// Once `diverged` is set the point is frozen: further steps change nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexPoint {
    origin: Complex,
    position: Complex,
    iteration_count: u64,
    diverged: bool,
}

impl ComplexPoint {
    pub fn new(origin: Complex) -> Self {
        Self {
            origin,
            position: origin,
            iteration_count: 0,
            diverged: false,
        }
    }

    #[inline]
    pub fn origin(&self) -> Complex {
        self.origin
    }

    #[inline]
    pub fn position(&self) -> Complex {
        self.position
    }

    #[inline]
    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    #[inline]
    pub fn diverged(&self) -> bool {
        self.diverged
    }

    /// Apply one Mandelbrot iteration.
    #[inline]
    pub fn step(&mut self) {
        if self.diverged {
            return;
        }

        self.position = self.position.square() + self.origin;
        self.iteration_count += 1;

        if self.position.norm_sq() > ESCAPE_RADIUS_SQ {
            self.diverged = true;
        }
    }

    /// Step until `iteration_count >= limit` or the orbit diverges.
    pub fn advance_until(&mut self, limit: u64) {
        while self.iteration_count < limit && !self.diverged {
            self.step();
        }
    }

    /// A fresh orbit at the same origin.
    pub fn reset(&self) -> Self {
        Self::new(self.origin)
    }
}
