use rayon::prelude::*;
use tracing::debug;

use crate::bounds::Bounds;
use crate::complex::Complex;
use crate::error::CoreError;
use crate::point::ComplexPoint;

/// An ordered population of orbits seeded on a regular grid.
///
/// Grid order is column-major: all `n_y` rows of column 0 first, then
/// column 1, and so on. Cell `(i, j)` is seeded at its left/bottom edge,
/// `seed_min + span * (index / n)`.
#[derive(Debug, Clone)]
pub struct PointField {
    seed_bounds: Bounds,
    n_x: usize,
    n_y: usize,
    points: Vec<ComplexPoint>,
}

impl PointField {
    pub fn new(seed_bounds: Bounds, n_x: usize, n_y: usize) -> crate::Result<Self> {
        seed_bounds.validate()?;
        let invalid = || CoreError::InvalidResolution { n_x, n_y };
        if n_x == 0 || n_y == 0 {
            return Err(invalid());
        }
        let len = n_x.checked_mul(n_y).ok_or_else(invalid)?;
        let mut points = Vec::new();
        points.try_reserve_exact(len).map_err(|_| invalid())?;
        let mut field = Self {
            seed_bounds,
            n_x,
            n_y,
            points,
        };
        field.regenerate();
        Ok(field)
    }

    #[inline]
    pub fn seed_bounds(&self) -> &Bounds {
        &self.seed_bounds
    }

    /// Grid resolution as `(n_x, n_y)`.
    #[inline]
    pub fn resolution(&self) -> (usize, usize) {
        (self.n_x, self.n_y)
    }

    #[inline]
    pub fn points(&self) -> &[ComplexPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points whose orbit has not (yet) escaped.
    pub fn bounded(&self) -> impl Iterator<Item = &ComplexPoint> {
        self.points.iter().filter(|p| !p.diverged())
    }

    pub fn diverged_count(&self) -> usize {
        self.points.iter().filter(|p| p.diverged()).count()
    }

    /// Rebuild the full `n_x × n_y` grid of fresh orbits.
    pub fn regenerate(&mut self) {
        let b = self.seed_bounds;
        let (n_x, n_y) = (self.n_x, self.n_y);

        self.points.clear();
        self.points.reserve(n_x * n_y);
        for i in 0..n_x {
            let re = b.x_min + b.width() * (i as f64 / n_x as f64);
            for j in 0..n_y {
                let im = b.y_min + b.height() * (j as f64 / n_y as f64);
                self.points.push(ComplexPoint::new(Complex::new(re, im)));
            }
        }
        debug!(n_x, n_y, points = self.points.len(), "Regenerated point field");
    }

    /// Step every orbit once.
    ///
    /// Orbits are independent, so the pass runs on the rayon pool; the
    /// result is identical to a sequential pass.
    pub fn advance_all(&mut self) {
        self.points.par_iter_mut().for_each(ComplexPoint::step);
    }

    /// The diverged points, each reset to a fresh orbit at its origin.
    pub fn filter_diverged(&self) -> Vec<ComplexPoint> {
        self.points
            .iter()
            .filter(|p| p.diverged())
            .map(ComplexPoint::reset)
            .collect()
    }

    /// Replace the population with [`filter_diverged`](Self::filter_diverged).
    ///
    /// The grid resolution is kept so that [`regenerate`](Self::regenerate)
    /// can restore the full field later.
    pub fn retain_diverged(&mut self) {
        let before = self.points.len();
        self.points = self.filter_diverged();
        debug!(
            before,
            after = self.points.len(),
            "Reseeded field from diverged points"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_resolution_rejected() {
        assert!(matches!(
            PointField::new(Bounds::MANDELBROT, 0, 4),
            Err(CoreError::InvalidResolution { .. })
        ));
        assert!(PointField::new(Bounds::MANDELBROT, 4, 0).is_err());
    }

    #[test]
    fn oversized_resolution_rejected() {
        assert!(matches!(
            PointField::new(Bounds::MANDELBROT, usize::MAX, 2),
            Err(CoreError::InvalidResolution { .. })
        ));
        assert!(matches!(
            PointField::new(Bounds::MANDELBROT, usize::MAX / 8, 1),
            Err(CoreError::InvalidResolution { .. })
        ));
    }

    #[test]
    fn grid_has_one_point_per_cell() {
        let f = PointField::new(Bounds::MANDELBROT, 5, 3).unwrap();
        assert_eq!(f.len(), 15);
        assert!(f.points().iter().all(|p| p.iteration_count() == 0));
    }

    #[test]
    fn grid_uses_left_edge_sampling_in_column_major_order() {
        let f = PointField::new(Bounds::MANDELBROT, 4, 4).unwrap();
        let origins: Vec<Complex> = f.points().iter().map(|p| p.origin()).collect();
        assert_eq!(origins[0], Complex::new(-2.0, -2.0));
        assert_eq!(origins[1], Complex::new(-2.0, -1.0));
        assert_eq!(origins[4], Complex::new(-1.0, -2.0));
        assert_eq!(origins[15], Complex::new(1.0, 1.0));
        // Upper edge is never sampled.
        assert!(origins.iter().all(|c| c.re < 2.0 && c.im < 2.0));
    }

    #[test]
    fn regeneration_is_deterministic() {
        let a = PointField::new(Bounds::new(-1.5, 0.5, -1.0, 1.0).unwrap(), 7, 9).unwrap();
        let b = PointField::new(Bounds::new(-1.5, 0.5, -1.0, 1.0).unwrap(), 7, 9).unwrap();
        assert_eq!(a.points(), b.points());

        let mut c = a.clone();
        c.advance_all();
        c.regenerate();
        assert_eq!(c.points(), a.points());
    }

    #[test]
    fn advance_all_matches_sequential_steps() {
        let mut field = PointField::new(Bounds::MANDELBROT, 8, 8).unwrap();
        let mut expected: Vec<ComplexPoint> = field.points().to_vec();
        for _ in 0..10 {
            field.advance_all();
            expected.iter_mut().for_each(ComplexPoint::step);
        }
        assert_eq!(field.points(), expected.as_slice());
    }

    #[test]
    fn filter_diverged_returns_fresh_orbits() {
        let mut field = PointField::new(Bounds::MANDELBROT, 4, 4).unwrap();
        for _ in 0..5 {
            field.advance_all();
        }
        let diverged = field.diverged_count();
        assert!(diverged > 0);

        let fresh = field.filter_diverged();
        assert_eq!(fresh.len(), diverged);
        for p in &fresh {
            assert_eq!(p.iteration_count(), 0);
            assert!(!p.diverged());
            assert_eq!(p.position(), p.origin());
        }
    }

    #[test]
    fn retain_diverged_keeps_resolution() {
        let mut field = PointField::new(Bounds::MANDELBROT, 4, 4).unwrap();
        field.advance_all();
        let diverged = field.diverged_count();
        field.retain_diverged();
        assert_eq!(field.len(), diverged);
        assert_eq!(field.resolution(), (4, 4));
        field.regenerate();
        assert_eq!(field.len(), 16);
    }
}
