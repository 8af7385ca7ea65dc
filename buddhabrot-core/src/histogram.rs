use crate::bounds::Bounds;
use crate::error::CoreError;

/// A fixed-resolution 2D grid of visit counts over a rectangle of the plane.
///
/// Counts are stored row-major: bin `(i, j)` lives at `j * bins_x + i`, and
/// row `j = 0` corresponds to `y_min`. Renderers index pixels the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram2D {
    bounds: Bounds,
    bins_x: usize,
    bins_y: usize,
    counts: Vec<u64>,
}

impl Histogram2D {
    pub fn new(bounds: Bounds, bins_x: usize, bins_y: usize) -> crate::Result<Self> {
        bounds.validate()?;
        let invalid = || CoreError::InvalidBins { bins_x, bins_y };
        if bins_x == 0 || bins_y == 0 {
            return Err(invalid());
        }
        let len = bins_x.checked_mul(bins_y).ok_or_else(invalid)?;
        let mut counts = Vec::new();
        counts.try_reserve_exact(len).map_err(|_| invalid())?;
        counts.resize(len, 0);
        Ok(Self {
            bounds,
            bins_x,
            bins_y,
            counts,
        })
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Resolution as `(bins_x, bins_y)`.
    #[inline]
    pub fn bins(&self) -> (usize, usize) {
        (self.bins_x, self.bins_y)
    }

    #[inline]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Zero every bin. Bounds and resolution are unchanged.
    pub fn clear(&mut self) {
        self.counts.fill(0);
    }

    /// Flattened bin index for `(x, y)`, or `None` outside the domain.
    ///
    /// The domain is inclusive, so `x == x_max` lands in the last column
    /// rather than one past it.
    #[inline]
    pub fn bin_index(&self, x: f64, y: f64) -> Option<usize> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let b = &self.bounds;
        let i = (self.bins_x as f64 * (x - b.x_min) / b.width()).floor() as usize;
        let j = (self.bins_y as f64 * (y - b.y_min) / b.height()).floor() as usize;
        let i = i.min(self.bins_x - 1);
        let j = j.min(self.bins_y - 1);
        Some(j * self.bins_x + i)
    }

    /// Count one visit at `(x, y)`. Out-of-domain coordinates are dropped.
    #[inline]
    pub fn fill(&mut self, x: f64, y: f64) {
        if let Some(index) = self.bin_index(x, y) {
            self.counts[index] += 1;
        }
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Each bin divided by the largest bin, in `[0, 1]`.
    ///
    /// An empty histogram normalizes to all zeros.
    pub fn normalized(&self) -> Vec<f64> {
        let max = self.max_count();
        if max == 0 {
            return vec![0.0; self.counts.len()];
        }
        let max = max as f64;
        self.counts.iter().map(|&c| c as f64 / max).collect()
    }

    /// Add the counts of a same-shaped histogram into this one.
    ///
    /// Lets parallel workers fill private partial histograms and combine
    /// them afterwards; accumulation is commutative so order is irrelevant.
    pub fn merge(&mut self, other: &Histogram2D) -> crate::Result<()> {
        if self.bins() != other.bins() || self.bounds != other.bounds {
            return Err(CoreError::ShapeMismatch {
                left_x: self.bins_x,
                left_y: self.bins_y,
                right_x: other.bins_x,
                right_y: other.bins_y,
            });
        }
        for (dst, src) in self.counts.iter_mut().zip(&other.counts) {
            *dst += src;
        }
        Ok(())
    }
}
