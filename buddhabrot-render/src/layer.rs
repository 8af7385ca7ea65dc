/// The three histogram layers and their fixed color/opacity policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Grayscale, opaque. Dense bins are dark.
    MandelbrotSet,
    /// Solid red whose alpha follows the density.
    AllTrajectories,
    /// Solid blue whose alpha follows the density.
    DivergedTrajectories,
}

impl Layer {
    /// RGBA for a normalized value `v` in `[0, 1]`.
    #[inline]
    pub fn color(self, v: f64) -> [u8; 4] {
        match self {
            Self::MandelbrotSet => {
                let g = to_byte(1.0 - v);
                [g, g, g, 255]
            }
            Self::AllTrajectories => [255, 0, 0, to_byte(v)],
            Self::DivergedTrajectories => [0, 0, 255, to_byte(v)],
        }
    }
}

/// `255 · v`, rounded and clamped to a byte. NaN maps to 0.
#[inline]
pub(crate) fn to_byte(v: f64) -> u8 {
    let scaled = (255.0 * v).round();
    if scaled.is_nan() {
        0
    } else {
        scaled.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mandelbrot_layer_is_inverted_grayscale() {
        assert_eq!(Layer::MandelbrotSet.color(0.0), [255, 255, 255, 255]);
        assert_eq!(Layer::MandelbrotSet.color(1.0), [0, 0, 0, 255]);
        assert_eq!(Layer::MandelbrotSet.color(0.5), [128, 128, 128, 255]);
    }

    #[test]
    fn overlays_carry_density_in_alpha() {
        assert_eq!(Layer::AllTrajectories.color(0.0), [255, 0, 0, 0]);
        assert_eq!(Layer::AllTrajectories.color(1.0), [255, 0, 0, 255]);
        assert_eq!(Layer::DivergedTrajectories.color(0.2), [0, 0, 255, 51]);
    }

    #[test]
    fn to_byte_clamps_out_of_range() {
        assert_eq!(to_byte(-0.5), 0);
        assert_eq!(to_byte(1.5), 255);
        assert_eq!(to_byte(f64::NAN), 0);
    }
}
