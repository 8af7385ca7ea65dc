use rayon::prelude::*;
use tracing::debug;

use buddhabrot_core::Snapshot;

use crate::buffer::{blend_over, RenderBuffer};
use crate::error::RenderError;
use crate::layer::Layer;

fn check_dimensions(width: usize, height: usize) -> crate::Result<(u32, u32)> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(RenderError::InvalidDimensions { width, height }),
    }
}

fn check_layer(values: &[f64], expected: usize) -> crate::Result<()> {
    if values.len() != expected {
        return Err(RenderError::LayerSize {
            expected,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Color a single normalized field with a layer's policy, without blending.
pub fn colorize_layer(
    layer: Layer,
    values: &[f64],
    width: usize,
    height: usize,
) -> crate::Result<RenderBuffer> {
    let (w, h) = check_dimensions(width, height)?;
    check_layer(values, width * height)?;

    let mut buffer = RenderBuffer::new(w, h);
    buffer
        .pixels
        .par_chunks_mut(4)
        .zip(values.par_iter())
        .for_each(|(pixel, &v)| pixel.copy_from_slice(&layer.color(v)));
    Ok(buffer)
}

/// Composite the three layers of a snapshot onto one opaque surface.
///
/// The Mandelbrot base is written directly; the trajectory overlays are
/// blended on top with source-over, red first, then blue.
pub fn composite(snapshot: &Snapshot) -> crate::Result<RenderBuffer> {
    let (width, height) = (snapshot.width, snapshot.height);
    let expected = width * height;
    check_layer(&snapshot.all_trajectories, expected)?;
    check_layer(&snapshot.diverged_trajectories, expected)?;

    let mut buffer = colorize_layer(Layer::MandelbrotSet, &snapshot.mandelbrot_set, width, height)?;
    buffer
        .pixels
        .par_chunks_mut(4)
        .zip(snapshot.all_trajectories.par_iter())
        .zip(snapshot.diverged_trajectories.par_iter())
        .for_each(|((pixel, &all), &diverged)| {
            blend_over(pixel, Layer::AllTrajectories.color(all));
            blend_over(pixel, Layer::DivergedTrajectories.color(diverged));
        });

    debug!(
        width,
        height,
        stage = %snapshot.stage,
        iteration = snapshot.iteration,
        "Composited snapshot"
    );
    Ok(buffer)
}
