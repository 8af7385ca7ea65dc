//! PNG export with embedded run metadata (tEXt chunks).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::debug;

use buddhabrot_core::{Bounds, Simulation, Stage};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;

/// Metadata to embed in an exported PNG as tEXt chunks.
#[derive(Debug, Clone)]
pub struct ExportMetadata {
    pub stage: Stage,
    pub iteration: u64,
    pub view_bounds: Bounds,
    pub seed_bounds: Bounds,
    pub seed_points: (usize, usize),
    pub max_iterations_preliminary: u64,
    pub max_iterations_final: u64,
}

impl ExportMetadata {
    /// Capture the current state of a simulation.
    pub fn from_simulation(sim: &Simulation) -> Self {
        let config = sim.config();
        Self {
            stage: sim.stage(),
            iteration: sim.iterations(),
            view_bounds: config.view_bounds,
            seed_bounds: config.seed_bounds,
            seed_points: (config.seed_points_x, config.seed_points_y),
            max_iterations_preliminary: config.max_iterations_preliminary,
            max_iterations_final: config.max_iterations_final,
        }
    }

    fn description(&self) -> String {
        format!(
            "Buddhabrot - Stage: {}, Iteration: {}, View: {}",
            self.stage, self.iteration, self.view_bounds
        )
    }

    fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("Buddhabrot.Stage".into(), self.stage.to_string()),
            ("Buddhabrot.Iteration".into(), self.iteration.to_string()),
            ("Buddhabrot.ViewBounds".into(), self.view_bounds.to_string()),
            ("Buddhabrot.SeedBounds".into(), self.seed_bounds.to_string()),
            (
                "Buddhabrot.SeedPoints".into(),
                format!("{}x{}", self.seed_points.0, self.seed_points.1),
            ),
            (
                "Buddhabrot.MaxIterationsPreliminary".into(),
                self.max_iterations_preliminary.to_string(),
            ),
            (
                "Buddhabrot.MaxIterationsFinal".into(),
                self.max_iterations_final.to_string(),
            ),
        ]
    }
}

/// Write a composited buffer as a PNG file with embedded run metadata.
///
/// Uses the `png` crate directly so custom tEXt chunks can be added.
pub fn export_png(
    buffer: &RenderBuffer,
    path: &Path,
    metadata: &ExportMetadata,
) -> crate::Result<()> {
    if buffer.width == 0 || buffer.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: buffer.width as usize,
            height: buffer.height as usize,
        });
    }

    let file = File::create(path).map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, buffer.width, buffer.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    encoder.add_text_chunk("Software".to_string(), "buddhabrot".to_string())?;
    encoder.add_text_chunk("Description".to_string(), metadata.description())?;
    for (key, value) in metadata.pairs() {
        encoder.add_text_chunk(key, value)?;
    }

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&buffer.pixels)?;
    png_writer.finish()?;

    debug!(
        width = buffer.width,
        height = buffer.height,
        path = %path.display(),
        "Exported PNG"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn metadata() -> ExportMetadata {
        ExportMetadata {
            stage: Stage::Final,
            iteration: 42,
            view_bounds: Bounds::MANDELBROT,
            seed_bounds: Bounds::MANDELBROT,
            seed_points: (16, 16),
            max_iterations_preliminary: 100,
            max_iterations_final: 200,
        }
    }

    #[test]
    fn export_creates_valid_png() {
        let buffer = RenderBuffer::new(4, 4);
        let dir = std::env::temp_dir().join("buddhabrot_test_export");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_export.png");
        export_png(&buffer, &path, &metadata()).expect("export should succeed");

        let mut file = File::open(&path).expect("file should exist");
        let mut header = [0u8; 8];
        file.read_exact(&mut header).expect("should read header");
        assert_eq!(&header, b"\x89PNG\r\n\x1a\n", "valid PNG signature");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_embeds_text_chunks() {
        let buffer = RenderBuffer::new(2, 2);
        let dir = std::env::temp_dir().join("buddhabrot_test_export_meta");
        let _ = std::fs::create_dir_all(&dir);
        let path = dir.join("test_meta.png");
        export_png(&buffer, &path, &metadata()).expect("export should succeed");

        let decoder = png::Decoder::new(File::open(&path).expect("file should exist"));
        let reader = decoder.read_info().expect("should read info");
        let texts = &reader.info().uncompressed_latin1_text;
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Software" && t.text == "buddhabrot"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Buddhabrot.Stage" && t.text == "Final"));
        assert!(texts
            .iter()
            .any(|t| t.keyword == "Buddhabrot.MaxIterationsFinal" && t.text == "200"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let buffer = RenderBuffer::new(2, 2);
        let path = std::env::temp_dir()
            .join("buddhabrot_no_such_dir")
            .join("nested")
            .join("out.png");
        assert!(matches!(
            export_png(&buffer, &path, &metadata()),
            Err(RenderError::Io { .. })
        ));
    }
}
