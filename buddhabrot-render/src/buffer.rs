/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// RGBA of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }
}

/// Source-over blend of a straight-alpha `src` onto `dst` in place.
///
/// `dst` keeps its own alpha combined with the source's, so an opaque
/// destination stays opaque.
#[inline]
pub(crate) fn blend_over(dst: &mut [u8], src: [u8; 4]) {
    let a = src[3] as u32;
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        dst[c] = ((src[c] as u32 * a + dst[c] as u32 * inv + 127) / 255) as u8;
    }
    dst[3] = (a + (dst[3] as u32 * inv + 127) / 255) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = RenderBuffer::new(4, 4);
        assert_eq!(buf.pixels.len(), 4 * 4 * 4);
        for chunk in buf.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn blend_opaque_source_replaces() {
        let mut px = [10, 20, 30, 255];
        blend_over(&mut px, [255, 0, 0, 255]);
        assert_eq!(px, [255, 0, 0, 255]);
    }

    #[test]
    fn blend_transparent_source_is_noop() {
        let mut px = [10, 20, 30, 255];
        blend_over(&mut px, [255, 0, 0, 0]);
        assert_eq!(px, [10, 20, 30, 255]);
    }

    #[test]
    fn blend_half_alpha_mixes() {
        let mut px = [255, 255, 255, 255];
        blend_over(&mut px, [0, 0, 255, 128]);
        // (0·128 + 255·127 + 127) / 255 = 127
        assert_eq!(px, [127, 127, 255, 255]);
    }

    #[test]
    fn pixel_reads_row_major() {
        let mut buf = RenderBuffer::new(3, 2);
        let idx = (1 * 3 + 2) * 4;
        buf.pixels[idx..idx + 4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(buf.pixel(2, 1), [1, 2, 3, 4]);
    }
}
