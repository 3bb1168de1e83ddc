//! The pixel buffer passed between pipeline stages.

/// A decoded image with RGBA pixel data.
///
/// Each pipeline stage borrows its input and returns a freshly allocated
/// `Raster`; nothing is mutated across stage boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Bytes per pixel.
    pub const CHANNELS: usize = 4;

    /// Create a new Raster with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * Self::CHANNELS,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A raster filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * Self::CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Raster from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    ///
    /// Returns `None` when the buffer length does not match the dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// The RGBA value at `(x, y)`, or `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        let px = self.pixels.get(idx..idx + Self::CHANNELS)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// True when the buffer length matches `width * height * 4`.
    pub fn is_well_formed(&self) -> bool {
        !self.is_empty()
            && self.pixels.len() == self.width as usize * self.height as usize * Self::CHANNELS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let img = Raster::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(img.width, 100);
        assert_eq!(img.height, 50);
        assert_eq!(img.pixels.len(), 5000 * 4);
        assert!(!img.is_empty());
        assert!(img.is_well_formed());
    }

    #[test]
    fn test_raster_empty() {
        let img = Raster::new(0, 0, vec![]);
        assert!(img.is_empty());
        assert!(!img.is_well_formed());
    }

    #[test]
    fn test_malformed_buffer() {
        let img = Raster {
            width: 4,
            height: 4,
            pixels: vec![0u8; 10],
        };
        assert!(!img.is_well_formed());
        assert!(img.to_rgba_image().is_none());
    }

    #[test]
    fn test_filled_and_pixel_lookup() {
        let img = Raster::filled(3, 2, [1, 2, 3, 255]);
        assert_eq!(img.pixels.len(), 24);
        assert_eq!(img.pixel(2, 1), Some([1, 2, 3, 255]));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_rgba_image_round_trip() {
        let img = Raster::filled(5, 7, [9, 8, 7, 6]);
        let rgba = img.to_rgba_image().unwrap();
        assert_eq!(rgba.dimensions(), (5, 7));
        assert_eq!(Raster::from_rgba_image(rgba), img);
    }
}
