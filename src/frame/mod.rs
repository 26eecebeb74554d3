use image::RgbImage;
use std::error::Error;
use std::fmt;
use std::path::Path;

/// Pixel-difference counts at or below this are attributed to sensor
/// noise and compression artifacts, not an actual scene change.
const DIFF_PIXEL_THRESHOLD: usize = 10;

/// A decoded snapshot, reduced to an RGB pixel grid.
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub fn decode(bytes: &[u8]) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            image: image::load_from_memory(bytes)?.to_rgb8(),
        })
    }

    /// Average B/W light level of the frame, in percent.
    pub fn light_percent(&self) -> f64 {
        let pixels = (self.image.width() * self.image.height()) as f64;
        if pixels == 0.0 {
            return 0.0;
        }

        let total: f64 = self
            .image
            .pixels()
            .map(|p| (p.0[0] as f64 + p.0[1] as f64 + p.0[2] as f64) / 3.0)
            .sum();

        total / pixels / 255.0 * 100.0
    }

    /// Whether this frame shows a different scene than `other`, by exact
    /// per-pixel comparison. Frames of different dimensions always differ.
    pub fn differs_from(&self, other: &Frame) -> bool {
        if self.image.dimensions() != other.image.dimensions() {
            return true;
        }

        let diff = self
            .image
            .pixels()
            .zip(other.image.pixels())
            .filter(|(a, b)| a != b)
            .count();

        log::debug!("Number of different pixels: {}", diff);

        diff > DIFF_PIXEL_THRESHOLD
    }

    /// Encode to disk; the format is chosen by the file extension.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        self.image.save(path)?;
        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.image.dimensions();
        f.debug_struct("Frame")
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}
