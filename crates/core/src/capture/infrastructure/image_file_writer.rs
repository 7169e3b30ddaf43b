use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, RgbImage};

use crate::capture::domain::image_writer::ImageWriter;
use crate::shared::frame::Frame;

/// Writes a frame to an image file using the `image` crate.
///
/// Gray and RGB frames are both supported. The optional `size` resizes with
/// nearest-neighbour sampling so upscaled samples keep hard pixel edges.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(
        &self,
        path: &Path,
        frame: &Frame,
        size: Option<(u32, u32)>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = frame.data().to_vec();
        let img = match frame.channels() {
            1 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(frame.width(), frame.height(), data)
                    .ok_or("Failed to create image from frame data")?,
            ),
            3 => DynamicImage::ImageRgb8(
                RgbImage::from_raw(frame.width(), frame.height(), data)
                    .ok_or("Failed to create image from frame data")?,
            ),
            n => return Err(format!("Unsupported channel count: {n}").into()),
        };

        let img = match size {
            Some((w, h)) => img.resize_exact(w, h, FilterType::Nearest),
            None => img,
        };

        img.save(path)?;
        Ok(())
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}
