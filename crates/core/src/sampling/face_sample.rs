use image::imageops::{self, FilterType};
use image::GrayImage;
use thiserror::Error;

use crate::shared::frame::Frame;

#[derive(Error, Debug, PartialEq)]
pub enum FaceSampleError {
    #[error("sample size must be > 0")]
    ZeroSize,
    #[error("crop has no pixels")]
    EmptyCrop,
    #[error("expected {expected} values for a {size}x{size} sample, got {actual}")]
    LengthMismatch {
        size: u32,
        expected: usize,
        actual: usize,
    },
}

/// Maps a gray level onto `[-1, 1)`.
pub fn normalize_pixel(pixel: u8) -> f32 {
    pixel as f32 / 128.0 - 1.0
}

/// Inverse of [`normalize_pixel`], saturating outside the gray range.
pub fn denormalize_value(value: f32) -> u8 {
    ((value + 1.0) * 128.0).round().clamp(0.0, 255.0) as u8
}

/// A square grayscale face patch stored as normalized floats, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceSample {
    size: u32,
    values: Vec<f32>,
}

impl FaceSample {
    pub fn new(size: u32, values: Vec<f32>) -> Result<Self, FaceSampleError> {
        if size == 0 {
            return Err(FaceSampleError::ZeroSize);
        }
        let expected = (size as usize) * (size as usize);
        if values.len() != expected {
            return Err(FaceSampleError::LengthMismatch {
                size,
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { size, values })
    }

    /// Resizes a face crop to `size x size` (bicubic) and normalizes it.
    ///
    /// Color crops are converted to gray first.
    pub fn from_crop(crop: &Frame, size: u32) -> Result<Self, FaceSampleError> {
        if size == 0 {
            return Err(FaceSampleError::ZeroSize);
        }
        if crop.width() == 0 || crop.height() == 0 {
            return Err(FaceSampleError::EmptyCrop);
        }

        let gray = crop.to_grayscale();
        let img = GrayImage::from_raw(gray.width(), gray.height(), gray.into_data())
            .ok_or(FaceSampleError::EmptyCrop)?;
        let resized = imageops::resize(&img, size, size, FilterType::CatmullRom);

        let values = resized.into_raw().into_iter().map(normalize_pixel).collect();
        Ok(Self { size, values })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Renders the sample back into a grayscale frame.
    pub fn to_frame(&self) -> Frame {
        let data = self.values.iter().copied().map(denormalize_value).collect();
        Frame::new(data, self.size, self.size, 1, 0)
    }

    /// Comma-separated values without a trailing separator or newline.
    pub fn to_csv_line(&self) -> String {
        let mut line = String::with_capacity(self.values.len() * 10);
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            line.push_str(&v.to_string());
        }
        line
    }
}
