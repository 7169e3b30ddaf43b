use ndarray::{ArrayView3, ArrayViewMut3};

use crate::shared::rect::Rect;

/// A captured frame or a crop of one: contiguous bytes in row-major order.
///
/// `channels` is 3 for RGB frames straight off a source and 1 for the
/// grayscale images the detectors and sampler work on.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_grayscale(&self) -> bool {
        self.channels == 1
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// BT.601 luma, the same weights OpenCV uses for `COLOR_RGB2GRAY`.
    ///
    /// Single-channel frames are returned as-is.
    pub fn to_grayscale(&self) -> Frame {
        if self.is_grayscale() {
            return self.clone();
        }
        let channels = self.channels as usize;
        let data = self
            .data
            .chunks_exact(channels)
            .map(|px| {
                let luma = 0.299 * px[0] as f64 + 0.587 * px[1] as f64 + 0.114 * px[2] as f64;
                luma.round().clamp(0.0, 255.0) as u8
            })
            .collect();
        Frame::new(data, self.width, self.height, 1, self.index)
    }

    /// Copies out the part of `rect` that lies inside the frame.
    ///
    /// Returns `None` when `rect` does not overlap the frame at all.
    pub fn crop(&self, rect: &Rect) -> Option<Frame> {
        let clipped = rect.clip_to(self.width, self.height)?;
        let x1 = clipped.x as usize;
        let y1 = clipped.y as usize;
        let x2 = clipped.right() as usize;
        let y2 = clipped.bottom() as usize;

        let channels = self.channels as usize;
        let row_bytes = self.width as usize * channels;
        let mut data = Vec::with_capacity((x2 - x1) * (y2 - y1) * channels);
        for row in y1..y2 {
            let start = row * row_bytes + x1 * channels;
            let end = row * row_bytes + x2 * channels;
            data.extend_from_slice(&self.data[start..end]);
        }

        Some(Frame::new(
            data,
            clipped.width as u32,
            clipped.height as u32,
            self.channels,
            self.index,
        ))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
