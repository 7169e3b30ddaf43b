//! Conversions between [`Frame`] and OpenCV `Mat`.
//!
//! Frames are RGB or gray; OpenCV works in BGR. The channel swap happens here
//! and nowhere else.

use opencv::core::{Mat, Vec3b, VecN, CV_8UC3};
use opencv::prelude::*;

use crate::shared::frame::Frame;

/// Copies `frame` into an owned `Mat` (gray or BGR).
pub(crate) fn frame_to_mat(frame: &Frame) -> Result<Mat, Box<dyn std::error::Error>> {
    let rows = frame.height() as usize;
    let cols = frame.width() as usize;
    match frame.channels() {
        1 => Ok(Mat::from_slice_rows_cols(frame.data(), rows, cols)?.try_clone()?),
        3 => {
            let pixels: Vec<Vec3b> = frame
                .data()
                .chunks_exact(3)
                .map(|px| VecN([px[2], px[1], px[0]]))
                .collect();
            Ok(Mat::from_slice_rows_cols(&pixels, rows, cols)?.try_clone()?)
        }
        n => Err(format!("unsupported channel count for OpenCV conversion: {n}").into()),
    }
}

pub(crate) fn bgr_mat_to_frame(
    mat: &Mat,
    index: usize,
) -> Result<Frame, Box<dyn std::error::Error>> {
    if mat.typ() != CV_8UC3 {
        return Err(format!("expected an 8-bit BGR image, got OpenCV type {}", mat.typ()).into());
    }

    let owned;
    let src = if mat.is_continuous() {
        mat
    } else {
        owned = mat.try_clone()?;
        &owned
    };

    let bytes = src.data_bytes()?;
    let mut data = Vec::with_capacity(bytes.len());
    for px in bytes.chunks_exact(3) {
        data.extend_from_slice(&[px[2], px[1], px[0]]);
    }

    Ok(Frame::new(
        data,
        src.cols() as u32,
        src.rows() as u32,
        3,
        index,
    ))
}
