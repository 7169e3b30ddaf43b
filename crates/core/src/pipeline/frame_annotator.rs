use ndarray::s;

use crate::pipeline::frame_processor::FrameOutcome;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

pub type Rgb = [u8; 3];

pub const GREEN: Rgb = [0, 255, 0];
pub const BLUE: Rgb = [0, 0, 255];
pub const RED: Rgb = [255, 0, 0];

const REGION_THICKNESS: i32 = 4;
const EYE_THICKNESS: i32 = 2;

/// Draws the crop region and eyes of `outcome` onto the preview frame.
///
/// The crop outline is green while a capture is armed and blue otherwise.
/// Face-relative rectangles are shifted by the face origin.
pub fn annotate(frame: &mut Frame, outcome: &FrameOutcome, armed: bool) {
    let (face, eyes, region) = match outcome {
        FrameOutcome::NoFace | FrameOutcome::InsufficientEyes { .. } => return,
        FrameOutcome::DegenerateRegion { face, eyes, region } => (face, eyes, region),
        FrameOutcome::Detected(obs) => (&obs.face, &obs.eyes, &obs.region),
    };

    let region_color = if armed { GREEN } else { BLUE };
    draw_rect(
        frame,
        &region.offset(face.x, face.y),
        region_color,
        REGION_THICKNESS,
    );
    for eye in eyes.iter() {
        draw_rect(frame, &eye.offset(face.x, face.y), RED, EYE_THICKNESS);
    }
}

/// Draws the outline of `rect`, `thickness` pixels wide on the inside.
///
/// Parts outside the frame are skipped. Gray frames receive the luma of
/// `color`.
pub fn draw_rect(frame: &mut Frame, rect: &Rect, color: Rgb, thickness: i32) {
    if !rect.has_area() || thickness <= 0 {
        return;
    }
    let t = thickness.min(rect.width).min(rect.height);
    let bands = [
        Rect::new(rect.x, rect.y, rect.width, t),
        Rect::new(rect.x, rect.bottom() - t, rect.width, t),
        Rect::new(rect.x, rect.y, t, rect.height),
        Rect::new(rect.right() - t, rect.y, t, rect.height),
    ];
    for band in &bands {
        fill_rect(frame, band, color);
    }
}

fn fill_rect(frame: &mut Frame, rect: &Rect, color: Rgb) {
    let Some(r) = rect.clip_to(frame.width(), frame.height()) else {
        return;
    };
    let pixel = pixel_for(frame.channels(), color);
    let mut view = frame.as_ndarray_mut();
    let mut area = view.slice_mut(s![
        r.y as usize..r.bottom() as usize,
        r.x as usize..r.right() as usize,
        ..
    ]);
    for mut px in area.lanes_mut(ndarray::Axis(2)) {
        for (dst, src) in px.iter_mut().zip(pixel.iter()) {
            *dst = *src;
        }
    }
}

fn pixel_for(channels: u8, color: Rgb) -> Vec<u8> {
    if channels == 1 {
        let luma = 0.299 * color[0] as f64 + 0.587 * color[1] as f64 + 0.114 * color[2] as f64;
        vec![luma.round() as u8]
    } else {
        color.to_vec()
    }
}
