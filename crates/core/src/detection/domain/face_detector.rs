use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Finds face rectangles in a grayscale frame.
///
/// Results are in full-frame coordinates. An empty result means no face this
/// frame; `Err` means the detector itself is unusable.
pub trait FaceDetector {
    fn detect_faces(&mut self, gray: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;
}
