use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Finds eye rectangles inside a grayscale face crop.
///
/// Results are face-relative: measured from the crop's top-left corner.
pub trait EyeDetector {
    fn detect_eyes(&mut self, face: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;
}
