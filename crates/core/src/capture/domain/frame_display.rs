use crate::shared::frame::Frame;

/// Renders frames into named windows.
pub trait FrameDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Tears down every window opened by [`FrameDisplay::show`].
    fn close(&mut self);
}
