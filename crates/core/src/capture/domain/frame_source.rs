use crate::shared::frame::Frame;

/// Produces sequential RGB frames from a camera or a recording.
pub trait FrameSource {
    /// Blocks until the next frame is available.
    ///
    /// `Ok(None)` marks the end of a finite source. A live device that fails
    /// to deliver a frame returns `Err`.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the underlying device or file. Must be safe to call twice.
    fn close(&mut self);
}
