use thiserror::Error;

/// Fatal frame-source failures.
///
/// "No face this frame" is never one of these; it is a normal frame outcome.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("failed to read frame {index}: {reason}")]
    ReadFailed { index: usize, reason: String },
    #[error("frame source was not opened")]
    NotOpened,
}
