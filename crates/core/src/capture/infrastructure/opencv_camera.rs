use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use crate::capture::domain::capture_error::CaptureError;
use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;
use crate::shared::mat_convert::bgr_mat_to_frame;

/// Live camera capture through OpenCV `videoio`.
///
/// A camera never reaches end of stream; a failed read is an error.
pub struct OpencvCamera {
    capture: VideoCapture,
    device_index: i32,
    frame_index: usize,
    open: bool,
}

impl OpencvCamera {
    pub fn open(device_index: i32) -> Result<Self, CaptureError> {
        let unavailable = |reason: String| {
            CaptureError::DeviceUnavailable(format!("camera {device_index}: {reason}"))
        };
        let capture = VideoCapture::new(device_index, videoio::CAP_ANY)
            .map_err(|e| unavailable(e.to_string()))?;
        if !capture.is_opened().map_err(|e| unavailable(e.to_string()))? {
            return Err(unavailable("device could not be opened".to_string()));
        }
        log::info!("Opened camera {device_index}");
        Ok(Self {
            capture,
            device_index,
            frame_index: 0,
            open: true,
        })
    }
}

impl FrameSource for OpencvCamera {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if !self.open {
            return Err(CaptureError::NotOpened.into());
        }
        let read_failed = |reason: String| CaptureError::ReadFailed {
            index: self.frame_index,
            reason,
        };

        let mut mat = Mat::default();
        let grabbed = self
            .capture
            .read(&mut mat)
            .map_err(|e| read_failed(e.to_string()))?;
        if !grabbed || mat.empty() {
            return Err(read_failed(format!(
                "camera {} returned no frame",
                self.device_index
            ))
            .into());
        }

        let frame = bgr_mat_to_frame(&mat, self.frame_index)?;
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if self.open {
            if let Err(e) = self.capture.release() {
                log::warn!("Failed to release camera {}: {e}", self.device_index);
            }
            self.open = false;
        }
    }
}

impl Drop for OpencvCamera {
    fn drop(&mut self) {
        self.close();
    }
}
