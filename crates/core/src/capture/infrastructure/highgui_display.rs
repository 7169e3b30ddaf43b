use std::collections::HashSet;

use opencv::highgui;

use crate::capture::domain::frame_display::FrameDisplay;
use crate::capture::domain::key_source::KeySource;
use crate::shared::frame::Frame;
use crate::shared::mat_convert::frame_to_mat;

/// OpenCV highgui windows, created on first use.
///
/// Windows only repaint while [`HighguiKeys`] is polled.
#[derive(Default)]
pub struct HighguiDisplay {
    windows: HashSet<String>,
}

impl HighguiDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameDisplay for HighguiDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        if !self.windows.contains(window) {
            highgui::named_window(window, highgui::WINDOW_AUTOSIZE)?;
            self.windows.insert(window.to_string());
        }
        let mat = frame_to_mat(frame)?;
        highgui::imshow(window, &mat)?;
        Ok(())
    }

    fn close(&mut self) {
        if self.windows.is_empty() {
            return;
        }
        if let Err(e) = highgui::destroy_all_windows() {
            log::warn!("Failed to close windows: {e}");
        }
        self.windows.clear();
    }
}

/// Keyboard polling through `waitKey`.
#[derive(Default)]
pub struct HighguiKeys;

impl KeySource for HighguiKeys {
    fn poll_key(&mut self, wait_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>> {
        let code = highgui::wait_key(wait_ms)?;
        Ok(decode_key(code))
    }
}

impl Drop for HighguiDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

/// `waitKey` returns -1 for no key; some backends set modifier bits above
/// the low byte.
fn decode_key(code: i32) -> Option<char> {
    if code < 0 {
        return None;
    }
    let low = (code & 0xFF) as u8;
    (low != 0xFF).then_some(low as char)
}
