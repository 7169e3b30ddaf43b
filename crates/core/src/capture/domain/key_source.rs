use crate::shared::constants::{KEY_CAPTURE, KEY_QUIT};

/// Polls the keyboard once per frame.
pub trait KeySource {
    /// Waits up to `wait_ms` for a key press and returns it, if any.
    fn poll_key(&mut self, wait_ms: i32) -> Result<Option<char>, Box<dyn std::error::Error>>;
}

/// What a recognized key press asks the capture loop to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Quit,
    Capture,
}

impl KeyCommand {
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            KEY_QUIT => Some(KeyCommand::Quit),
            KEY_CAPTURE => Some(KeyCommand::Capture),
            _ => None,
        }
    }
}
