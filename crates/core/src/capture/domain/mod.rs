pub mod capture_error;
pub mod frame_display;
pub mod frame_source;
pub mod image_writer;
pub mod key_source;
pub mod sample_writer;
