pub mod csv_sample_reader;
pub mod csv_sample_writer;
pub mod ffmpeg_frame_source;
#[cfg(feature = "opencv")]
pub mod highgui_display;
pub mod image_file_writer;
#[cfg(feature = "opencv")]
pub mod opencv_camera;
