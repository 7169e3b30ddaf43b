#[cfg(feature = "opencv")]
pub mod cascade_detector;
