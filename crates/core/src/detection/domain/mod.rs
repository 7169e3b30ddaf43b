pub mod crop_region;
pub mod eye_detector;
pub mod eye_pair;
pub mod face_detector;
