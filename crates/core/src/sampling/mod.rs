pub mod face_sample;
