use std::path::Path;

use opencv::core::{Rect as CvRect, Size, Vector};
use opencv::objdetect::CascadeClassifier;
use opencv::prelude::*;

use crate::detection::domain::eye_detector::EyeDetector;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::cascade_resolver::CascadeResolveError;
use crate::shared::frame::Frame;
use crate::shared::mat_convert::frame_to_mat;
use crate::shared::rect::Rect;

/// `detectMultiScale` tuning for one classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// Smallest object reported, `(0, 0)` for no limit.
    pub min_size: (i32, i32),
}

impl CascadeParams {
    pub fn new(scale_factor: f64, min_neighbors: i32) -> Self {
        Self {
            scale_factor,
            min_neighbors,
            min_size: (0, 0),
        }
    }
}

/// Pretrained OpenCV Haar cascade.
///
/// The same type serves as face detector (frontal-face cascade) and eye
/// detector (eye cascade); which one it is depends on the XML loaded.
pub struct HaarCascadeDetector {
    classifier: CascadeClassifier,
    params: CascadeParams,
}

impl HaarCascadeDetector {
    pub fn load(path: &Path, params: CascadeParams) -> Result<Self, CascadeResolveError> {
        let load_err = |reason: String| CascadeResolveError::Load {
            path: path.to_path_buf(),
            reason,
        };
        let path_str = path
            .to_str()
            .ok_or_else(|| load_err("path is not valid UTF-8".to_string()))?;
        let classifier = CascadeClassifier::new(path_str).map_err(|e| load_err(e.to_string()))?;
        if classifier.empty().map_err(|e| load_err(e.to_string()))? {
            return Err(load_err("classifier is empty".to_string()));
        }
        log::debug!("Loaded cascade {}", path.display());
        Ok(Self { classifier, params })
    }

    fn detect(&mut self, gray: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        if !gray.is_grayscale() {
            return Err("cascade detection expects a grayscale frame".into());
        }
        let mat = frame_to_mat(gray)?;
        let (min_w, min_h) = self.params.min_size;
        let mut objects = Vector::<CvRect>::new();
        self.classifier.detect_multi_scale(
            &mat,
            &mut objects,
            self.params.scale_factor,
            self.params.min_neighbors,
            0,
            Size::new(min_w, min_h),
            Size::new(0, 0),
        )?;
        Ok(objects
            .iter()
            .map(|r| Rect::new(r.x, r.y, r.width, r.height))
            .collect())
    }
}

impl FaceDetector for HaarCascadeDetector {
    fn detect_faces(&mut self, gray: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        self.detect(gray)
    }
}

impl EyeDetector for HaarCascadeDetector {
    fn detect_eyes(&mut self, face: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        self.detect(face)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_fails() {
        let result = HaarCascadeDetector::load(
            Path::new("/nonexistent/haarcascade_eye.xml"),
            CascadeParams::new(1.1, 3),
        );
        assert!(matches!(result, Err(CascadeResolveError::Load { .. })));
    }

    #[test]
    fn test_load_garbage_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        std::fs::write(&path, "not a cascade").unwrap();
        assert!(HaarCascadeDetector::load(&path, CascadeParams::new(1.3, 5)).is_err());
    }

    #[test]
    fn test_params_default_min_size_unbounded() {
        let p = CascadeParams::new(1.3, 5);
        assert_eq!(p.min_size, (0, 0));
    }
}
