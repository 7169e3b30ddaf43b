use crate::detection::domain::eye_detector::EyeDetector;
use crate::detection::domain::eye_pair::EyePair;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// A face with two eyes and a usable crop.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceObservation {
    /// Face rectangle in frame coordinates.
    pub face: Rect,
    /// Eyes relative to `face`.
    pub eyes: EyePair,
    /// Derived crop relative to `face`, before clipping.
    pub region: Rect,
    /// Grayscale pixels of `region` clipped to the face.
    pub crop: Frame,
}

/// Result of processing one frame. Only `Detected` carries a crop.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutcome {
    NoFace,
    InsufficientEyes { face: Rect, eyes_found: usize },
    DegenerateRegion { face: Rect, eyes: EyePair, region: Rect },
    Detected(FaceObservation),
}

impl FrameOutcome {
    pub fn face(&self) -> Option<&Rect> {
        match self {
            FrameOutcome::NoFace => None,
            FrameOutcome::InsufficientEyes { face, .. }
            | FrameOutcome::DegenerateRegion { face, .. } => Some(face),
            FrameOutcome::Detected(obs) => Some(&obs.face),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FrameOutcome::NoFace => "no_face",
            FrameOutcome::InsufficientEyes { .. } => "insufficient_eyes",
            FrameOutcome::DegenerateRegion { .. } => "degenerate_region",
            FrameOutcome::Detected(_) => "detected",
        }
    }
}

/// Per-frame decision logic: face → eyes → crop.
///
/// Only the first reported face is used. Detector errors propagate; a frame
/// without a face or without two eyes is a normal outcome.
pub struct FrameProcessor {
    face_detector: Box<dyn FaceDetector>,
    eye_detector: Box<dyn EyeDetector>,
}

impl FrameProcessor {
    pub fn new(face_detector: Box<dyn FaceDetector>, eye_detector: Box<dyn EyeDetector>) -> Self {
        Self {
            face_detector,
            eye_detector,
        }
    }

    pub fn process(&mut self, frame: &Frame) -> Result<FrameOutcome, Box<dyn std::error::Error>> {
        let gray = frame.to_grayscale();

        let faces = self.face_detector.detect_faces(&gray)?;
        let Some(face_gray) = faces.first().and_then(|face| {
            let clipped = face.clip_to(gray.width(), gray.height())?;
            Some((clipped, gray.crop(&clipped)?))
        }) else {
            return Ok(FrameOutcome::NoFace);
        };
        let (face, face_pixels) = face_gray;

        let eyes = self.eye_detector.detect_eyes(&face_pixels)?;
        let Some(pair) = EyePair::from_detections(&eyes) else {
            return Ok(FrameOutcome::InsufficientEyes {
                face,
                eyes_found: eyes.len(),
            });
        };

        let region = pair.crop_region();
        let crop = if region.has_area() {
            face_pixels.crop(&region)
        } else {
            None
        };

        Ok(match crop {
            Some(crop) => FrameOutcome::Detected(FaceObservation {
                face,
                eyes: pair,
                region,
                crop,
            }),
            None => FrameOutcome::DegenerateRegion {
                face,
                eyes: pair,
                region,
            },
        })
    }
}
