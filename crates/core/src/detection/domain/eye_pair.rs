use crate::detection::domain::crop_region::derive_crop_region;
use crate::shared::rect::Rect;

/// The two eye detections used to derive a crop, in face-relative coordinates.
///
/// Kept in the order the detector reported them. No left/right sorting is
/// applied: the crop derivation is symmetric, so order never changes the
/// result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyePair {
    pub first: Rect,
    pub second: Rect,
}

impl EyePair {
    pub fn new(first: Rect, second: Rect) -> Self {
        Self { first, second }
    }

    /// Takes the first two detections; extra candidates are ignored.
    pub fn from_detections(eyes: &[Rect]) -> Option<Self> {
        match eyes {
            [first, second, ..] => Some(Self::new(*first, *second)),
            _ => None,
        }
    }

    pub fn crop_region(&self) -> Rect {
        derive_crop_region(&self.first, &self.second)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rect> {
        [&self.first, &self.second].into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fewer_than_two_detections() {
        assert!(EyePair::from_detections(&[]).is_none());
        assert!(EyePair::from_detections(&[Rect::new(0, 0, 5, 5)]).is_none());
    }

    #[test]
    fn test_takes_first_two_in_reported_order() {
        let eyes = [
            Rect::new(40, 0, 10, 10),
            Rect::new(0, 0, 10, 10),
            Rect::new(90, 90, 4, 4),
        ];
        let pair = EyePair::from_detections(&eyes).unwrap();
        assert_eq!(pair.first, eyes[0]);
        assert_eq!(pair.second, eyes[1]);
    }

    #[test]
    fn test_crop_region_delegates_to_derivation() {
        let pair = EyePair::new(Rect::new(0, 0, 10, 10), Rect::new(40, 0, 10, 10));
        assert_eq!(pair.crop_region(), Rect::new(-7, -3, 64, 64));
    }

    #[test]
    fn test_iter_yields_both() {
        let pair = EyePair::new(Rect::new(1, 2, 3, 4), Rect::new(5, 6, 7, 8));
        let all: Vec<_> = pair.iter().copied().collect();
        assert_eq!(all, vec![pair.first, pair.second]);
    }
}
