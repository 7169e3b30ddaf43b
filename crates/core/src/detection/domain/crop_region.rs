use crate::shared::rect::Rect;

/// Crop half-width as a multiple of the inter-eye distance.
pub const HALF_WIDTH_FACTOR: f64 = 0.8;

/// Crop side length as a multiple of the inter-eye distance.
pub const SIDE_FACTOR: f64 = 1.6;

/// Upward shift of the crop top from the eye midpoint, in eye distances.
pub const VERTICAL_OFFSET_FACTOR: f64 = 0.2;

/// Derives a square face crop from two eye rectangles.
///
/// Both eyes must be in the same (face-relative) coordinates; the result is
/// in those coordinates too. Only the horizontal distance between the eye
/// centers is used, so the eyes are assumed to be roughly level. The order
/// of `first` and `second` does not matter.
///
/// The crop may start at negative coordinates or run past the face. Identical
/// eye centers give a zero-size crop at the shared center. Callers clip and
/// check [`Rect::has_area`] before indexing pixels.
///
/// Coordinates are rounded half away from zero (`f64::round`), so `-0.5`
/// becomes `-1`, not the banker's-rounded `0`.
pub fn derive_crop_region(first: &Rect, second: &Rect) -> Rect {
    let (c1x, c1y) = first.center();
    let (c2x, c2y) = second.center();

    let eye_distance = (c1x - c2x).abs();
    let center_x = (c1x + c2x) / 2.0;
    let center_y = (c1y + c2y) / 2.0;

    let side = (SIDE_FACTOR * eye_distance).round() as i32;

    Rect {
        x: (center_x - HALF_WIDTH_FACTOR * eye_distance).round() as i32,
        y: (center_y - VERTICAL_OFFSET_FACTOR * eye_distance).round() as i32,
        width: side,
        height: side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_half_pixel_rounds_away_from_zero() {
        // centers (1, 1) and (6, 1): x = 3.5 - 4.0 = -0.5
        let region = derive_crop_region(&Rect::new(0, 0, 2, 2), &Rect::new(5, 0, 2, 2));
        assert_eq!(region, Rect::new(-1, 0, 8, 8));
    }

    #[test]
    fn test_reference_geometry() {
        // distance 40, midpoint (25, 5)
        let region = derive_crop_region(&Rect::new(0, 0, 10, 10), &Rect::new(40, 0, 10, 10));
        assert_eq!(region, Rect::new(-7, -3, 64, 64));
    }

    #[test]
    fn test_identical_eyes_degenerate_to_zero_size() {
        let eye = Rect::new(12, 30, 8, 8);
        let region = derive_crop_region(&eye, &eye);
        assert_eq!(region.width, 0);
        assert_eq!(region.height, 0);
        assert!(!region.has_area());
        // collapses onto the shared center
        assert_eq!((region.x, region.y), (16, 34));
    }

    #[test]
    fn test_vertical_offset_of_eyes_is_ignored_for_size() {
        let level = derive_crop_region(&Rect::new(0, 20, 10, 10), &Rect::new(40, 20, 10, 10));
        let tilted = derive_crop_region(&Rect::new(0, 0, 10, 10), &Rect::new(40, 40, 10, 10));
        assert_eq!(level.width, tilted.width);
        assert_eq!(level.y, tilted.y);
    }

    #[test]
    fn test_crop_is_centered_on_eye_midpoint() {
        let region = derive_crop_region(&Rect::new(100, 50, 20, 20), &Rect::new(200, 50, 20, 20));
        // midpoint x = 160, distance 100 → [80, 240)
        assert_eq!(region.x, 80);
        assert_eq!(region.width, 160);
        assert_eq!(region.x + region.width / 2, 160);
        // top at 60 - 20
        assert_eq!(region.y, 40);
    }

    #[rstest]
    #[case(Rect::new(0, 0, 10, 10), Rect::new(40, 0, 10, 10))]
    #[case(Rect::new(3, 7, 11, 9), Rect::new(29, 4, 13, 12))]
    #[case(Rect::new(55, 18, 21, 21), Rect::new(12, 20, 19, 19))]
    #[case(Rect::new(0, 0, 1, 1), Rect::new(1, 1, 1, 1))]
    #[case(Rect::new(8, 8, 0, 0), Rect::new(8, 8, 0, 0))]
    fn test_output_is_square(#[case] a: Rect, #[case] b: Rect) {
        let region = derive_crop_region(&a, &b);
        assert_eq!(region.width, region.height);
    }

    #[rstest]
    #[case(Rect::new(0, 0, 10, 10), Rect::new(40, 0, 10, 10))]
    #[case(Rect::new(3, 7, 11, 9), Rect::new(29, 4, 13, 12))]
    #[case(Rect::new(55, 18, 21, 21), Rect::new(12, 20, 19, 19))]
    fn test_swapping_eyes_is_symmetric(#[case] a: Rect, #[case] b: Rect) {
        assert_eq!(derive_crop_region(&a, &b), derive_crop_region(&b, &a));
    }

    #[rstest]
    #[case(2.0)]
    #[case(3.0)]
    #[case(5.0)]
    fn test_width_scales_with_eye_positions(#[case] k: f64) {
        let a = Rect::new(10, 10, 10, 10);
        let b = Rect::new(60, 10, 10, 10);
        let base = derive_crop_region(&a, &b);
        let scaled = derive_crop_region(&a.scale_position(k), &b.scale_position(k));
        // base distance 50 → side 80
        assert_eq!(base.width, 80);
        assert_eq!(scaled.width, (base.width as f64 * k).round() as i32);
    }
}
