/// Axis-aligned rectangle in pixel units.
///
/// Coordinates are relative to whatever origin the producer uses: full-frame
/// for face detections, face-relative for eye detections and crop regions.
/// `x`/`y` may be negative for derived regions that extend past their
/// enclosing rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point, kept fractional so odd sizes do not lose half a pixel.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Scales the position by `k`, leaving the size untouched.
    pub fn scale_position(&self, k: f64) -> Rect {
        Rect {
            x: (self.x as f64 * k).round() as i32,
            y: (self.y as f64 * k).round() as i32,
            ..*self
        }
    }

    /// Intersection with `[0, width) x [0, height)`.
    ///
    /// Returns `None` when nothing of the rectangle lies inside the bounds.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<Rect> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = self.right().min(width as i32);
        let y2 = self.bottom().min(height as i32);

        let clipped = Rect::new(x1, y1, x2 - x1, y2 - y1);
        clipped.has_area().then_some(clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_center_of_even_rect() {
        let (cx, cy) = Rect::new(0, 0, 10, 20).center();
        assert_relative_eq!(cx, 5.0);
        assert_relative_eq!(cy, 10.0);
    }

    #[test]
    fn test_center_keeps_half_pixels() {
        let (cx, cy) = Rect::new(3, 4, 5, 7).center();
        assert_relative_eq!(cx, 5.5);
        assert_relative_eq!(cy, 7.5);
    }

    #[rstest]
    #[case::positive(Rect::new(0, 0, 1, 1), true)]
    #[case::zero_width(Rect::new(0, 0, 0, 5), false)]
    #[case::zero_height(Rect::new(0, 0, 5, 0), false)]
    #[case::negative(Rect::new(0, 0, -3, 5), false)]
    fn test_has_area(#[case] rect: Rect, #[case] expected: bool) {
        assert_eq!(rect.has_area(), expected);
    }

    #[test]
    fn test_offset_moves_origin_only() {
        let r = Rect::new(-7, -3, 64, 64).offset(100, 50);
        assert_eq!(r, Rect::new(93, 47, 64, 64));
    }

    #[test]
    fn test_scale_position_keeps_size() {
        let r = Rect::new(40, 10, 10, 10).scale_position(2.0);
        assert_eq!(r, Rect::new(80, 20, 10, 10));
    }

    #[test]
    fn test_clip_inside_is_identity() {
        let r = Rect::new(10, 10, 20, 20);
        assert_eq!(r.clip_to(100, 100), Some(r));
    }

    #[test]
    fn test_clip_negative_origin() {
        // [-7, 57) x [-3, 61) inside a 50x50 face
        let r = Rect::new(-7, -3, 64, 64);
        assert_eq!(r.clip_to(50, 50), Some(Rect::new(0, 0, 50, 50)));
    }

    #[test]
    fn test_clip_partially_outside_right_bottom() {
        let r = Rect::new(40, 45, 20, 20);
        assert_eq!(r.clip_to(50, 50), Some(Rect::new(40, 45, 10, 5)));
    }

    #[rstest]
    #[case::left_of_bounds(Rect::new(-20, 0, 10, 10))]
    #[case::below_bounds(Rect::new(0, 60, 10, 10))]
    #[case::touching_edge(Rect::new(50, 0, 10, 10))]
    #[case::empty(Rect::new(5, 5, 0, 0))]
    fn test_clip_outside_is_none(#[case] rect: Rect) {
        assert_eq!(rect.clip_to(50, 50), None);
    }
}
