use egui::{Rect, Vec2};

// Largest square centred inside `available`, so the sphere keeps its shape
// whichever way the window is stretched.
pub fn letterbox(available: Rect) -> Rect {
    let side = available.width().min(available.height()).max(0.0);
    Rect::from_center_size(available.center(), Vec2::splat(side))
}

// Width over height, falling back to 1.0 while the area is collapsed
// (minimised window, zero-height panel).
pub fn aspect_ratio(rect: Rect) -> f32 {
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        1.0
    } else {
        rect.width() / rect.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_letterbox_wide_area() {
        let area = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(640.0, 400.0));
        let square = letterbox(area);
        assert_eq!(square.width(), 400.0);
        assert_eq!(square.height(), 400.0);
        assert_eq!(square.min, pos2(120.0, 0.0));
        assert_eq!(square.center(), area.center());
    }

    #[test]
    fn test_letterbox_tall_area() {
        let area = Rect::from_min_size(pos2(10.0, 20.0), Vec2::new(300.0, 500.0));
        let square = letterbox(area);
        assert_eq!(square.size(), Vec2::splat(300.0));
        assert_eq!(square.min, pos2(10.0, 120.0));
        assert!(area.contains_rect(square));
    }

    #[test]
    fn test_letterbox_square_is_unchanged() {
        let area = Rect::from_min_size(pos2(5.0, 5.0), Vec2::splat(256.0));
        assert_eq!(letterbox(area), area);
    }

    #[test]
    fn test_aspect_ratio() {
        let area = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(640.0, 400.0));
        assert_eq!(aspect_ratio(area), 1.6);
        assert_eq!(aspect_ratio(letterbox(area)), 1.0);

        let collapsed = Rect::from_min_size(pos2(0.0, 0.0), Vec2::new(640.0, 0.0));
        assert_eq!(aspect_ratio(collapsed), 1.0);
    }
}
