use serde::{Deserialize, Serialize};

/// Playable rectangle inside the canvas, in canvas coordinates (y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtBounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl CourtBounds {
    /// Inset the canvas by `margin_x_ratio * width` horizontally and
    /// `margin_y_ratio * height` vertically.
    pub fn compute(width: f64, height: f64, margin_x_ratio: f64, margin_y_ratio: f64) -> Self {
        let mx = width * margin_x_ratio;
        let my = height * margin_y_ratio;
        Self {
            left: mx,
            right: width - mx,
            top: my,
            bottom: height - my,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::approx;

    #[test]
    fn insets_by_margin_ratios() {
        let b = CourtBounds::compute(800.0, 480.0, 0.02, 0.03);
        assert!(approx(b.left, 16.0));
        assert!(approx(b.right, 784.0));
        assert!(approx(b.top, 14.4));
        assert!(approx(b.bottom, 465.6));
        let (cx, cy) = b.center();
        assert!(approx(cx, 400.0) && approx(cy, 240.0));
    }

    #[test]
    fn zero_margins_cover_the_canvas() {
        let b = CourtBounds::compute(640.0, 360.0, 0.0, 0.0);
        assert_eq!(b.width(), 640.0);
        assert_eq!(b.height(), 360.0);
    }
}
