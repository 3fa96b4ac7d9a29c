/// Circular region of interest, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub center_x: u32,
    pub center_y: u32,
    pub radius: u32,
}

impl Region {
    pub fn new(center_x: u32, center_y: u32, radius: u32) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Region centred on the image with radius `min(width, height) / divisor`,
    /// never smaller than one pixel.
    pub fn centered(width: u32, height: u32, divisor: u32) -> Self {
        let radius = (width.min(height) / divisor.max(1)).max(1);
        Self::new(width / 2, height / 2, radius)
    }
}

/// Grayscale intensity window. A value `v` is in range iff `lower < v < upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntensityWindow {
    pub lower: u8,
    pub upper: u8,
}

impl IntensityWindow {
    pub fn new(lower: u8, upper: u8) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: u8) -> bool {
        value > self.lower && value < self.upper
    }

    pub fn is_ordered(&self) -> bool {
        self.lower < self.upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_region_uses_midpoint_and_third_of_short_side() {
        let region = Region::centered(640, 480, 3);
        assert_eq!(region, Region::new(320, 240, 160));
    }

    #[test]
    fn test_centered_region_never_has_zero_radius() {
        let region = Region::centered(2, 2, 3);
        assert_eq!(region.radius, 1);
    }

    #[test]
    fn test_window_bounds_are_exclusive() {
        let window = IntensityWindow::new(0, 140);
        assert!(!window.contains(0));
        assert!(window.contains(1));
        assert!(window.contains(139));
        assert!(!window.contains(140));
    }

    #[test]
    fn test_equal_bounds_contain_nothing() {
        let window = IntensityWindow::new(128, 128);
        assert!(!window.is_ordered());
        assert!((0..=255u8).all(|v| !window.contains(v)));
    }
}
