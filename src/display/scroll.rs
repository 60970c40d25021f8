/// Marquee position for a caption wider than the panel.
///
/// The offset starts at the right edge and moves left by `speed` every frame.
/// Once the text is fully off the left edge it jumps back to the right edge
/// in a single step, so the offset always stays in `[-text_width, display_width]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    offset: i32,
    text: String,
    speed: i32,
}

impl ScrollState {
    pub fn new(text: impl Into<String>, speed_px_per_frame: i32, display_width: i32) -> Self {
        Self {
            offset: display_width,
            text: text.into(),
            speed: speed_px_per_frame.max(1),
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Move one frame to the left, wrapping when the text is fully off-screen.
    pub fn step(&mut self, text_width: i32, display_width: i32) {
        self.offset -= self.speed;
        if self.offset < -text_width {
            self.offset = display_width;
        }
    }
}

/// Where a caption that fits on the panel is drawn.
pub fn centered_x(text_width: i32, display_width: i32) -> i32 {
    (display_width - text_width).div_euclid(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_right_edge() {
        let scroll = ScrollState::new("marquee", 2, 128);
        assert_eq!(scroll.offset(), 128);
        assert_eq!(scroll.text(), "marquee");
        assert_eq!(scroll.speed(), 2);
    }

    #[test]
    fn decreases_by_speed_until_wrap() {
        let (text_width, display_width) = (300, 128);
        let mut scroll = ScrollState::new("x", 3, display_width);
        let mut previous = scroll.offset();
        let mut wrapped = false;
        for _ in 0..1_000 {
            scroll.step(text_width, display_width);
            let current = scroll.offset();
            if current == display_width {
                assert!(previous - 3 < -text_width, "wrapped early at {previous}");
                wrapped = true;
                break;
            }
            assert_eq!(current, previous - 3);
            previous = current;
        }
        assert!(wrapped);
    }

    #[test]
    fn offset_stays_bounded() {
        let (text_width, display_width) = (200, 128);
        let mut scroll = ScrollState::new("x", 7, display_width);
        for _ in 0..500 {
            scroll.step(text_width, display_width);
            assert!((-text_width..=display_width).contains(&scroll.offset()));
        }
    }

    #[test]
    fn touching_left_edge_does_not_wrap() {
        // Landing exactly on -text_width keeps the offset; only passing it wraps.
        let mut scroll = ScrollState::new("x", 10, 10);
        scroll.step(0, 10);
        assert_eq!(scroll.offset(), 0);
        scroll.step(10, 10);
        assert_eq!(scroll.offset(), -10);
        scroll.step(10, 10);
        assert_eq!(scroll.offset(), 10);
    }

    #[test]
    fn zero_speed_is_raised_to_one() {
        let scroll = ScrollState::new("x", 0, 128);
        assert_eq!(scroll.speed(), 1);
    }

    #[test]
    fn centering_is_stable() {
        let first = centered_x(42, 128);
        assert_eq!(first, 43);
        for _ in 0..10 {
            assert_eq!(centered_x(42, 128), first);
        }
        assert_eq!(centered_x(128, 128), 0);
        assert_eq!(centered_x(41, 128), 43);
    }
}
