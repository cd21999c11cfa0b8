/// Hit windows in milliseconds of absolute offset from the nearest
/// scheduled beat. Boundaries are inclusive: an offset of exactly
/// 60ms still counts as Perfect.
pub const PERFECT_WINDOW_MS: f64 = 60.0;
pub const SOLID_WINDOW_MS: f64 = 105.0;
pub const CLOSE_WINDOW_MS: f64 = 150.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Judgment {
    Perfect,
    Solid,
    Close,
    Miss,
}

impl Judgment {
    /// Classify an absolute offset (ms) against the static windows.
    pub fn classify(offset_ms: f64) -> Self {
        if offset_ms <= PERFECT_WINDOW_MS {
            Judgment::Perfect
        } else if offset_ms <= SOLID_WINDOW_MS {
            Judgment::Solid
        } else if offset_ms <= CLOSE_WINDOW_MS {
            Judgment::Close
        } else {
            Judgment::Miss
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Judgment::Perfect => 3,
            Judgment::Solid => 2,
            Judgment::Close => 1,
            Judgment::Miss => 0,
        }
    }

    /// Anything inside the Close window counts as a hit; only a hit
    /// extends a streak.
    pub fn is_hit(self) -> bool {
        self != Judgment::Miss
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_perfect() {
        assert_eq!(Judgment::classify(0.0), Judgment::Perfect);
        assert_eq!(Judgment::classify(5.0), Judgment::Perfect);
        assert_eq!(Judgment::classify(59.9), Judgment::Perfect);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(Judgment::classify(60.0), Judgment::Perfect);
        assert_eq!(Judgment::classify(105.0), Judgment::Solid);
        assert_eq!(Judgment::classify(150.0), Judgment::Close);
    }

    #[test]
    fn test_classify_just_past_boundaries() {
        assert_eq!(Judgment::classify(60.1), Judgment::Solid);
        assert_eq!(Judgment::classify(105.1), Judgment::Close);
        assert_eq!(Judgment::classify(150.1), Judgment::Miss);
    }

    #[test]
    fn test_classify_far_miss() {
        assert_eq!(Judgment::classify(400.0), Judgment::Miss);
    }

    #[test]
    fn test_points() {
        assert_eq!(Judgment::Perfect.points(), 3);
        assert_eq!(Judgment::Solid.points(), 2);
        assert_eq!(Judgment::Close.points(), 1);
        assert_eq!(Judgment::Miss.points(), 0);
    }

    #[test]
    fn test_is_hit() {
        assert!(Judgment::Perfect.is_hit());
        assert!(Judgment::Solid.is_hit());
        assert!(Judgment::Close.is_hit());
        assert!(!Judgment::Miss.is_hit());
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Judgment::Perfect.to_string(), "Perfect");
        assert_eq!(Judgment::Solid.to_string(), "Solid");
        assert_eq!(Judgment::Close.to_string(), "Close");
        assert_eq!(Judgment::Miss.to_string(), "Miss");
    }
}
