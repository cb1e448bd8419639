use std::fmt;

use crate::error::UiError;

/// Screen rectangle a panel is drawn into.
///
/// Coordinates are terminal cells; `right` and `bottom` are exclusive, so a
/// valid position always has `left < right` and `top < bottom`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Position {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self, UiError> {
        if left >= right || top >= bottom {
            return Err(UiError::InvalidPosition {
                left,
                top,
                right,
                bottom,
            });
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Build from an origin and a size.
    pub fn with_size(x: i32, y: i32, width: i32, height: i32) -> Result<Self, UiError> {
        Self::new(x, y, x + width, y + height)
    }

    /// Like `new`, but grows a degenerate rectangle to one cell instead of
    /// failing. Used by layout code that must always produce something on
    /// very small terminals.
    pub fn clamped(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right: right.max(left + 1),
            bottom: bottom.max(top + 1),
        }
    }

    /// Centered dialog for short forms and confirmations.
    pub fn dialog(screen_width: i32, screen_height: i32, fields: usize) -> Result<Self, UiError> {
        let x = screen_width / 3;
        let y = screen_height / 3;
        Self::new(x, y, screen_width - x, y + 4 + fields as i32)
    }

    /// Large dialog covering most of the screen, for forms with many fields.
    pub fn large_dialog(screen_width: i32, screen_height: i32) -> Result<Self, UiError> {
        let x = screen_width / 8;
        let y = screen_height / 8;
        Self::new(x, y, screen_width - x, screen_height - y)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn contains_rect(&self, other: &Position) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})-({}, {})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_rectangles() {
        assert!(Position::new(0, 0, 10, 5).is_ok());
        assert!(matches!(
            Position::new(10, 0, 10, 5),
            Err(UiError::InvalidPosition { .. })
        ));
        assert!(matches!(
            Position::new(0, 6, 10, 5),
            Err(UiError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_contains_is_exclusive_on_far_edges() {
        let pos = Position::with_size(2, 3, 4, 2).unwrap();
        assert!(pos.contains(2, 3));
        assert!(pos.contains(5, 4));
        assert!(!pos.contains(6, 4));
        assert!(!pos.contains(5, 5));
        assert!(!pos.contains(1, 3));
    }

    #[test]
    fn test_dialog_geometry() {
        let pos = Position::dialog(120, 30, 1).unwrap();
        assert_eq!(pos, Position::new(40, 10, 80, 15).unwrap());

        let large = Position::large_dialog(80, 40).unwrap();
        assert_eq!(large, Position::new(10, 5, 70, 35).unwrap());
        assert!(Position::new(0, 0, 80, 40).unwrap().contains_rect(&large));
    }

    #[test]
    fn test_clamped_never_degenerates() {
        let pos = Position::clamped(5, 5, 2, 5);
        assert_eq!(pos.width(), 1);
        assert_eq!(pos.height(), 1);
    }
}
