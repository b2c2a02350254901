use crate::core::Point;

/// Trait for reading the pointer location from the system.
/// This abstraction allows mocking in tests.
pub trait CursorLocator {
    fn cursor_location(&self) -> Option<Point>;
}

/// Trait for moving the pointer (side effects).
/// This abstraction allows mocking in tests.
pub trait CursorManipulator {
    fn warp_cursor(&self, point: Point);
}
