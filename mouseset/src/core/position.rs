pub use mouseset_ipc::Point;

/// The single remembered cursor location. Holds no history: each store replaces the last.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SavedPosition {
    point: Option<Point>,
}

impl SavedPosition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Point> {
        self.point
    }

    pub fn store(&mut self, point: Point) {
        self.point = Some(point);
    }

    pub fn clear(&mut self) -> Option<Point> {
        self.point.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_until_stored() {
        let slot = SavedPosition::new();
        assert_eq!(slot.get(), None);
    }

    #[test]
    fn test_store_overwrites() {
        let mut slot = SavedPosition::new();
        slot.store(Point::new(10.0, 20.0));
        slot.store(Point::new(30.0, 40.0));
        assert_eq!(slot.get(), Some(Point::new(30.0, 40.0)));
    }

    #[test]
    fn test_clear_returns_previous() {
        let mut slot = SavedPosition::new();
        slot.store(Point::new(1.0, 2.0));
        assert_eq!(slot.clear(), Some(Point::new(1.0, 2.0)));
        assert_eq!(slot.get(), None);
        assert_eq!(slot.clear(), None);
    }
}
