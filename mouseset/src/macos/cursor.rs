use core_graphics::event::{CGEvent, CGEventTapLocation, CGEventType, CGMouseButton};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use core_graphics::geometry::CGPoint;

use crate::core::Point;
use crate::platform::{CursorLocator, CursorManipulator};

/// macOS implementation of CursorLocator
pub struct MacOSCursorLocator;

impl CursorLocator for MacOSCursorLocator {
    fn cursor_location(&self) -> Option<Point> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState).ok()?;
        let event = CGEvent::new(source).ok()?;
        let location = event.location();
        Some(Point::new(location.x, location.y))
    }
}

/// macOS implementation of CursorManipulator
pub struct MacOSCursorManipulator;

impl CursorManipulator for MacOSCursorManipulator {
    fn warp_cursor(&self, point: Point) {
        let target = CGPoint::new(point.x, point.y);

        match post_mouse_moved(target) {
            Ok(()) => tracing::debug!("Posted cursor move to {}", point),
            Err(e) => {
                tracing::warn!("{}, falling back to cursor warp", e);
                warp_mouse_cursor(target);
            }
        }
    }
}

fn post_mouse_moved(target: CGPoint) -> Result<(), String> {
    let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| "Failed to create event source".to_string())?;
    let event =
        CGEvent::new_mouse_event(source, CGEventType::MouseMoved, target, CGMouseButton::Left)
            .map_err(|_| "Failed to create mouse move event".to_string())?;
    event.post(CGEventTapLocation::HID);
    Ok(())
}

fn warp_mouse_cursor(target: CGPoint) {
    use core_graphics::display::CGWarpMouseCursorPosition;

    let result = unsafe { CGWarpMouseCursorPosition(target) };
    if result != 0 {
        tracing::warn!(
            "Failed to warp cursor to ({}, {}): error {}",
            target.x,
            target.y,
            result
        );
    } else {
        tracing::debug!("Warped cursor to ({}, {})", target.x, target.y);
    }
}
