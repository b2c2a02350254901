use crate::effect::Effect;
use crate::platform::CursorManipulator;

/// Execute side effects.
pub fn execute_effects<M: CursorManipulator>(effects: Vec<Effect>, manipulator: &M) {
    for effect in effects {
        match effect {
            Effect::WarpCursor { point } => {
                manipulator.warp_cursor(point);
                tracing::info!("Moved cursor to {}", point);
            }
        }
    }
}
