use std::time::Instant;

use super::{Config, Debouncer, Point, SavedPosition};
use crate::effect::{CommandResult, Effect};
use crate::platform::CursorLocator;
use mouseset_ipc::Response;

pub struct State {
    pub config: Config,
    last_seen: Option<Point>,
    debouncer: Debouncer<Point>,
    saved: SavedPosition,
}

impl State {
    pub fn new(config: Config) -> Self {
        let debouncer = Debouncer::new(config.debounce_delay);
        Self {
            config,
            last_seen: None,
            debouncer,
            saved: SavedPosition::new(),
        }
    }

    /// Seed the last known location from the system without starting the debounce.
    pub fn sync_cursor<L: CursorLocator>(&mut self, locator: &L) {
        if self.last_seen.is_some() {
            return;
        }
        if let Some(point) = locator.cursor_location() {
            tracing::debug!("Cursor starts at {}", point);
            self.last_seen = Some(point);
        }
    }

    /// Record a movement and restart the debounce. Returns the new deadline.
    pub fn mouse_moved(&mut self, point: Point, at: Instant) -> Instant {
        self.last_seen = Some(point);
        self.debouncer.touch(point, at)
    }

    /// Commit the pending location if the cursor has been idle long enough.
    pub fn debounce_elapsed(&mut self, now: Instant) -> Option<Point> {
        let point = self.debouncer.fire(now)?;
        self.saved.store(point);
        tracing::info!("Position saved at: {}", point);
        Some(point)
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    pub fn saved_position(&self) -> Option<Point> {
        self.saved.get()
    }

    pub fn restore(&self) -> CommandResult {
        match self.saved.get() {
            Some(point) => CommandResult::ok_with_effects(vec![Effect::WarpCursor { point }]),
            None => {
                tracing::info!("No saved position.");
                CommandResult::error("No saved position")
            }
        }
    }

    /// Commit the last seen location right away instead of waiting for the debounce.
    pub fn save_now(&mut self) -> CommandResult {
        let Some(point) = self.last_seen else {
            tracing::info!("No cursor location seen yet, nothing to save");
            return CommandResult::error("No cursor location seen yet");
        };
        self.debouncer.cancel();
        self.saved.store(point);
        tracing::info!("Position saved at: {}", point);
        CommandResult::with_response(Response::Position {
            position: Some(point),
        })
    }

    pub fn forget(&mut self) -> CommandResult {
        self.debouncer.cancel();
        match self.saved.clear() {
            Some(point) => tracing::info!("Forgot saved position {}", point),
            None => tracing::debug!("Forget requested with no saved position"),
        }
        CommandResult::ok()
    }

    pub fn set_debounce_delay_ms(&mut self, ms: u64) -> CommandResult {
        if let Err(e) = self.config.set_debounce_delay_ms(ms) {
            return CommandResult::error(e);
        }
        self.debouncer.set_delay(self.config.debounce_delay);
        tracing::info!("Set debounce delay: {}ms", ms);
        CommandResult::ok()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
