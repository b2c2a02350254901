mod accessibility;
mod cursor;
mod hotkey;
mod mouse_tracker;

pub use accessibility::*;
pub use cursor::*;
pub use hotkey::*;
pub use mouse_tracker::*;
