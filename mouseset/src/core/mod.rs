mod config;
#[cfg(any(target_os = "macos", test))]
mod debounce;
mod hotkey;
#[cfg(any(target_os = "macos", test))]
mod position;
#[cfg(any(target_os = "macos", test))]
mod state;

pub use config::*;
#[cfg(any(target_os = "macos", test))]
pub use debounce::*;
pub use hotkey::*;
#[cfg(any(target_os = "macos", test))]
pub use position::*;
#[cfg(any(target_os = "macos", test))]
pub use state::*;
