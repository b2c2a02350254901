use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Cursor operations
    Restore,
    Save,
    Forget,

    // Queries
    GetPosition,
    GetConfig,

    // Settings
    SetDebounceDelay { ms: u64 },

    // Control
    Quit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    Position { position: Option<Point> },
    Config { config: ConfigInfo },
}

/// A location in global screen coordinates (origin at the top-left of the main display).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub debounce_delay_ms: u64,
    pub restore_hotkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_hotkey: Option<String>,
}
