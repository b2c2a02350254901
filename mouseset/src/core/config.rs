use std::time::Duration;

#[cfg(any(target_os = "macos", test))]
use mouseset_ipc::ConfigInfo;

pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 1000;
pub const DEFAULT_RESTORE_HOTKEY: &str = "cmd-shift-e";

/// Daemon settings, fixed at startup apart from the debounce delay.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub debounce_delay: Duration,
    pub restore_hotkey: String,
    pub save_hotkey: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_debounce_delay_ms(&mut self, ms: u64) -> Result<(), String> {
        if ms == 0 {
            return Err("Debounce delay must be greater than 0 ms".to_string());
        }
        self.debounce_delay = Duration::from_millis(ms);
        Ok(())
    }

    #[cfg(any(target_os = "macos", test))]
    pub fn to_info(&self) -> ConfigInfo {
        ConfigInfo {
            debounce_delay_ms: self.debounce_delay.as_millis() as u64,
            restore_hotkey: self.restore_hotkey.clone(),
            save_hotkey: self.save_hotkey.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(DEFAULT_DEBOUNCE_DELAY_MS),
            restore_hotkey: DEFAULT_RESTORE_HOTKEY.to_string(),
            save_hotkey: None,
        }
    }
}
