use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop, CFRunLoopSource};
use core_graphics::event::{
    CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventType, CallbackResult, EventField,
};
use mouseset_ipc::Command;
use std::collections::HashMap;
use std::sync::mpsc;

use crate::core::{format_hotkey, parse_hotkey, Hotkey, Modifiers};

fn modifiers_from_flags(flags: CGEventFlags) -> Modifiers {
    Modifiers {
        cmd: flags.contains(CGEventFlags::CGEventFlagCommand),
        alt: flags.contains(CGEventFlags::CGEventFlagAlternate),
        ctrl: flags.contains(CGEventFlags::CGEventFlagControl),
        shift: flags.contains(CGEventFlags::CGEventFlagShift),
    }
}

/// Looks up the command bound to a key press. Modifiers must match exactly;
/// lock and device flags such as Caps Lock are ignored.
fn match_hotkey(
    bindings: &HashMap<Hotkey, Command>,
    key_code: i64,
    flags: CGEventFlags,
) -> Option<Command> {
    let key_code = u16::try_from(key_code).ok()?;
    let hotkey = Hotkey {
        key_code,
        modifiers: modifiers_from_flags(flags),
    };
    bindings.get(&hotkey).cloned()
}

/// Owns the keyboard event tap and the hotkey table.
/// The tap only observes: matched key presses still reach the focused app.
/// Bindings are copied into the tap when it starts.
pub struct HotkeyManager {
    bindings: HashMap<Hotkey, Command>,
    command_tx: mpsc::Sender<Command>,
    tap: Option<HotkeyTap>,
}

impl HotkeyManager {
    pub fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self {
            bindings: HashMap::new(),
            command_tx,
            tap: None,
        }
    }

    pub fn bind(&mut self, key_str: &str, command: Command) -> Result<(), String> {
        let hotkey = parse_hotkey(key_str)?;
        tracing::info!("Binding {} to {:?}", format_hotkey(&hotkey), command);
        self.bindings.insert(hotkey, command);
        Ok(())
    }

    pub fn list_bindings(&self) -> Vec<(String, Command)> {
        let mut bindings: Vec<(String, Command)> = self
            .bindings
            .iter()
            .map(|(hotkey, cmd)| (format_hotkey(hotkey), cmd.clone()))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(&b.0));
        bindings
    }

    pub fn start(&mut self) -> Result<(), String> {
        self.tap = Some(self.create_tap()?);
        tracing::info!("Hotkey tap started with {} bindings", self.bindings.len());
        Ok(())
    }

    fn create_tap(&self) -> Result<HotkeyTap, String> {
        let bindings = self.bindings.clone();
        let tx = self.command_tx.clone();

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            vec![CGEventType::KeyDown],
            move |_proxy, event_type, event| {
                if !matches!(event_type, CGEventType::KeyDown) {
                    return CallbackResult::Keep;
                }

                let key_code = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE);
                if let Some(command) = match_hotkey(&bindings, key_code, event.get_flags()) {
                    tracing::debug!("Hotkey matched: key {} -> {:?}", key_code, command);
                    if tx.send(command).is_err() {
                        tracing::error!("Failed to send command from hotkey");
                    }
                }
                CallbackResult::Keep
            },
        )
        .map_err(|_| {
            "Failed to create keyboard event tap. Make sure Accessibility permission is granted."
        })?;

        tap.enable();

        let source = tap
            .mach_port()
            .create_runloop_source(0)
            .map_err(|_| "Failed to create run loop source for hotkeys")?;

        CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });

        Ok(HotkeyTap {
            _tap: tap,
            _source: source,
        })
    }
}

struct HotkeyTap {
    _tap: CGEventTap<'static>,
    _source: CFRunLoopSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_lists_sorted() {
        let (tx, _rx) = mpsc::channel();
        let mut manager = HotkeyManager::new(tx);

        manager.bind("cmd-shift-e", Command::Restore).unwrap();
        manager.bind("cmd-shift-s", Command::Save).unwrap();

        assert_eq!(
            manager.list_bindings(),
            vec![
                ("cmd-shift-e".to_string(), Command::Restore),
                ("cmd-shift-s".to_string(), Command::Save),
            ]
        );
    }

    #[test]
    fn test_bind_rejects_bad_key() {
        let (tx, _rx) = mpsc::channel();
        let mut manager = HotkeyManager::new(tx);
        assert!(manager.bind("cmd-shift-nope", Command::Restore).is_err());
        assert!(manager.list_bindings().is_empty());
    }

    fn restore_bindings() -> HashMap<Hotkey, Command> {
        let mut bindings = HashMap::new();
        bindings.insert(parse_hotkey("cmd-shift-e").unwrap(), Command::Restore);
        bindings
    }

    const KEY_E: i64 = 0x0E;

    #[test]
    fn test_match_exact_combo() {
        let flags = CGEventFlags::CGEventFlagCommand | CGEventFlags::CGEventFlagShift;
        assert_eq!(
            match_hotkey(&restore_bindings(), KEY_E, flags),
            Some(Command::Restore)
        );
    }

    #[test]
    fn test_match_missing_modifier() {
        let flags = CGEventFlags::CGEventFlagCommand;
        assert_eq!(match_hotkey(&restore_bindings(), KEY_E, flags), None);
    }

    #[test]
    fn test_match_extra_modifier() {
        let flags = CGEventFlags::CGEventFlagCommand
            | CGEventFlags::CGEventFlagShift
            | CGEventFlags::CGEventFlagAlternate;
        assert_eq!(match_hotkey(&restore_bindings(), KEY_E, flags), None);
    }

    #[test]
    fn test_match_ignores_caps_lock() {
        let flags = CGEventFlags::CGEventFlagCommand
            | CGEventFlags::CGEventFlagShift
            | CGEventFlags::CGEventFlagAlphaShift;
        assert_eq!(
            match_hotkey(&restore_bindings(), KEY_E, flags),
            Some(Command::Restore)
        );
    }

    #[test]
    fn test_match_other_key() {
        let flags = CGEventFlags::CGEventFlagCommand | CGEventFlags::CGEventFlagShift;
        // 0x0F is R
        assert_eq!(match_hotkey(&restore_bindings(), 0x0F, flags), None);
        assert_eq!(match_hotkey(&restore_bindings(), -1, flags), None);
    }

    #[test]
    fn test_rebind_replaces_command() {
        let (tx, _rx) = mpsc::channel();
        let mut manager = HotkeyManager::new(tx);

        manager.bind("cmd-shift-e", Command::Restore).unwrap();
        manager.bind("command-shift-E", Command::Forget).unwrap();
        assert_eq!(
            manager.list_bindings(),
            vec![("cmd-shift-e".to_string(), Command::Forget)]
        );
    }
}
