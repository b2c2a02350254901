#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key_code: u16,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub cmd: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

/// ANSI virtual key codes (kVK_*), first name is the canonical one.
const KEY_CODES: &[(&str, u16)] = &[
    ("a", 0x00),
    ("s", 0x01),
    ("d", 0x02),
    ("f", 0x03),
    ("h", 0x04),
    ("g", 0x05),
    ("z", 0x06),
    ("x", 0x07),
    ("c", 0x08),
    ("v", 0x09),
    ("b", 0x0B),
    ("q", 0x0C),
    ("w", 0x0D),
    ("e", 0x0E),
    ("r", 0x0F),
    ("y", 0x10),
    ("t", 0x11),
    ("1", 0x12),
    ("2", 0x13),
    ("3", 0x14),
    ("4", 0x15),
    ("6", 0x16),
    ("5", 0x17),
    ("equal", 0x18),
    ("9", 0x19),
    ("7", 0x1A),
    ("minus", 0x1B),
    ("8", 0x1C),
    ("0", 0x1D),
    ("rightbracket", 0x1E),
    ("o", 0x1F),
    ("u", 0x20),
    ("leftbracket", 0x21),
    ("i", 0x22),
    ("p", 0x23),
    ("return", 0x24),
    ("enter", 0x24),
    ("l", 0x25),
    ("j", 0x26),
    ("quote", 0x27),
    ("k", 0x28),
    ("semicolon", 0x29),
    ("backslash", 0x2A),
    ("comma", 0x2B),
    ("slash", 0x2C),
    ("n", 0x2D),
    ("m", 0x2E),
    ("period", 0x2F),
    ("tab", 0x30),
    ("space", 0x31),
    ("grave", 0x32),
    ("delete", 0x33),
    ("backspace", 0x33),
    ("escape", 0x35),
    ("esc", 0x35),
    ("f5", 0x60),
    ("f6", 0x61),
    ("f7", 0x62),
    ("f3", 0x63),
    ("f8", 0x64),
    ("f9", 0x65),
    ("f11", 0x67),
    ("f10", 0x6D),
    ("f12", 0x6F),
    ("f4", 0x76),
    ("f2", 0x78),
    ("f1", 0x7A),
    ("left", 0x7B),
    ("right", 0x7C),
    ("down", 0x7D),
    ("up", 0x7E),
];

fn parse_key_code(key: &str) -> Result<u16, String> {
    let key = key.to_lowercase();
    KEY_CODES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, code)| *code)
        .ok_or_else(|| format!("Unknown key: {}", key))
}

fn key_code_to_str(code: u16) -> &'static str {
    KEY_CODES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| *name)
        .unwrap_or("unknown")
}

pub fn parse_hotkey(key_str: &str) -> Result<Hotkey, String> {
    let mut parts: Vec<&str> = key_str.split('-').collect();
    let key_part = match parts.pop() {
        Some(key) if !key.is_empty() => key,
        _ => return Err("Empty key string".to_string()),
    };

    let mut modifiers = Modifiers::default();
    for part in parts {
        match part.to_lowercase().as_str() {
            "cmd" | "super" | "command" => modifiers.cmd = true,
            "alt" | "opt" | "option" => modifiers.alt = true,
            "ctrl" | "control" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            _ => return Err(format!("Unknown modifier: {}", part)),
        }
    }

    Ok(Hotkey {
        key_code: parse_key_code(key_part)?,
        modifiers,
    })
}

pub fn format_hotkey(hotkey: &Hotkey) -> String {
    let m = hotkey.modifiers;
    [
        (m.cmd, "cmd"),
        (m.alt, "alt"),
        (m.ctrl, "ctrl"),
        (m.shift, "shift"),
    ]
    .iter()
    .filter(|(on, _)| *on)
    .map(|(_, name)| *name)
    .chain(std::iter::once(key_code_to_str(hotkey.key_code)))
    .collect::<Vec<_>>()
    .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_restore_hotkey() {
        let hotkey = parse_hotkey("cmd-shift-e").unwrap();
        assert_eq!(hotkey.key_code, 0x0E);
        assert!(hotkey.modifiers.cmd);
        assert!(hotkey.modifiers.shift);
        assert!(!hotkey.modifiers.alt);
        assert!(!hotkey.modifiers.ctrl);
    }

    #[test]
    fn test_parse_simple_key() {
        let hotkey = parse_hotkey("a").unwrap();
        assert_eq!(hotkey.key_code, 0x00);
        assert_eq!(hotkey.modifiers, Modifiers::default());
    }

    #[test]
    fn test_parse_modifier_aliases() {
        assert!(parse_hotkey("super-a").unwrap().modifiers.cmd);
        assert!(parse_hotkey("command-a").unwrap().modifiers.cmd);
        assert!(parse_hotkey("opt-a").unwrap().modifiers.alt);
        assert!(parse_hotkey("option-a").unwrap().modifiers.alt);
        assert!(parse_hotkey("control-a").unwrap().modifiers.ctrl);
    }

    #[test]
    fn test_parse_case_insensitive() {
        let hotkey = parse_hotkey("CMD-Shift-E").unwrap();
        assert_eq!(hotkey, parse_hotkey("cmd-shift-e").unwrap());

        assert_eq!(parse_hotkey("Alt-Return").unwrap().key_code, 0x24);
    }

    #[test]
    fn test_parse_special_keys() {
        assert_eq!(parse_hotkey("return").unwrap().key_code, 0x24);
        assert_eq!(parse_hotkey("enter").unwrap().key_code, 0x24);
        assert_eq!(parse_hotkey("space").unwrap().key_code, 0x31);
        assert_eq!(parse_hotkey("esc").unwrap().key_code, 0x35);
        assert_eq!(parse_hotkey("backspace").unwrap().key_code, 0x33);
        assert_eq!(parse_hotkey("up").unwrap().key_code, 0x7E);
        assert_eq!(parse_hotkey("f1").unwrap().key_code, 0x7A);
        assert_eq!(parse_hotkey("f12").unwrap().key_code, 0x6F);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_hotkey("").is_err());
        assert!(parse_hotkey("cmd-").is_err());
        assert!(parse_hotkey("cmd-shift-unknown").is_err());
        assert!(parse_hotkey("meta-e").is_err());
    }

    #[test]
    fn test_format_uses_canonical_names() {
        let hotkey = parse_hotkey("shift-option-command-enter").unwrap();
        assert_eq!(format_hotkey(&hotkey), "cmd-alt-shift-return");
    }

    #[test]
    fn test_format_all_modifiers() {
        let hotkey = Hotkey {
            key_code: 0x31,
            modifiers: Modifiers {
                cmd: true,
                alt: true,
                ctrl: true,
                shift: true,
            },
        };
        assert_eq!(format_hotkey(&hotkey), "cmd-alt-ctrl-shift-space");
    }

    #[test]
    fn test_format_unknown_key_code() {
        let hotkey = Hotkey {
            key_code: 0xFF,
            modifiers: Modifiers::default(),
        };
        assert_eq!(format_hotkey(&hotkey), "unknown");
    }

    #[test]
    fn test_parse_format_roundtrip() {
        for input in ["e", "cmd-shift-e", "ctrl-f1", "cmd-alt-ctrl-shift-space"] {
            let hotkey = parse_hotkey(input).unwrap();
            let reparsed = parse_hotkey(&format_hotkey(&hotkey)).unwrap();
            assert_eq!(hotkey, reparsed, "Roundtrip failed for: {}", input);
        }
    }
}
