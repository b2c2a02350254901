use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use std::ffi::c_void;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(options: *const c_void) -> bool;
}

/// Whether this process may observe and post input events system-wide.
pub fn is_trusted() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Same as `is_trusted`, but asks the system to show the Accessibility
/// permission dialog when the process is not trusted yet.
pub fn is_trusted_with_prompt() -> bool {
    let key = CFString::new("AXTrustedCheckOptionPrompt");
    let dict = CFDictionary::from_CFType_pairs(&[(key, CFBoolean::true_value())]);

    unsafe { AXIsProcessTrustedWithOptions(dict.as_concrete_TypeRef() as *const c_void) }
}

pub fn ensure_trusted() -> Result<(), String> {
    if is_trusted() {
        return Ok(());
    }
    tracing::warn!("Accessibility permission not granted, requesting...");
    if is_trusted_with_prompt() {
        return Ok(());
    }
    Err("Please grant Accessibility permission to mouseset and restart".to_string())
}
