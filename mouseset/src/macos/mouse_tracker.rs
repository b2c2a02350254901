use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use core_foundation::base::TCFType;
use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop, CFRunLoopSource};
use core_foundation_sys::mach_port::CFMachPortRef;
use core_foundation_sys::runloop::{CFRunLoopSourceRef, CFRunLoopSourceSignal};
use core_graphics::event::{
    CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement, CGEventType,
    CallbackResult,
};

use crate::core::Point;

extern "C" {
    fn CGEventTapEnable(tap: CFMachPortRef, enable: bool);
}

/// A pointer location stamped with the moment the tap saw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseSample {
    pub position: Point,
    pub at: Instant,
}

pub struct MouseTracker {
    sample_tx: mpsc::Sender<MouseSample>,
    tap: Option<MouseTap>,
    runloop_source: Arc<AtomicPtr<c_void>>,
}

impl MouseTracker {
    /// `runloop_source` is signalled after every sample so the main loop
    /// picks it up without waiting for the next poll.
    pub fn new(
        sample_tx: mpsc::Sender<MouseSample>,
        runloop_source: Arc<AtomicPtr<c_void>>,
    ) -> Self {
        Self {
            sample_tx,
            tap: None,
            runloop_source,
        }
    }

    pub fn start(&mut self) -> Result<(), String> {
        if self.tap.is_some() {
            return Ok(());
        }
        self.tap = Some(self.create_tap()?);
        tracing::info!("Mouse tracker started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.tap.take().is_some() {
            tracing::info!("Mouse tracker stopped");
        }
    }

    fn create_tap(&self) -> Result<MouseTap, String> {
        let tx = self.sample_tx.clone();
        let source = Arc::clone(&self.runloop_source);

        let mach_port_ptr: Arc<AtomicPtr<c_void>> = Arc::new(AtomicPtr::new(ptr::null_mut()));
        let mach_port_for_callback = Arc::clone(&mach_port_ptr);

        let tap = CGEventTap::new(
            CGEventTapLocation::Session,
            CGEventTapPlacement::HeadInsertEventTap,
            CGEventTapOptions::ListenOnly,
            vec![CGEventType::MouseMoved],
            move |_proxy, event_type, event| {
                match event_type {
                    CGEventType::TapDisabledByTimeout | CGEventType::TapDisabledByUserInput => {
                        let reason = if matches!(event_type, CGEventType::TapDisabledByTimeout) {
                            "timeout"
                        } else {
                            "user input"
                        };
                        tracing::warn!("Mouse event tap disabled by {}, re-enabling...", reason);
                        let ptr = mach_port_for_callback.load(Ordering::Acquire);
                        if !ptr.is_null() {
                            unsafe {
                                CGEventTapEnable(ptr as CFMachPortRef, true);
                            }
                        }
                        return CallbackResult::Keep;
                    }
                    CGEventType::MouseMoved => {}
                    _ => return CallbackResult::Keep,
                }

                let location = event.location();
                let sample = MouseSample {
                    position: Point::new(location.x, location.y),
                    at: Instant::now(),
                };

                if tx.send(sample).is_err() {
                    tracing::debug!("Mouse sample receiver dropped");
                    return CallbackResult::Keep;
                }

                let source_ptr = source.load(Ordering::Acquire);
                if !source_ptr.is_null() {
                    unsafe {
                        CFRunLoopSourceSignal(source_ptr as CFRunLoopSourceRef);
                    }
                }

                CallbackResult::Keep
            },
        )
        .map_err(|_| {
            "Failed to create mouse event tap. Make sure Accessibility permission is granted."
        })?;

        mach_port_ptr.store(
            tap.mach_port().as_concrete_TypeRef() as *mut c_void,
            Ordering::Release,
        );

        tap.enable();

        let source = tap
            .mach_port()
            .create_runloop_source(0)
            .map_err(|_| "Failed to create run loop source for mouse tracker")?;

        CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });

        Ok(MouseTap {
            _tap: tap,
            _source: source,
        })
    }
}

struct MouseTap {
    _tap: CGEventTap<'static>,
    _source: CFRunLoopSource,
}
