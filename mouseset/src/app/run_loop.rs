use std::cell::RefCell;
use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::Ordering;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use core_foundation::base::TCFType;
use core_foundation::date::CFAbsoluteTimeGetCurrent;
use core_foundation::runloop::{
    kCFRunLoopCommonModes, CFRunLoop, CFRunLoopSource, CFRunLoopTimer, CFRunLoopTimerContext,
    CFRunLoopTimerRef,
};
use core_foundation_sys::base::kCFAllocatorDefault;
use core_foundation_sys::runloop::{
    CFRunLoopSourceContext, CFRunLoopSourceCreate, CFRunLoopSourceInvalidate,
    CFRunLoopTimerInvalidate, CFRunLoopTimerSetNextFireDate,
};
use objc2_foundation::MainThreadMarker;

use crate::core::{Config, State};
use crate::macos::{
    self, HotkeyManager, MacOSCursorLocator, MacOSCursorManipulator, MouseSample, MouseTracker,
};
use crate::pid::PidFile;
use mouseset_ipc::Command;

use super::channels::{create_channels, run_async, IpcCommandWithResponse, MainChannels};
use super::dispatch::dispatch_command;

const POLL_INTERVAL_SECS: f64 = 0.05;

// Repeat interval of the debounce timer. A repeating timer stays valid after
// firing; every movement pulls its next fire date in to the debounce deadline.
const IDLE_INTERVAL_SECS: f64 = 365.0 * 24.0 * 60.0 * 60.0;

struct RunLoopContext {
    ipc_cmd_rx: std_mpsc::Receiver<IpcCommandWithResponse>,
    hotkey_cmd_rx: std_mpsc::Receiver<Command>,
    mouse_rx: std_mpsc::Receiver<MouseSample>,
    state: RefCell<State>,
    manipulator: MacOSCursorManipulator,
    debounce_timer: RefCell<Option<CFRunLoopTimer>>,
    _hotkey_manager: HotkeyManager,
    mouse_tracker: RefCell<MouseTracker>,
}

impl RunLoopContext {
    /// Feed pending movement into state and push the debounce timer to the new deadline.
    fn drain_mouse_samples(&self) {
        let mut deadline = None;
        while let Ok(sample) = self.mouse_rx.try_recv() {
            deadline = Some(self.state.borrow_mut().mouse_moved(sample.position, sample.at));
        }
        if let Some(deadline) = deadline {
            self.arm_debounce_timer(deadline);
        }
    }

    fn arm_debounce_timer(&self, deadline: Instant) {
        let timer = self.debounce_timer.borrow();
        let Some(timer) = timer.as_ref() else {
            return;
        };
        let remaining = deadline.saturating_duration_since(Instant::now());
        let fire_date = unsafe { CFAbsoluteTimeGetCurrent() } + remaining.as_secs_f64();
        unsafe {
            CFRunLoopTimerSetNextFireDate(timer.as_concrete_TypeRef(), fire_date);
        }
    }

    fn handle_hotkey_commands(&self) {
        while let Ok(cmd) = self.hotkey_cmd_rx.try_recv() {
            tracing::debug!("Received hotkey command: {:?}", cmd);
            let response = dispatch_command(&cmd, &self.state, &self.manipulator);
            tracing::debug!("Hotkey command result: {:?}", response);
            if matches!(cmd, Command::Quit) {
                CFRunLoop::get_current().stop();
            }
        }
    }

    fn handle_ipc_commands(&self) {
        while let Ok((cmd, resp_tx)) = self.ipc_cmd_rx.try_recv() {
            tracing::debug!("Received IPC command: {:?}", cmd);
            let response = dispatch_command(&cmd, &self.state, &self.manipulator);
            if resp_tx.blocking_send(response).is_err() {
                tracing::warn!("IPC client went away before the response was sent");
            }

            // Quit only after the response is out
            if matches!(cmd, Command::Quit) {
                CFRunLoop::get_current().stop();
            }
        }
    }
}

extern "C" fn poll_callback(_timer: CFRunLoopTimerRef, info: *mut c_void) {
    let ctx = unsafe { &*(info as *const RunLoopContext) };

    ctx.drain_mouse_samples();
    ctx.handle_hotkey_commands();
    ctx.handle_ipc_commands();
}

extern "C" fn wake_callback(info: *const c_void) {
    let ctx = unsafe { &*(info as *const RunLoopContext) };

    ctx.drain_mouse_samples();
    ctx.handle_ipc_commands();
}

extern "C" fn debounce_callback(_timer: CFRunLoopTimerRef, info: *mut c_void) {
    let ctx = unsafe { &*(info as *const RunLoopContext) };

    // A sample may be queued that is newer than the deadline that just fired
    ctx.drain_mouse_samples();

    let mut state = ctx.state.borrow_mut();
    if state.debounce_elapsed(Instant::now()).is_some() {
        return;
    }
    if let Some(deadline) = state.debounce_deadline() {
        drop(state);
        ctx.arm_debounce_timer(deadline);
    }
}

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(self) -> Result<()> {
        macos::ensure_trusted().map_err(|e| anyhow!(e))?;

        let _pid_file = PidFile::acquire_default()?;

        let (tokio_channels, main_channels) = create_channels();

        // Spawn tokio runtime in separate thread
        std::thread::spawn(move || match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(run_async(tokio_channels)),
            Err(e) => tracing::error!("Failed to start tokio runtime: {}", e),
        });

        self.run_main_loop(main_channels)
    }

    fn run_main_loop(self, channels: MainChannels) -> Result<()> {
        tracing::info!("Starting main loop");

        MainThreadMarker::new().ok_or_else(|| anyhow!("Must be called from main thread"))?;

        let MainChannels {
            ipc_cmd_rx,
            hotkey_cmd_tx,
            hotkey_cmd_rx,
            mouse_tx,
            mouse_rx,
            wake_source,
        } = channels;

        let mut hotkey_manager = HotkeyManager::new(hotkey_cmd_tx);
        hotkey_manager
            .bind(&self.config.restore_hotkey, Command::Restore)
            .map_err(|e| anyhow!(e))?;
        if let Some(key) = &self.config.save_hotkey {
            hotkey_manager
                .bind(key, Command::Save)
                .map_err(|e| anyhow!(e))?;
        }
        hotkey_manager.start().map_err(|e| anyhow!(e))?;

        let mut mouse_tracker = MouseTracker::new(mouse_tx, Arc::clone(&wake_source));
        mouse_tracker.start().map_err(|e| anyhow!(e))?;

        for (key, cmd) in hotkey_manager.list_bindings() {
            tracing::info!("Hotkey {} -> {:?}", key, cmd);
        }

        let mut state = State::new(self.config);
        state.sync_cursor(&MacOSCursorLocator);
        tracing::info!(
            "mouseset ready: restore with {}, debounce {}ms",
            state.config.restore_hotkey,
            state.config.debounce_delay.as_millis()
        );

        let context = Box::new(RunLoopContext {
            ipc_cmd_rx,
            hotkey_cmd_rx,
            mouse_rx,
            state: RefCell::new(state),
            manipulator: MacOSCursorManipulator,
            debounce_timer: RefCell::new(None),
            _hotkey_manager: hotkey_manager,
            mouse_tracker: RefCell::new(mouse_tracker),
        });
        let context_ptr = Box::into_raw(context);

        let mut timer_context = CFRunLoopTimerContext {
            version: 0,
            info: context_ptr as *mut c_void,
            retain: None,
            release: None,
            copyDescription: None,
        };

        let now = unsafe { CFAbsoluteTimeGetCurrent() };
        let poll_timer = unsafe {
            CFRunLoopTimer::new(
                now,
                POLL_INTERVAL_SECS,
                0,
                0,
                poll_callback,
                &mut timer_context,
            )
        };
        let debounce_timer = unsafe {
            CFRunLoopTimer::new(
                now + IDLE_INTERVAL_SECS,
                IDLE_INTERVAL_SECS,
                0,
                0,
                debounce_callback,
                &mut timer_context,
            )
        };

        let mut source_context = CFRunLoopSourceContext {
            version: 0,
            info: context_ptr as *mut c_void,
            retain: None,
            release: None,
            copyDescription: None,
            equal: None,
            hash: None,
            schedule: None,
            cancel: None,
            perform: wake_callback,
        };
        let source = unsafe {
            let source_ref = CFRunLoopSourceCreate(kCFAllocatorDefault, 0, &mut source_context);
            if source_ref.is_null() {
                drop(Box::from_raw(context_ptr));
                return Err(anyhow!("Failed to create main run loop source"));
            }
            CFRunLoopSource::wrap_under_create_rule(source_ref)
        };

        let run_loop = CFRunLoop::get_current();
        run_loop.add_timer(&poll_timer, unsafe { kCFRunLoopCommonModes });
        run_loop.add_timer(&debounce_timer, unsafe { kCFRunLoopCommonModes });
        run_loop.add_source(&source, unsafe { kCFRunLoopCommonModes });
        unsafe {
            (*context_ptr).debounce_timer.replace(Some(debounce_timer.clone()));
        }
        wake_source.store(
            source.as_concrete_TypeRef() as *mut c_void,
            Ordering::Release,
        );

        tracing::info!("Entering CFRunLoop");
        CFRunLoop::run_current();
        tracing::info!("CFRunLoop exited");

        wake_source.store(ptr::null_mut(), Ordering::Release);
        unsafe {
            CFRunLoopTimerInvalidate(poll_timer.as_concrete_TypeRef());
            CFRunLoopTimerInvalidate(debounce_timer.as_concrete_TypeRef());
            CFRunLoopSourceInvalidate(source.as_concrete_TypeRef());
        }
        // Timers and the source no longer reference the context once invalidated
        let context = unsafe { Box::from_raw(context_ptr) };
        context.mouse_tracker.borrow_mut().stop();
        drop(context);

        Ok(())
    }
}
